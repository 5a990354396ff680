//! Logging setup for the `FieldLab` CLI.

mod logging;

pub use logging::{LogFormat, init_logging, verbosity_to_directive};
