//! HTML fragment builders: escaping and slider/number/select/button
//! control blocks with module-namespaced ids.

pub mod controls;
pub mod escape;

pub use escape::escape;
