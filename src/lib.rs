//! `FieldLab` - single-file offline interactive physics lab generator
//!
//! This library assembles parameterized physics-teaching widgets into one
//! self-contained HTML document: sliders and Plotly figures, recomputed
//! live in the browser.

pub mod cli;
pub mod config;
pub mod error;
pub mod figure;
pub mod html;
pub mod markdown;
pub mod modules;
pub mod numeric;
pub mod observability;
pub mod physics;
pub mod site;
