//! Error types for `FieldLab`
//!
//! Domain-specific error enums aggregated by a top-level error that maps
//! each variant to a CLI exit code.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `FieldLab` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, bad option values)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Site rendering error (bundle assembly, template, payload)
    pub const RENDER_ERROR: i32 = 4;

    /// Formulas/markdown check failure in strict mode
    pub const CHECK_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `FieldLab` operations.
#[derive(Debug, Error)]
pub enum FieldLabError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Site assembly / rendering error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Formulas coverage check failure
    #[error(transparent)]
    Check(#[from] CheckError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FieldLabError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Render(_) => ExitCode::RENDER_ERROR,
            Self::Check(_) => ExitCode::CHECK_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Referenced file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Rendering Errors
// ============================================================================

/// Site assembly and rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Two module builders produced the same id
    #[error("duplicate module id: {0}")]
    DuplicateModule(String),

    /// All modules were skipped
    #[error("no modules left to render (all skipped)")]
    NoModules,

    /// Unknown module id passed to `--skip`
    #[error("unknown module id: {0}")]
    UnknownModule(String),

    /// A data payload contained a non-finite float
    #[error("non-finite value in data payload of module '{module}' at {path}")]
    NonFinitePayload {
        /// Module whose payload failed serialization
        module: String,
        /// JSON path of the offending value
        path: String,
    },

    /// Plotly bundle required for release mode could not be read
    #[error("plotly bundle unreadable: {path}: {message}")]
    PlotlyBundle {
        /// Path to the bundle that was requested
        path: PathBuf,
        /// Underlying I/O error text
        message: String,
    },
}

// ============================================================================
// Check Errors
// ============================================================================

/// Formulas coverage check errors (strict mode).
#[derive(Debug, Error)]
pub enum CheckError {
    /// One or more findings in strict mode
    #[error("{count} finding(s) in strict mode")]
    Strict {
        /// Number of findings reported
        count: usize,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `FieldLab` operations.
pub type Result<T> = std::result::Result<T, FieldLabError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::RENDER_ERROR, 4);
        assert_eq!(ExitCode::CHECK_ERROR, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: FieldLabError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_render_error_exit_code() {
        let err: FieldLabError = RenderError::DuplicateModule("rlc_discharge".to_string()).into();
        assert_eq!(err.exit_code(), ExitCode::RENDER_ERROR);
    }

    #[test]
    fn test_check_error_exit_code() {
        let err: FieldLabError = CheckError::Strict { count: 2 }.into();
        assert_eq!(err.exit_code(), ExitCode::CHECK_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: FieldLabError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("site.yaml"),
            message: "unexpected token".to_string(),
        };
        assert!(err.to_string().contains("site.yaml"));
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::NonFinitePayload {
            module: "rail_launcher".to_string(),
            path: "wave[0].I[3][4]".to_string(),
        };
        assert!(err.to_string().contains("rail_launcher"));
        assert!(err.to_string().contains("wave[0].I[3][4]"));
    }
}
