//! Error types for bounce-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the physics core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A zero-length vector was passed where a direction is required.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// A parameter or config value is outside its allowed range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Frame times must be finite and non-negative.
    #[error("invalid time step: {0}")]
    InvalidTimeStep(f64),
}

/// Errors raised while loading parameter or config presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("preset not found: {name} (looked in {})", dir.display())]
    NotFound { name: String, dir: PathBuf },

    #[error("preset rejected: {0}")]
    Invalid(#[from] PhysicsError),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
