//! Error types for the engine core and its configuration layer.

use thiserror::Error;

/// Errors raised by the raycasting core.
///
/// A ray that hits nothing is not an error; it is reported as `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// An argument that would make the march or the fan degenerate.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for the config schema.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but describe an unusable engine.
    #[error("invalid config: {0}")]
    Invalid(#[from] EngineError),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, EngineError>;
