//! Facade-internal error type
//!
//! Nothing here crosses the public surface: the facade collapses every
//! failure to `false`/`None` and reports detail through the log sinks.

use aw_core::RuntimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {source}")]
    ConfigParse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Missing required config key {0}")]
    MissingKey(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type EngineResult<T> = Result<T, EngineError>;
