//! Error types for the studio runtime and facade

use thiserror::Error;

/// Runtime error
///
/// Every runtime operation returns `RuntimeResult`; the facade collapses any
/// error to a boolean at its own surface and forwards the detail to the
/// notification sinks.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Handle is not valid")]
    InvalidHandle,

    #[error("System is not initialized")]
    NotInitialized,

    #[error("System is already initialized")]
    AlreadyInitialized,

    #[error("Bank already loaded: {0}")]
    BankAlreadyLoaded(String),

    #[error("Bank not found: {0}")]
    BankNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Bus not found: {0}")]
    BusNotFound(String),

    #[error("VCA not found: {0}")]
    VcaNotFound(String),

    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Unknown label '{label}' for parameter '{parameter}'")]
    UnknownLabel { parameter: String, label: String },

    #[error("Bad bank manifest: {0}")]
    BadBankManifest(String),

    #[error("Plugin load failed: {0}")]
    PluginLoad(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type RuntimeResult<T> = Result<T, RuntimeError>;
