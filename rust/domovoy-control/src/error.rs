//! Error types for the hub side.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("device '{0}' is not known to the hub")]
    UnknownDevice(String),

    #[error("device '{device}' does not support {command}")]
    Unsupported { device: String, command: String },

    #[error("inventory could not be decoded: {0}")]
    Inventory(#[from] serde_json::Error),
}
