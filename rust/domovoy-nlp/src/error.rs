//! Error types for the interpretation engine.
//!
//! Phrase processing itself never fails: an unresolvable phrase is simply
//! `None`. Errors only surface while the engine is being configured.

use thiserror::Error;

use crate::registry::LocationId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NlpError {
    #[error("no registered location is titled '{title}'")]
    UnknownLocationTitle { title: String },

    #[error("device '{device}' refers to unregistered location {location}")]
    UnknownLocation { device: String, location: LocationId },

    #[error("a command must apply to '*' or to at least one device type")]
    EmptyDeviceTypes,
}
