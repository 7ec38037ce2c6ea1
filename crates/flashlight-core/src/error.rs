use std::num::ParseIntError;

use thiserror::Error;

use crate::types::{DeviceState, LineId};

/// Errors reported by the flashlight driver.
///
/// Attach-time errors (`Config`, `ResourceBusy`, `InvalidLine`,
/// `Registration`) abort the whole attach; everything acquired up to that
/// point is released before they are returned. `Parse` and `NotActive` are
/// local to a single surface call and never change device state.
#[derive(Error, Debug)]
pub enum Error {
    // Attach errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Line {line} is already in use")]
    ResourceBusy { line: LineId },

    #[error("Line {line} is not a valid output")]
    InvalidLine { line: String },

    #[error("Failed to publish {name}: {message}")]
    Registration { name: String, message: String },

    // Surface errors
    #[error("Invalid value {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Device is not active (state: {state})")]
    NotActive { state: DeviceState },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: DeviceState, to: DeviceState },

    // Driver table errors
    #[error("No match for device {device}")]
    NoMatchingDevice { device: String },

    #[error("Device {0} is already attached")]
    AlreadyAttached(String),

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    // Backend errors
    #[error("Hardware operation failed: {0}")]
    Hardware(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid line error.
    pub fn invalid_line(line: impl ToString) -> Self {
        Self::InvalidLine {
            line: line.to_string(),
        }
    }

    /// Create a new registration error.
    pub fn registration(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registration {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error for the given raw input.
    pub fn parse(input: impl Into<String>, source: ParseIntError) -> Self {
        Self::Parse {
            input: input.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
