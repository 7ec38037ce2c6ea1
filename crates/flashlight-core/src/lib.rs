//! Core types shared by the flashlight driver crates.
//!
//! Holds the line identifiers and values the driver operates on, the error
//! taxonomy reported by every attach and surface call, the driver
//! configuration, and the constants that name the hardware description
//! entries and the published surfaces.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{AttributeConfig, DriverConfig, TorchConfig};
pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
