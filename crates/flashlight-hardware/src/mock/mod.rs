//! Mock collaborator implementations for testing and development.
//!
//! This module provides in-memory stand-ins for the line controller and the
//! two surface registries, controllable programmatically without physical
//! hardware.

pub mod attribute;
pub mod gpio;
pub mod led;

// Re-export commonly used types
pub use attribute::MockAttributeTree;
pub use gpio::MockGpioChip;
pub use led::MockLedRegistry;
