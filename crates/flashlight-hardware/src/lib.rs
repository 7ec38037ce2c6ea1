//! Hardware collaborator layer for the flashlight driver.
//!
//! The driver never touches hardware or user space directly. It talks to
//! four collaborators through the traits in [`traits`]:
//!
//! - [`HardwareDescription`]: resolves named line entries to line numbers.
//! - [`LineController`]: hands out lines as exclusively-owned outputs.
//! - [`AttributeRegistry`]: publishes raw text attributes.
//! - [`LedRegistry`]: publishes illumination devices driven through a
//!   [`BrightnessSink`].
//!
//! # Implementations
//!
//! | Collaborator          | Implementations                         |
//! |-----------------------|-----------------------------------------|
//! | Hardware description  | [`GpioTable`]                           |
//! | Line controller       | [`MockGpioChip`], [`SysfsGpio`]         |
//! | Attribute registry    | [`MockAttributeTree`]                   |
//! | LED registry          | [`MockLedRegistry`]                     |
//!
//! Line controllers can be selected at runtime with [`AnyLineController`].
//!
//! # Error Handling
//!
//! All collaborator operations return [`Result<T>`][error::Result] with
//! [`HardwareError`]. The driver converts these into
//! [`flashlight_core::Error`] with `?`.
//!
//! [`HardwareDescription`]: traits::HardwareDescription
//! [`LineController`]: traits::LineController
//! [`AttributeRegistry`]: traits::AttributeRegistry
//! [`LedRegistry`]: traits::LedRegistry
//! [`BrightnessSink`]: traits::BrightnessSink
//! [`GpioTable`]: description::GpioTable
//! [`MockGpioChip`]: mock::MockGpioChip
//! [`MockAttributeTree`]: mock::MockAttributeTree
//! [`MockLedRegistry`]: mock::MockLedRegistry
//! [`SysfsGpio`]: sysfs::SysfsGpio
//! [`AnyLineController`]: devices::AnyLineController

pub mod description;
pub mod devices;
pub mod error;
pub mod mock;
pub mod sysfs;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use description::GpioTable;
pub use devices::AnyLineController;
pub use error::{HardwareError, Result};
pub use traits::{
    Attribute, AttributeRegistry, BrightnessSink, HardwareDescription, LedRegistry,
    LineController,
};
pub use types::{LedDescriptor, SurfaceHandle};
