//! Collaborator trait definitions.
//!
//! This module defines the contracts between the flashlight driver and the
//! pieces of the host it plugs into: the hardware description it reads line
//! numbers from, the controller that owns the physical lines, and the two
//! registries that expose its surfaces to user space.
//!
//! All calls are synchronous. Line-level reads and writes are treated as
//! instantaneous, and none of these operations suspend, so the traits are
//! plain (object-safe) traits and are used as `Arc<dyn Trait>` throughout.
//! Every trait requires `Send + Sync` because callbacks arrive on
//! caller-owned threads.

use std::sync::Arc;

use flashlight_core::{LineId, LineValue};

use crate::error::Result;
use crate::types::{LedDescriptor, SurfaceHandle};

/// Lookup of line numbers in a declarative hardware description.
///
/// # Examples
///
/// ```
/// use flashlight_hardware::description::GpioTable;
/// use flashlight_hardware::traits::HardwareDescription;
///
/// let table = GpioTable::new().with_collection("qcom,flash-gpios", [12, 13]);
/// assert_eq!(table.resolve("qcom,flash-gpios", 1).unwrap(), 13);
/// assert!(table.resolve("qcom,flash-gpios", 2).is_err());
/// ```
pub trait HardwareDescription: Send + Sync {
    /// Resolve entry `index` of the named collection to a raw line number.
    ///
    /// The raw number is returned unvalidated; negative values are error
    /// codes recorded in the description.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::NotFound`] if the collection or the index
    /// does not exist.
    ///
    /// [`HardwareError::NotFound`]: crate::HardwareError::NotFound
    fn resolve(&self, collection: &str, index: u32) -> Result<i64>;
}

/// Owner of the physical output lines.
///
/// A controller hands out each line to at most one consumer at a time.
/// Requesting a line that is already requested fails with
/// [`HardwareError::LineBusy`](crate::HardwareError::LineBusy).
pub trait LineController: Send + Sync {
    /// Request exclusive use of `line` as an output driven to `initial`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The line is already requested (`LineBusy`)
    /// - The line cannot be an output (`InvalidLine`)
    /// - The backend fails (`Io`)
    fn request_output(&self, line: LineId, label: &str, initial: LineValue) -> Result<()>;

    /// Give up a previously requested line.
    fn free(&self, line: LineId) -> Result<()>;

    /// Drive a requested line.
    fn set_value(&self, line: LineId, value: LineValue) -> Result<()>;

    /// Read back a requested line.
    fn get_value(&self, line: LineId) -> Result<LineValue>;
}

/// A text attribute published through an [`AttributeRegistry`].
pub trait Attribute: Send + Sync {
    /// Render the attribute for a read.
    fn show(&self) -> flashlight_core::Result<String>;

    /// Apply a write. Returns the number of bytes consumed.
    fn store(&self, buf: &str) -> flashlight_core::Result<usize>;
}

/// Host for text attributes (a kobject directory in the original driver).
pub trait AttributeRegistry: Send + Sync {
    /// Publish `attribute` as `dir/name` with the given permission bits.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::DuplicateName`](crate::HardwareError::DuplicateName)
    /// if the path is already published.
    fn publish(
        &self,
        dir: &str,
        name: &str,
        mode: u32,
        attribute: Arc<dyn Attribute>,
    ) -> Result<SurfaceHandle>;

    /// Remove a published attribute.
    fn unpublish(&self, handle: SurfaceHandle) -> Result<()>;
}

/// Receiver of brightness updates from an [`LedRegistry`].
///
/// Implemented by the torch surface; the registry owns when it is called.
pub trait BrightnessSink: Send + Sync {
    /// Apply a brightness already clamped to the registered maximum.
    fn set_brightness(&self, value: u32);

    /// Last brightness applied.
    fn brightness(&self) -> u32;
}

/// Registry of illumination devices.
pub trait LedRegistry: Send + Sync {
    /// Register an LED and the sink that drives it.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::DuplicateName`](crate::HardwareError::DuplicateName)
    /// if an LED with the same name exists.
    fn register(&self, led: LedDescriptor, sink: Arc<dyn BrightnessSink>)
    -> Result<SurfaceHandle>;

    /// Unregister an LED. The LED is switched off before removal.
    fn unregister(&self, handle: SurfaceHandle) -> Result<()>;
}
