//! User-space control surfaces.
//!
//! Both surfaces wrap the same [`Actuator`](crate::actuator::Actuator) but
//! address different lines:
//!
//! - [`FlashOnAttribute`]: raw text attribute on the enable line.
//! - [`TorchLed`]: binary-brightness LED on the trigger line.

pub mod raw;
pub mod torch;

pub use raw::FlashOnAttribute;
pub use torch::TorchLed;
