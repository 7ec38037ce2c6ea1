//! Dual-line camera flash driver.
//!
//! A flash device has two output lines: an enable line, exposed raw through
//! the `flash_on` attribute, and a trigger line, exposed as the binary
//! `led:torch` illumination device. This crate resolves the lines from a
//! hardware description, owns them for the lifetime of the device, and
//! publishes both control surfaces.
//!
//! Collaborators come from `flashlight-hardware`; this crate holds no global
//! state, so any number of [`FlashlightDriver`]s can run side by side.

pub mod actuator;
pub mod context;
pub mod driver;
pub mod lifecycle;
pub mod line;
pub mod resolver;
pub mod surface;

pub use actuator::{Actuator, FlashLines, trigger_level};
pub use context::{DeviceContext, DeviceStatus, Platform};
pub use driver::{FlashlightDriver, PlatformDevice, PlatformEvent};
pub use lifecycle::{Lifecycle, StateTransition};
pub use line::OwnedLine;
pub use resolver::{ResolvedLines, resolve};
pub use surface::{FlashOnAttribute, TorchLed};
