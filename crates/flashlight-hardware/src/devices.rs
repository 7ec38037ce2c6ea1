//! Enum wrapper for line controller dispatch.
//!
//! Lets a binary pick its line backend at runtime (from a command-line flag
//! or config) while keeping each backend a plain concrete type.
//!
//! # Examples
//!
//! ```
//! use flashlight_core::{LineId, LineValue};
//! use flashlight_hardware::devices::AnyLineController;
//! use flashlight_hardware::mock::MockGpioChip;
//! use flashlight_hardware::traits::LineController;
//!
//! let controller = AnyLineController::Mock(MockGpioChip::default());
//! let line = LineId::new(12).unwrap();
//! controller.request_output(line, "flash_en", LineValue::LOW).unwrap();
//! assert_eq!(controller.get_value(line).unwrap(), LineValue::LOW);
//! ```

use flashlight_core::{LineId, LineValue};

use crate::Result;
use crate::mock::MockGpioChip;
use crate::sysfs::SysfsGpio;
use crate::traits::LineController;

/// Enum wrapper for line controller dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyLineController {
    /// In-memory chip for development and testing.
    Mock(MockGpioChip),

    /// Legacy `/sys/class/gpio` interface.
    Sysfs(SysfsGpio),
}

impl AnyLineController {
    /// Short backend name for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Mock(_) => "mock",
            Self::Sysfs(_) => "sysfs",
        }
    }
}

impl LineController for AnyLineController {
    fn request_output(&self, line: LineId, label: &str, initial: LineValue) -> Result<()> {
        match self {
            Self::Mock(chip) => chip.request_output(line, label, initial),
            Self::Sysfs(gpio) => gpio.request_output(line, label, initial),
        }
    }

    fn free(&self, line: LineId) -> Result<()> {
        match self {
            Self::Mock(chip) => chip.free(line),
            Self::Sysfs(gpio) => gpio.free(line),
        }
    }

    fn set_value(&self, line: LineId, value: LineValue) -> Result<()> {
        match self {
            Self::Mock(chip) => chip.set_value(line, value),
            Self::Sysfs(gpio) => gpio.set_value(line, value),
        }
    }

    fn get_value(&self, line: LineId) -> Result<LineValue> {
        match self {
            Self::Mock(chip) => chip.get_value(line),
            Self::Sysfs(gpio) => gpio.get_value(line),
        }
    }
}

impl From<MockGpioChip> for AnyLineController {
    fn from(chip: MockGpioChip) -> Self {
        Self::Mock(chip)
    }
}

impl From<SysfsGpio> for AnyLineController {
    fn from(gpio: SysfsGpio) -> Self {
        Self::Sysfs(gpio)
    }
}
