//! Names and limits used by the flashlight driver.
//!
//! The driver binds to a camera flash node in the hardware description,
//! reads two line entries from one named collection, and publishes two
//! surfaces to user space:
//!
//! | Surface      | Name        | Line driven          |
//! |--------------|-------------|----------------------|
//! | Attribute    | `flash_on`  | enable (`flash_en`)  |
//! | Torch LED    | `led:torch` | trigger (`flash_now`)|
//!
//! These values match what existing user space expects to find, so changing
//! them breaks callers that look the surfaces up by name.
//!
//! # Usage
//!
//! ```
//! use flashlight_core::constants::*;
//!
//! assert_eq!(FLASH_GPIOS_PROPERTY, "qcom,flash-gpios");
//! assert_eq!(ENABLE_LINE_INDEX, 0);
//! assert_eq!(TRIGGER_LINE_INDEX, 1);
//! ```

// ============================================================================
// Platform Matching
// ============================================================================

/// Driver name registered with the platform.
pub const DRIVER_NAME: &str = "flashlight";

/// Compatible string the driver binds to.
pub const COMPATIBLE_CAMERA_FLASH: &str = "qcom,camera-flash";

// ============================================================================
// Hardware Description
// ============================================================================

/// Collection in the hardware description listing the flash lines.
pub const FLASH_GPIOS_PROPERTY: &str = "qcom,flash-gpios";

/// Index of the enable line within [`FLASH_GPIOS_PROPERTY`].
pub const ENABLE_LINE_INDEX: u32 = 0;

/// Index of the trigger line within [`FLASH_GPIOS_PROPERTY`].
pub const TRIGGER_LINE_INDEX: u32 = 1;

/// Number of addressable lines on the host.
///
/// A line number is valid iff `0 <= n < MAX_LINE_COUNT`.
pub const MAX_LINE_COUNT: u32 = 512;

/// Consumer label attached to the enable line when it is requested.
pub const ENABLE_LINE_LABEL: &str = "flash_en";

/// Consumer label attached to the trigger line when it is requested.
pub const TRIGGER_LINE_LABEL: &str = "flash_now";

// ============================================================================
// Raw Attribute Surface
// ============================================================================

/// Directory the raw attribute is published under.
pub const ATTRIBUTE_DIR: &str = "flashlight";

/// Name of the raw enable attribute.
pub const ATTRIBUTE_FLASH_ON: &str = "flash_on";

/// Permission bits of the raw attribute (rw-rw-r--).
pub const ATTRIBUTE_MODE: u32 = 0o664;

// ============================================================================
// Torch Surface
// ============================================================================

/// Canonical name of the torch LED device.
pub const TORCH_LED_NAME: &str = "led:torch";

/// Brightness value meaning "off".
pub const LED_OFF: u32 = 0;

/// Maximum brightness of the torch. The trigger line is binary.
pub const TORCH_MAX_BRIGHTNESS: u32 = 1;
