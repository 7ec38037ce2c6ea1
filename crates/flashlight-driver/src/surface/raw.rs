//! Raw `flash_on` attribute driving the enable line.
//!
//! Reads return the enable line value as decimal text followed by a newline.
//! Writes take an unsigned decimal integer and pass it to the line as-is,
//! without clamping to 0/1; the line backend decides what reaches the pin.

use std::sync::Arc;

use flashlight_core::{Error, LineValue, Result};
use flashlight_hardware::Attribute;
use tracing::debug;

use crate::actuator::Actuator;

/// Parse a raw attribute write.
///
/// Accepts what `kstrtoul(buf, 10, ..)` accepts: decimal digits with an
/// optional leading `+` and at most one trailing newline.
///
/// # Examples
///
/// ```
/// use flashlight_driver::surface::raw::parse_value;
///
/// assert_eq!(parse_value("1\n").unwrap().raw(), 1);
/// assert_eq!(parse_value("+42").unwrap().raw(), 42);
/// assert!(parse_value(" 1").is_err());
/// assert!(parse_value("on").is_err());
/// ```
pub fn parse_value(buf: &str) -> Result<LineValue> {
    let digits = buf.strip_suffix('\n').unwrap_or(buf);
    digits
        .parse::<u64>()
        .map(LineValue::new)
        .map_err(|e| Error::parse(buf, e))
}

/// The `flash_on` attribute.
#[derive(Debug)]
pub struct FlashOnAttribute {
    actuator: Arc<Actuator>,
}

impl FlashOnAttribute {
    pub fn new(actuator: Arc<Actuator>) -> Self {
        Self { actuator }
    }

    /// Current enable value as attribute text.
    pub fn read(&self) -> Result<String> {
        let value = self.actuator.enable_value()?;
        debug!("flash_on_show: GPIO value = {}", value);
        Ok(format!("{value}\n"))
    }

    /// Parse and apply a write. Returns the number of bytes consumed.
    ///
    /// On a parse error the enable line is not touched.
    pub fn write(&self, buf: &str) -> Result<usize> {
        let value = parse_value(buf).inspect_err(|e| debug!("flash_on_store: {}", e))?;
        debug!("flash_on_store: Setting GPIO value to {}", value);
        self.actuator.set_enable(value)?;
        Ok(buf.len())
    }
}

impl Attribute for FlashOnAttribute {
    fn show(&self) -> Result<String> {
        self.read()
    }

    fn store(&self, buf: &str) -> Result<usize> {
        self.write(buf)
    }
}
