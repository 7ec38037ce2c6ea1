//! Driver configuration.
//!
//! Every field has a default matching the stock camera-flash binding, so an
//! empty JSON object is a complete configuration:
//!
//! ```
//! use flashlight_core::DriverConfig;
//!
//! let config = DriverConfig::from_json_str("{}").unwrap();
//! assert_eq!(config, DriverConfig::default());
//! assert!(config.torch.enabled);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ATTRIBUTE_DIR, ATTRIBUTE_FLASH_ON, ATTRIBUTE_MODE, COMPATIBLE_CAMERA_FLASH, TORCH_LED_NAME,
    TORCH_MAX_BRIGHTNESS,
};
use crate::{Error, HardwareLineSpec, Result};

/// Top-level configuration for the flashlight driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Compatible strings the driver binds to.
    pub compatible: Vec<String>,

    /// Where the enable and trigger lines are declared.
    pub lines: HardwareLineSpec,

    /// Raw attribute surface.
    pub attribute: AttributeConfig,

    /// Torch LED surface.
    pub torch: TorchConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            compatible: vec![COMPATIBLE_CAMERA_FLASH.to_string()],
            lines: HardwareLineSpec::default(),
            attribute: AttributeConfig::default(),
            torch: TorchConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Parse a configuration from JSON text and validate it.
    ///
    /// # Errors
    /// Returns `Error::Config` if the text is not valid JSON for this
    /// structure or fails [`validate`](Self::validate).
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: DriverConfig = serde_json::from_str(text)
            .map_err(|e| Error::config(format!("invalid driver config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check the configuration for values the driver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.compatible.is_empty() {
            return Err(Error::config("at least one compatible string is required"));
        }
        if self.lines.enable == self.lines.trigger {
            return Err(Error::config(format!(
                "enable and trigger lines both refer to {}",
                self.lines.enable
            )));
        }
        if self.attribute.dir.is_empty() || self.attribute.name.is_empty() {
            return Err(Error::config("attribute directory and name must be set"));
        }
        if self.torch.enabled && self.torch.name.is_empty() {
            return Err(Error::config("torch name must be set"));
        }
        if self.torch.max_brightness == 0 {
            return Err(Error::config("torch max_brightness must be positive"));
        }
        Ok(())
    }

    /// Check whether a device with the given compatible strings matches.
    pub fn matches<S: AsRef<str>>(&self, compatible: &[S]) -> bool {
        compatible
            .iter()
            .any(|c| self.compatible.iter().any(|ours| ours == c.as_ref()))
    }
}

/// Raw attribute surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    pub dir: String,
    pub name: String,
    pub mode: u32,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            dir: ATTRIBUTE_DIR.to_string(),
            name: ATTRIBUTE_FLASH_ON.to_string(),
            mode: ATTRIBUTE_MODE,
        }
    }
}

/// Torch LED surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorchConfig {
    /// Register the torch LED at all. Without it only the raw attribute is
    /// published.
    pub enabled: bool,
    pub name: String,
    pub max_brightness: u32,
}

impl Default for TorchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: TORCH_LED_NAME.to_string(),
            max_brightness: TORCH_MAX_BRIGHTNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineRef;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = DriverConfig::from_json_str(r#"{ "torch": { "enabled": false } }"#).unwrap();
        assert!(!config.torch.enabled);
        assert_eq!(config.torch.name, "led:torch");
        assert_eq!(config.attribute.name, "flash_on");
        assert_eq!(config.attribute.mode, 0o664);
    }

    #[test]
    fn test_custom_lines() {
        let json = r#"{
            "lines": {
                "enable": { "collection": "flash-gpios", "index": 2 },
                "trigger": { "collection": "flash-gpios", "index": 3 }
            }
        }"#;
        let config = DriverConfig::from_json_str(json).unwrap();
        assert_eq!(config.lines.enable, LineRef::new("flash-gpios", 2));
        assert_eq!(config.lines.trigger, LineRef::new("flash-gpios", 3));
    }

    #[test]
    fn test_same_line_twice_rejected() {
        let mut config = DriverConfig::default();
        config.lines.trigger = config.lines.enable.clone();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = DriverConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_max_brightness_rejected() {
        let result = DriverConfig::from_json_str(r#"{ "torch": { "max_brightness": 0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_matches_compatible() {
        let config = DriverConfig::default();
        assert!(config.matches(&["vendor,board", "qcom,camera-flash"]));
        assert!(!config.matches(&["qcom,camera-led"]));
        assert!(!config.matches::<&str>(&[]));
    }
}
