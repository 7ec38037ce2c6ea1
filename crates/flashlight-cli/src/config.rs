//! `flashctl` configuration file.
//!
//! A JSON document with the driver settings and the one device the session
//! manages. Both sections are optional:
//!
//! ```json
//! {
//!   "driver": { "torch": { "enabled": true } },
//!   "device": {
//!     "name": "camera-flash",
//!     "compatible": ["qcom,camera-flash"],
//!     "gpios": { "qcom,flash-gpios": [12, 13] }
//!   }
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use flashlight_core::DriverConfig;
use flashlight_core::constants::{COMPATIBLE_CAMERA_FLASH, FLASH_GPIOS_PROPERTY};
use flashlight_hardware::GpioTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub driver: DriverConfig,
    pub device: DeviceConfig,
}

/// The device announced to the driver on `attach`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub name: String,
    pub compatible: Vec<String>,
    pub gpios: GpioTable,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "camera-flash".to_string(),
            compatible: vec![COMPATIBLE_CAMERA_FLASH.to_string()],
            gpios: GpioTable::new().with_collection(FLASH_GPIOS_PROPERTY, [12, 13]),
        }
    }
}

impl CliConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: CliConfig = serde_json::from_str(text).context("invalid config")?;
        config.driver.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to load {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = CliConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.device.name, "camera-flash");
    }

    #[test]
    fn test_device_section() {
        let config = CliConfig::from_json_str(
            r#"{
                "device": {
                    "name": "rear",
                    "gpios": { "qcom,flash-gpios": [40, 41] }
                },
                "driver": { "torch": { "enabled": false } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.device.name, "rear");
        assert_eq!(config.device.compatible, vec!["qcom,camera-flash"]);
        assert_eq!(
            config.device.gpios,
            GpioTable::new().with_collection("qcom,flash-gpios", [40, 41])
        );
        assert!(!config.driver.torch.enabled);
    }

    #[test]
    fn test_invalid_driver_section_is_rejected() {
        let result = CliConfig::from_json_str(r#"{ "driver": { "compatible": [] } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "device": {{ "name": "from-file" }} }}"#).unwrap();

        let config = CliConfig::from_file(file.path()).unwrap();
        assert_eq!(config.device.name, "from-file");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = CliConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(error.to_string().contains("absent.json"));
    }
}
