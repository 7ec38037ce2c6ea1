//! Shared fixtures for driver integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use flashlight_core::{DriverConfig, LineId};
use flashlight_driver::{DeviceContext, FlashlightDriver, Platform, PlatformDevice};
use flashlight_hardware::GpioTable;
use flashlight_hardware::mock::{MockAttributeTree, MockGpioChip, MockLedRegistry};

pub const ENABLE_GPIO: i64 = 12;
pub const TRIGGER_GPIO: i64 = 13;
pub const FLASH_ON_PATH: &str = "flashlight/flash_on";
pub const TORCH: &str = "led:torch";
pub const DEVICE: &str = "camera-flash";

/// Mock host with handles kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    pub chip: MockGpioChip,
    pub tree: MockAttributeTree,
    pub leds: MockLedRegistry,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(&self) -> Platform {
        Platform::new(
            Arc::new(self.chip.clone()),
            Arc::new(self.tree.clone()),
            Arc::new(self.leds.clone()),
        )
    }

    pub fn attach(&self) -> flashlight_core::Result<DeviceContext> {
        self.attach_with(&gpios(ENABLE_GPIO, TRIGGER_GPIO), &DriverConfig::default())
    }

    pub fn attach_with(
        &self,
        description: &GpioTable,
        config: &DriverConfig,
    ) -> flashlight_core::Result<DeviceContext> {
        DeviceContext::attach(DEVICE, description, &self.platform(), config)
    }

    pub fn driver(&self) -> FlashlightDriver {
        FlashlightDriver::new(DriverConfig::default(), self.platform())
    }

    /// Nothing owned, nothing published.
    pub fn assert_clean(&self) {
        assert_eq!(self.chip.requested_count(), 0, "lines still owned");
        assert!(self.tree.paths().is_empty(), "attributes still published");
        assert!(self.leds.names().is_empty(), "LEDs still registered");
    }
}

pub fn gpios(enable: i64, trigger: i64) -> GpioTable {
    GpioTable::new().with_collection("qcom,flash-gpios", [enable, trigger])
}

pub fn device(name: &str, table: GpioTable) -> PlatformDevice {
    PlatformDevice::new(name, ["qcom,camera-flash"], Arc::new(table))
}

/// The default device on the default lines.
pub fn camera_flash() -> PlatformDevice {
    device(DEVICE, gpios(ENABLE_GPIO, TRIGGER_GPIO))
}

pub fn line(n: i64) -> LineId {
    LineId::new(n).unwrap()
}
