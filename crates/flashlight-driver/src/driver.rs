//! Platform driver: matches devices and owns their contexts.
//!
//! The [`FlashlightDriver`] holds the host collaborators and one
//! [`DeviceContext`] per attached device, keyed by device name. Surface
//! callbacks reach their device through the `Arc`s the context registered,
//! so there is no process-wide device pointer and independent drivers can
//! coexist (one per test, for instance).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use flashlight_core::DriverConfig;
//! use flashlight_driver::{FlashlightDriver, Platform, PlatformDevice};
//! use flashlight_hardware::GpioTable;
//! use flashlight_hardware::mock::{MockAttributeTree, MockGpioChip, MockLedRegistry};
//!
//! let tree = MockAttributeTree::new();
//! let platform = Platform::new(
//!     Arc::new(MockGpioChip::default()),
//!     Arc::new(tree.clone()),
//!     Arc::new(MockLedRegistry::new()),
//! );
//! let driver = FlashlightDriver::new(DriverConfig::default(), platform);
//!
//! let gpios = GpioTable::new().with_collection("qcom,flash-gpios", [12, 13]);
//! let device = PlatformDevice::new("camera-flash", ["qcom,camera-flash"], Arc::new(gpios));
//! driver.probe(device).unwrap();
//!
//! assert_eq!(tree.read("flashlight/flash_on").unwrap(), "0\n");
//! driver.remove("camera-flash").unwrap();
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use flashlight_core::{DeviceState, DriverConfig, Error, Result, constants::DRIVER_NAME};
use flashlight_hardware::HardwareDescription;
use tracing::{debug, info, warn};

use crate::context::{DeviceContext, DeviceStatus, Platform};

/// A device announced by the platform.
#[derive(Clone)]
pub struct PlatformDevice {
    pub name: String,
    pub compatible: Vec<String>,
    pub description: Arc<dyn HardwareDescription>,
}

impl PlatformDevice {
    pub fn new<I, S>(
        name: impl Into<String>,
        compatible: I,
        description: Arc<dyn HardwareDescription>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            compatible: compatible.into_iter().map(Into::into).collect(),
            description,
        }
    }
}

impl std::fmt::Debug for PlatformDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformDevice")
            .field("name", &self.name)
            .field("compatible", &self.compatible)
            .finish_non_exhaustive()
    }
}

/// Attach/detach notification from the platform.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum PlatformEvent {
    /// A device became available.
    Attach(PlatformDevice),

    /// The named device went away.
    Detach(String),
}

/// Flashlight platform driver.
#[derive(Debug)]
pub struct FlashlightDriver {
    config: DriverConfig,
    platform: Platform,
    devices: Mutex<BTreeMap<String, DeviceContext>>,
}

impl FlashlightDriver {
    pub fn new(config: DriverConfig, platform: Platform) -> Self {
        Self {
            config,
            platform,
            devices: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Attach a device if it matches.
    ///
    /// # Errors
    ///
    /// - `Error::NoMatchingDevice` if no compatible string matches
    /// - `Error::AlreadyAttached` if a device with this name is attached
    /// - any error from [`DeviceContext::attach`]
    pub fn probe(&self, device: PlatformDevice) -> Result<()> {
        if !self.config.matches(device.compatible.as_slice()) {
            debug!(
                "{}: no compatible match in {:?}",
                device.name, device.compatible
            );
            return Err(Error::NoMatchingDevice {
                device: device.name,
            });
        }

        let mut devices = self.devices();
        if devices.contains_key(&device.name) {
            return Err(Error::AlreadyAttached(device.name));
        }

        let context = DeviceContext::attach(
            device.name.clone(),
            device.description.as_ref(),
            &self.platform,
            &self.config,
        )?;
        devices.insert(device.name, context);
        Ok(())
    }

    /// Detach a device and drop its context.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDevice` if nothing is attached under `name`,
    /// or the first teardown error. The device is forgotten either way.
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut context = self
            .devices()
            .remove(name)
            .ok_or_else(|| Error::UnknownDevice(name.to_string()))?;
        context.detach()
    }

    /// Dispatch a platform event.
    pub fn handle_event(&self, event: PlatformEvent) -> Result<()> {
        match event {
            PlatformEvent::Attach(device) => self.probe(device),
            PlatformEvent::Detach(name) => self.remove(&name),
        }
    }

    /// Detach every device, continuing past errors.
    pub fn shutdown(&self) {
        let devices = std::mem::take(&mut *self.devices());
        for (name, mut context) in devices {
            if let Err(e) = context.detach() {
                warn!("{}: teardown failed: {}", name, e);
            }
        }
        info!("{} driver stopped", DRIVER_NAME);
    }

    pub fn is_attached(&self, name: &str) -> bool {
        self.devices().contains_key(name)
    }

    /// Names of attached devices, sorted.
    pub fn device_names(&self) -> Vec<String> {
        self.devices().keys().cloned().collect()
    }

    pub fn state(&self, name: &str) -> Option<DeviceState> {
        self.devices().get(name).map(DeviceContext::state)
    }

    pub fn status(&self, name: &str) -> Option<DeviceStatus> {
        self.devices().get(name).map(DeviceContext::status)
    }

    /// Run `f` against an attached device.
    pub fn with_device<T>(&self, name: &str, f: impl FnOnce(&DeviceContext) -> T) -> Result<T> {
        let devices = self.devices();
        let context = devices
            .get(name)
            .ok_or_else(|| Error::UnknownDevice(name.to_string()))?;
        Ok(f(context))
    }

    fn devices(&self) -> MutexGuard<'_, BTreeMap<String, DeviceContext>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FlashlightDriver {
    fn drop(&mut self) {
        if !self.devices().is_empty() {
            self.shutdown();
        }
    }
}
