//! Per-device attach and teardown.
//!
//! A [`DeviceContext`] exists for every attached flash device. Attach runs
//! Line Resolver → Line Owner → surface publication; teardown runs the
//! reverse. If any attach step fails, everything done before it is undone
//! before the error is returned, so a half-initialized context is never
//! reachable.
//!
//! The device turns Active once both lines are owned, before any surface is
//! published, so a surface serves reads and writes as soon as it is visible.
//!
//! ```text
//! attach:   resolve(enable, trigger) ─► acquire(enable) ─► acquire(trigger)
//!           ─► Active ─► publish(flash_on) ─► register(led:torch)
//! teardown: unregister(led:torch) ─► unpublish(flash_on) ─► release(lines)
//! ```

use std::sync::Arc;

use flashlight_core::{DeviceState, DriverConfig, Error, LineId, LineRole, LineValue, Result};
use flashlight_hardware::{
    Attribute, AttributeRegistry, BrightnessSink, HardwareDescription, LedDescriptor, LedRegistry,
    LineController, SurfaceHandle,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::actuator::{Actuator, FlashLines};
use crate::lifecycle::StateTransition;
use crate::line::OwnedLine;
use crate::resolver;
use crate::surface::{FlashOnAttribute, TorchLed};

/// Host collaborators a device attaches to.
#[derive(Clone)]
pub struct Platform {
    pub lines: Arc<dyn LineController>,
    pub attributes: Arc<dyn AttributeRegistry>,
    pub leds: Arc<dyn LedRegistry>,
}

impl Platform {
    pub fn new(
        lines: Arc<dyn LineController>,
        attributes: Arc<dyn AttributeRegistry>,
        leds: Arc<dyn LedRegistry>,
    ) -> Self {
        Self {
            lines,
            attributes,
            leds,
        }
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}

/// Snapshot of a device for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStatus {
    pub name: String,
    pub state: DeviceState,
    pub enable_line: LineId,
    pub trigger_line: LineId,
    /// `None` once the device is no longer active.
    pub enable_value: Option<LineValue>,
    pub trigger_value: Option<LineValue>,
    pub torch_brightness: u32,
    pub history: Vec<StateTransition>,
}

/// One attached flash device.
pub struct DeviceContext {
    name: String,
    enable_line: LineId,
    trigger_line: LineId,
    platform: Platform,
    actuator: Arc<Actuator>,
    flash_on: Arc<FlashOnAttribute>,
    torch: Option<Arc<TorchLed>>,
    attribute_handle: Option<SurfaceHandle>,
    torch_handle: Option<SurfaceHandle>,
}

impl DeviceContext {
    /// Attach a device.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if an entry is missing or invalid
    /// - `Error::ResourceBusy` / `Error::InvalidLine` if a line cannot be owned
    /// - `Error::Registration` if a surface cannot be published
    ///
    /// On error no line is left owned and no surface is left published.
    pub fn attach(
        name: impl Into<String>,
        description: &dyn HardwareDescription,
        platform: &Platform,
        config: &DriverConfig,
    ) -> Result<Self> {
        let name = name.into();

        let resolved = resolver::resolve(description, &config.lines)?;
        let enable = OwnedLine::acquire(
            Arc::clone(&platform.lines),
            resolved.enable,
            LineRole::Enable,
        )
        .inspect_err(|e| error!("{name}: Failed to request flash_en GPIO: {e}"))?;
        // On failure `enable` is dropped here, which frees it.
        let trigger = OwnedLine::acquire(
            Arc::clone(&platform.lines),
            resolved.trigger,
            LineRole::Trigger,
        )
        .inspect_err(|e| error!("{name}: Failed to request flash_now GPIO: {e}"))?;

        let actuator = Arc::new(Actuator::new(FlashLines { enable, trigger }));
        let flash_on = Arc::new(FlashOnAttribute::new(Arc::clone(&actuator)));

        let mut context = Self {
            name,
            enable_line: resolved.enable,
            trigger_line: resolved.trigger,
            platform: platform.clone(),
            actuator,
            flash_on,
            torch: None,
            attribute_handle: None,
            torch_handle: None,
        };

        let published = context
            .actuator
            .activate()
            .and_then(|()| context.publish(config));
        if let Err(e) = published {
            error!("{}: Failed to publish surfaces: {}", context.name, e);
            // Already logged per surface.
            let _ = context.unpublish();
            if let Err(release_err) = context.actuator.fail() {
                warn!("{}: rollback incomplete: {}", context.name, release_err);
            }
            return Err(e);
        }

        info!(
            "Flashlight driver initialized with flash_en GPIO {} and flash_now GPIO {}",
            context.enable_line, context.trigger_line
        );
        Ok(context)
    }

    fn publish(&mut self, config: &DriverConfig) -> Result<()> {
        let attribute = &config.attribute;
        let handle = self.platform.attributes.publish(
            &attribute.dir,
            &attribute.name,
            attribute.mode,
            Arc::clone(&self.flash_on) as Arc<dyn Attribute>,
        )?;
        self.attribute_handle = Some(handle);

        if config.torch.enabled {
            let torch = Arc::new(TorchLed::new(Arc::clone(&self.actuator)));
            let led = LedDescriptor::new(&config.torch.name, config.torch.max_brightness);
            let sink = Arc::clone(&torch) as Arc<dyn BrightnessSink>;
            let handle = self.platform.leds.register(led, sink)?;
            self.torch = Some(torch);
            self.torch_handle = Some(handle);
        }
        Ok(())
    }

    /// Unpublish whatever is published, torch first. Returns the first error
    /// after attempting both.
    fn unpublish(&mut self) -> Result<()> {
        let mut result = Ok(());

        if let Some(handle) = self.torch_handle.take() {
            if let Err(e) = self.platform.leds.unregister(handle) {
                warn!("{}: Failed to unregister torch: {}", self.name, e);
                result = Err(e.into());
            }
        }
        if let Some(handle) = self.attribute_handle.take() {
            if let Err(e) = self.platform.attributes.unpublish(handle) {
                warn!("{}: Failed to remove attribute: {}", self.name, e);
                if result.is_ok() {
                    result = Err(e.into());
                }
            }
        }
        self.torch = None;
        result
    }

    /// Tear the device down: unpublish both surfaces, then release both
    /// lines.
    ///
    /// Teardown always runs to completion; the first error encountered is
    /// returned afterwards.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the device is not Active.
    pub fn detach(&mut self) -> Result<()> {
        let state = self.actuator.state();
        if state != DeviceState::Active {
            return Err(Error::InvalidStateTransition {
                from: state,
                to: DeviceState::Inactive,
            });
        }

        info!("Removing flashlight driver ({})", self.name);
        let unpublished = self.unpublish();
        let released = self.actuator.deactivate();
        unpublished.and(released)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> DeviceState {
        self.actuator.state()
    }

    pub fn enable_line(&self) -> LineId {
        self.enable_line
    }

    pub fn trigger_line(&self) -> LineId {
        self.trigger_line
    }

    /// Raw `flash_on` surface.
    pub fn flash_on(&self) -> &Arc<FlashOnAttribute> {
        &self.flash_on
    }

    /// Torch surface, if registered.
    pub fn torch(&self) -> Option<&Arc<TorchLed>> {
        self.torch.as_ref()
    }

    pub fn actuator(&self) -> &Arc<Actuator> {
        &self.actuator
    }

    pub fn status(&self) -> DeviceStatus {
        DeviceStatus {
            name: self.name.clone(),
            state: self.actuator.state(),
            enable_line: self.enable_line,
            trigger_line: self.trigger_line,
            enable_value: self.actuator.enable_value().ok(),
            trigger_value: self.actuator.trigger_value().ok(),
            torch_brightness: self.actuator.torch_brightness(),
            history: self.actuator.history(),
        }
    }
}

impl std::fmt::Debug for DeviceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceContext")
            .field("name", &self.name)
            .field("state", &self.actuator.state())
            .field("enable_line", &self.enable_line)
            .field("trigger_line", &self.trigger_line)
            .finish()
    }
}

impl Drop for DeviceContext {
    fn drop(&mut self) {
        if self.actuator.state() == DeviceState::Active {
            if let Err(e) = self.detach() {
                warn!("{}: teardown on drop: {}", self.name, e);
            }
        }
    }
}
