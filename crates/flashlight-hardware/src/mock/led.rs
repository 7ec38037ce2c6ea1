//! In-memory LED registry for testing and development.
//!
//! Behaves like an LED class core: names are unique, writes from user space
//! are clamped to the registered maximum before they reach the sink, and an
//! LED is switched off when it is unregistered.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{HardwareError, Result};
use crate::traits::{BrightnessSink, LedRegistry};
use crate::types::{LedDescriptor, SurfaceHandle};

struct RegisteredLed {
    id: u64,
    max_brightness: u32,
    sink: Arc<dyn BrightnessSink>,
}

/// Mock LED registry.
///
/// Clones share state. Tests and the CLI act as user space through
/// [`set_brightness`](Self::set_brightness) and
/// [`brightness`](Self::brightness).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use flashlight_hardware::mock::MockLedRegistry;
/// use flashlight_hardware::traits::{BrightnessSink, LedRegistry};
/// use flashlight_hardware::LedDescriptor;
///
/// #[derive(Default)]
/// struct Lamp(AtomicU32);
///
/// impl BrightnessSink for Lamp {
///     fn set_brightness(&self, value: u32) {
///         self.0.store(value, Ordering::SeqCst);
///     }
///     fn brightness(&self) -> u32 {
///         self.0.load(Ordering::SeqCst)
///     }
/// }
///
/// let registry = MockLedRegistry::new();
/// registry
///     .register(LedDescriptor::new("led:torch", 1), Arc::new(Lamp::default()))
///     .unwrap();
///
/// registry.set_brightness("led:torch", 255).unwrap();
/// assert_eq!(registry.brightness("led:torch").unwrap(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockLedRegistry {
    leds: Arc<Mutex<BTreeMap<String, RegisteredLed>>>,
    next_id: Arc<AtomicU64>,
}

impl MockLedRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a brightness to a registered LED, as user space would.
    ///
    /// The value is clamped to the LED's maximum before the sink sees it.
    ///
    /// # Errors
    ///
    /// Returns `NotRegistered` if no LED has this name.
    pub fn set_brightness(&self, name: &str, value: u32) -> Result<()> {
        let (sink, max_brightness) = {
            let leds = self.leds();
            let led = leds
                .get(name)
                .ok_or_else(|| HardwareError::not_registered(name))?;
            (Arc::clone(&led.sink), led.max_brightness)
        };

        let clamped = value.min(max_brightness);
        debug!("{}: brightness {} (requested {})", name, clamped, value);
        sink.set_brightness(clamped);
        Ok(())
    }

    /// Read back the brightness of a registered LED.
    pub fn brightness(&self, name: &str) -> Result<u32> {
        let sink = self.sink(name)?;
        Ok(sink.brightness())
    }

    /// Maximum brightness an LED was registered with.
    pub fn max_brightness(&self, name: &str) -> Option<u32> {
        self.leds().get(name).map(|led| led.max_brightness)
    }

    /// Check whether an LED with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.leds().contains_key(name)
    }

    /// Names of all registered LEDs, sorted.
    pub fn names(&self) -> Vec<String> {
        self.leds().keys().cloned().collect()
    }

    fn sink(&self, name: &str) -> Result<Arc<dyn BrightnessSink>> {
        self.leds()
            .get(name)
            .map(|led| Arc::clone(&led.sink))
            .ok_or_else(|| HardwareError::not_registered(name))
    }

    fn leds(&self) -> MutexGuard<'_, BTreeMap<String, RegisteredLed>> {
        self.leds.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MockLedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLedRegistry")
            .field("leds", &self.names())
            .finish()
    }
}

impl LedRegistry for MockLedRegistry {
    fn register(&self, led: LedDescriptor, sink: Arc<dyn BrightnessSink>) -> Result<SurfaceHandle> {
        let mut leds = self.leds();
        if leds.contains_key(&led.name) {
            return Err(HardwareError::duplicate_name(led.name));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        leds.insert(
            led.name.clone(),
            RegisteredLed {
                id,
                max_brightness: led.max_brightness,
                sink,
            },
        );
        Ok(SurfaceHandle::new(id, led.name))
    }

    fn unregister(&self, handle: SurfaceHandle) -> Result<()> {
        let removed = {
            let mut leds = self.leds();
            let current = leds
                .get(handle.name())
                .is_some_and(|led| led.id == handle.id());
            if current {
                leds.remove(handle.name())
            } else {
                None
            }
        };

        let led = removed
            .ok_or_else(|| HardwareError::not_registered(handle.name()))?;
        led.sink.set_brightness(0);
        Ok(())
    }
}
