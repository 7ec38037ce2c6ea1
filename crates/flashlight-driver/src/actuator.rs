//! Shared actuator state behind both control surfaces.
//!
//! The actuator state is not stored anywhere as a copy: it is the pair of
//! owned line values, and every read goes to the line controller. One mutex
//! guards both lines, the lifecycle and the torch read-back value, so calls
//! from any number of threads are applied one at a time in the order they
//! take the lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use flashlight_core::{DeviceState, Error, LineValue, Result, constants::LED_OFF};
use tracing::warn;

use crate::lifecycle::{Lifecycle, StateTransition};
use crate::line::OwnedLine;

/// The two owned lines of one flash device.
#[derive(Debug)]
pub struct FlashLines {
    pub enable: OwnedLine,
    pub trigger: OwnedLine,
}

impl FlashLines {
    fn release(self) -> Result<()> {
        let enable = self.enable.release();
        let trigger = self.trigger.release();
        enable.and(trigger)
    }
}

#[derive(Debug)]
struct Inner {
    lifecycle: Lifecycle,
    lines: Option<FlashLines>,
    torch_brightness: u32,
}

/// Actuator shared by the raw attribute and the torch LED.
#[derive(Debug)]
pub struct Actuator {
    inner: Mutex<Inner>,
}

impl Actuator {
    /// Wrap freshly acquired lines. The actuator starts Uninitialized and
    /// rejects surface calls until [`activate`](Self::activate).
    pub(crate) fn new(lines: FlashLines) -> Self {
        Self {
            inner: Mutex::new(Inner {
                lifecycle: Lifecycle::new(),
                lines: Some(lines),
                torch_brightness: LED_OFF,
            }),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.inner().lifecycle.current_state()
    }

    /// Recorded lifecycle transitions, oldest first.
    pub fn history(&self) -> Vec<StateTransition> {
        self.inner().lifecycle.history().iter().cloned().collect()
    }

    pub(crate) fn activate(&self) -> Result<()> {
        self.inner().lifecycle.transition_to(DeviceState::Active)
    }

    /// Abort an attach: mark Failed and release both lines. Valid from
    /// Uninitialized and from Active.
    pub(crate) fn fail(&self) -> Result<()> {
        self.shutdown(DeviceState::Failed)
    }

    /// Tear down: mark Inactive and release both lines.
    pub(crate) fn deactivate(&self) -> Result<()> {
        self.shutdown(DeviceState::Inactive)
    }

    fn shutdown(&self, target: DeviceState) -> Result<()> {
        let lines = {
            let mut inner = self.inner();
            inner.lifecycle.transition_to(target)?;
            inner.lines.take()
        };
        match lines {
            Some(lines) => lines.release(),
            None => Ok(()),
        }
    }

    /// Current value of the enable line.
    pub fn enable_value(&self) -> Result<LineValue> {
        self.with_lines(|lines| lines.enable.get())
    }

    /// Drive the enable line with a raw value, unclamped.
    pub fn set_enable(&self, value: LineValue) -> Result<()> {
        self.with_lines(|lines| lines.enable.set(value))
    }

    /// Current value of the trigger line.
    pub fn trigger_value(&self) -> Result<LineValue> {
        self.with_lines(|lines| lines.trigger.get())
    }

    /// Apply a torch brightness: any positive value fires the trigger line.
    pub fn set_torch(&self, brightness: u32) -> Result<()> {
        let mut inner = self.inner();
        let lines = Self::active_lines(&inner)?;
        lines.trigger.set(trigger_level(brightness))?;
        inner.torch_brightness = brightness;
        Ok(())
    }

    /// Last brightness applied through the torch surface.
    pub fn torch_brightness(&self) -> u32 {
        self.inner().torch_brightness
    }

    fn with_lines<T>(&self, f: impl FnOnce(&FlashLines) -> Result<T>) -> Result<T> {
        let inner = self.inner();
        f(Self::active_lines(&inner)?)
    }

    fn active_lines(inner: &Inner) -> Result<&FlashLines> {
        match &inner.lines {
            Some(lines) if inner.lifecycle.is_active() => Ok(lines),
            _ => Err(Error::NotActive {
                state: inner.lifecycle.current_state(),
            }),
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("Actuator lock poisoned, continuing");
            PoisonError::into_inner(poisoned)
        })
    }
}

/// Trigger level for a torch brightness.
pub fn trigger_level(brightness: u32) -> LineValue {
    LineValue::from(brightness > LED_OFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashlight_core::{LineId, LineRole};
    use flashlight_hardware::LineController;
    use flashlight_hardware::mock::MockGpioChip;
    use rstest::rstest;
    use std::sync::Arc;

    fn line(n: i64) -> LineId {
        LineId::new(n).unwrap()
    }

    fn actuator(chip: &MockGpioChip) -> Actuator {
        let controller: Arc<dyn LineController> = Arc::new(chip.clone());
        let enable = OwnedLine::acquire(controller.clone(), line(12), LineRole::Enable);
        let trigger = OwnedLine::acquire(controller, line(13), LineRole::Trigger);
        let lines = FlashLines {
            enable: enable.unwrap(),
            trigger: trigger.unwrap(),
        };
        Actuator::new(lines)
    }

    #[rstest]
    #[case(0, LineValue::LOW)]
    #[case(1, LineValue::HIGH)]
    #[case(255, LineValue::HIGH)]
    #[case(u32::MAX, LineValue::HIGH)]
    fn test_trigger_level(#[case] brightness: u32, #[case] expected: LineValue) {
        assert_eq!(trigger_level(brightness), expected);
    }

    #[test]
    fn test_rejects_calls_before_activation() {
        let chip = MockGpioChip::default();
        let actuator = actuator(&chip);

        let result = actuator.set_enable(LineValue::HIGH);
        assert!(matches!(
            result,
            Err(Error::NotActive {
                state: DeviceState::Uninitialized
            })
        ));
        assert_eq!(chip.value(line(12)), Some(LineValue::LOW));
    }

    #[test]
    fn test_reads_go_to_the_line() {
        let chip = MockGpioChip::default();
        let actuator = actuator(&chip);
        actuator.activate().unwrap();

        actuator.set_enable(LineValue::new(5)).unwrap();
        assert_eq!(actuator.enable_value().unwrap(), LineValue::new(5));

        // A change made below the actuator is visible immediately.
        chip.set_value(line(12), LineValue::LOW).unwrap();
        assert_eq!(actuator.enable_value().unwrap(), LineValue::LOW);
    }

    #[test]
    fn test_torch_drives_trigger_only() {
        let chip = MockGpioChip::default();
        let actuator = actuator(&chip);
        actuator.activate().unwrap();

        actuator.set_torch(1).unwrap();
        assert_eq!(actuator.trigger_value().unwrap(), LineValue::HIGH);
        assert_eq!(actuator.enable_value().unwrap(), LineValue::LOW);
        assert_eq!(actuator.torch_brightness(), 1);
    }

    #[test]
    fn test_deactivate_releases_lines() {
        let chip = MockGpioChip::default();
        let actuator = actuator(&chip);
        actuator.activate().unwrap();
        actuator.deactivate().unwrap();

        assert_eq!(chip.requested_count(), 0);
        assert_eq!(actuator.state(), DeviceState::Inactive);
        assert!(matches!(
            actuator.enable_value(),
            Err(Error::NotActive {
                state: DeviceState::Inactive
            })
        ));
        assert!(actuator.deactivate().is_err());
    }

    #[test]
    fn test_fail_after_activation_releases_lines() {
        let chip = MockGpioChip::default();
        let actuator = actuator(&chip);
        actuator.activate().unwrap();
        actuator.set_torch(1).unwrap();

        actuator.fail().unwrap();
        assert_eq!(chip.requested_count(), 0);
        assert_eq!(actuator.state(), DeviceState::Failed);
        assert!(actuator.trigger_value().is_err());
    }

    #[test]
    fn test_fail_releases_lines() {
        let chip = MockGpioChip::default();
        let actuator = actuator(&chip);
        actuator.fail().unwrap();

        assert_eq!(chip.requested_count(), 0);
        assert_eq!(actuator.state(), DeviceState::Failed);
        assert_eq!(actuator.history().len(), 1);
    }
}
