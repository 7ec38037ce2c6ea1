//! `led:torch` brightness sink driving the trigger line.

use std::sync::Arc;

use flashlight_hardware::BrightnessSink;
use tracing::{debug, warn};

use crate::actuator::Actuator;

/// Torch LED registered with the illumination-device registry.
///
/// The registry calls [`set_brightness`](BrightnessSink::set_brightness);
/// any positive value fires the trigger line, zero releases it. Read-back
/// reports the last brightness set here, not the line.
#[derive(Debug)]
pub struct TorchLed {
    actuator: Arc<Actuator>,
}

impl TorchLed {
    pub fn new(actuator: Arc<Actuator>) -> Self {
        Self { actuator }
    }
}

impl BrightnessSink for TorchLed {
    fn set_brightness(&self, value: u32) {
        debug!("torch brightness {}", value);
        if let Err(e) = self.actuator.set_torch(value) {
            warn!("Ignoring torch brightness {}: {}", value, e);
        }
    }

    fn brightness(&self) -> u32 {
        self.actuator.torch_brightness()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::FlashLines;
    use crate::line::OwnedLine;
    use flashlight_core::{LineId, LineRole, LineValue};
    use flashlight_hardware::LineController;
    use flashlight_hardware::mock::MockGpioChip;

    const TRIGGER: i64 = 13;

    fn line(n: i64) -> LineId {
        LineId::new(n).unwrap()
    }

    fn torch(chip: &MockGpioChip) -> (TorchLed, Arc<Actuator>) {
        let controller: Arc<dyn LineController> = Arc::new(chip.clone());
        let enable = OwnedLine::acquire(controller.clone(), line(12), LineRole::Enable);
        let trigger = OwnedLine::acquire(controller, line(TRIGGER), LineRole::Trigger);
        let lines = FlashLines {
            enable: enable.unwrap(),
            trigger: trigger.unwrap(),
        };
        let actuator = Arc::new(Actuator::new(lines));
        (TorchLed::new(Arc::clone(&actuator)), actuator)
    }

    #[test]
    fn test_brightness_drives_trigger() {
        let chip = MockGpioChip::default();
        let (torch, actuator) = torch(&chip);
        actuator.activate().unwrap();

        torch.set_brightness(1);
        assert_eq!(chip.value(line(TRIGGER)), Some(LineValue::HIGH));
        assert_eq!(torch.brightness(), 1);

        torch.set_brightness(0);
        assert_eq!(chip.value(line(TRIGGER)), Some(LineValue::LOW));
        assert_eq!(torch.brightness(), 0);
    }

    #[test]
    fn test_ignored_when_inactive() {
        let chip = MockGpioChip::default();
        let (torch, _actuator) = torch(&chip);

        torch.set_brightness(1);
        assert_eq!(chip.value(line(TRIGGER)), Some(LineValue::LOW));
        assert_eq!(torch.brightness(), 0);
    }
}
