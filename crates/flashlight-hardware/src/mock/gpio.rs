//! Mock GPIO chip for testing and development.
//!
//! This module provides an in-memory line controller. It keeps the value
//! written to each requested line verbatim, which lets tests observe exactly
//! what the driver commanded, including raw values above 1.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use flashlight_core::{LineId, LineValue};

use crate::error::{HardwareError, Result};
use crate::traits::LineController;

#[derive(Debug)]
struct RequestedLine {
    label: String,
    value: LineValue,
    writes: Vec<LineValue>,
}

#[derive(Debug, Default)]
struct ChipState {
    requested: HashMap<LineId, RequestedLine>,
    input_only: BTreeSet<LineId>,
}

/// Mock GPIO chip.
///
/// Clones share state, so a test can keep one clone as a handle while the
/// driver owns another.
///
/// # Examples
///
/// ```
/// use flashlight_core::{LineId, LineValue};
/// use flashlight_hardware::mock::MockGpioChip;
/// use flashlight_hardware::traits::LineController;
///
/// let chip = MockGpioChip::new("gpiochip0");
/// let line = LineId::new(12).unwrap();
///
/// chip.request_output(line, "flash_en", LineValue::LOW).unwrap();
/// chip.set_value(line, LineValue::HIGH).unwrap();
///
/// assert_eq!(chip.value(line), Some(LineValue::HIGH));
/// assert_eq!(chip.owner(line).as_deref(), Some("flash_en"));
/// ```
#[derive(Debug, Clone)]
pub struct MockGpioChip {
    name: String,
    state: Arc<Mutex<ChipState>>,
}

impl MockGpioChip {
    /// Create a new chip where every valid line can be an output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(ChipState::default())),
        }
    }

    /// Mark a line as input-only; requesting it as an output fails.
    pub fn with_input_only(self, line: LineId) -> Self {
        self.state().input_only.insert(line);
        self
    }

    /// Chip name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether a line is currently requested.
    pub fn is_requested(&self, line: LineId) -> bool {
        self.state().requested.contains_key(&line)
    }

    /// Consumer label of a requested line.
    pub fn owner(&self, line: LineId) -> Option<String> {
        self.state()
            .requested
            .get(&line)
            .map(|requested| requested.label.clone())
    }

    /// Current value of a requested line.
    pub fn value(&self, line: LineId) -> Option<LineValue> {
        self.state()
            .requested
            .get(&line)
            .map(|requested| requested.value)
    }

    /// Every value written to a line since it was requested, in order,
    /// starting with the initial value.
    pub fn writes(&self, line: LineId) -> Vec<LineValue> {
        self.state()
            .requested
            .get(&line)
            .map(|requested| requested.writes.clone())
            .unwrap_or_default()
    }

    /// Number of lines currently requested.
    pub fn requested_count(&self) -> usize {
        self.state().requested.len()
    }

    fn state(&self) -> MutexGuard<'_, ChipState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockGpioChip {
    fn default() -> Self {
        Self::new("gpiochip0")
    }
}

impl LineController for MockGpioChip {
    fn request_output(&self, line: LineId, label: &str, initial: LineValue) -> Result<()> {
        let mut state = self.state();

        if let Some(existing) = state.requested.get(&line) {
            return Err(HardwareError::line_busy(line, existing.label.clone()));
        }
        if state.input_only.contains(&line) {
            return Err(HardwareError::invalid_line(line, "line is input-only"));
        }

        state.requested.insert(
            line,
            RequestedLine {
                label: label.to_string(),
                value: initial,
                writes: vec![initial],
            },
        );
        Ok(())
    }

    fn free(&self, line: LineId) -> Result<()> {
        self.state()
            .requested
            .remove(&line)
            .map(|_| ())
            .ok_or(HardwareError::NotRequested { line })
    }

    fn set_value(&self, line: LineId, value: LineValue) -> Result<()> {
        let mut state = self.state();
        let requested = state
            .requested
            .get_mut(&line)
            .ok_or(HardwareError::NotRequested { line })?;
        requested.value = value;
        requested.writes.push(value);
        Ok(())
    }

    fn get_value(&self, line: LineId) -> Result<LineValue> {
        self.value(line).ok_or(HardwareError::NotRequested { line })
    }
}
