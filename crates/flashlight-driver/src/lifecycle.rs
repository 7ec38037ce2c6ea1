//! Device lifecycle state machine.
//!
//! Tracks a device context through Uninitialized → Active → Inactive, or
//! into Failed when attach aborts. Transitions are validated with
//! [`DeviceState::can_transition_to`] and recorded in a bounded history.
//!
//! # Examples
//!
//! ```
//! use flashlight_core::DeviceState;
//! use flashlight_driver::Lifecycle;
//!
//! let mut lifecycle = Lifecycle::new();
//! lifecycle.transition_to(DeviceState::Active).unwrap();
//! lifecycle.transition_to(DeviceState::Inactive).unwrap();
//!
//! assert!(lifecycle.transition_to(DeviceState::Active).is_err());
//! assert_eq!(lifecycle.history().len(), 2);
//! ```

use std::collections::VecDeque;

use flashlight_core::{DeviceState, Error, Result};
use serde::Serialize;
use tracing::debug;

/// Maximum number of transitions kept in history.
///
/// A device goes through at most two transitions, so this only matters if a
/// lifecycle is reused for diagnostics.
const MAX_HISTORY_SIZE: usize = 8;

/// A single recorded state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub from: DeviceState,
    pub to: DeviceState,
}

impl StateTransition {
    pub fn new(from: DeviceState, to: DeviceState) -> Self {
        Self { from, to }
    }
}

/// Lifecycle of one device context.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    current_state: DeviceState,
    history: VecDeque<StateTransition>,
}

impl Lifecycle {
    /// Create a lifecycle in the Uninitialized state.
    pub fn new() -> Self {
        Self {
            current_state: DeviceState::Uninitialized,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> DeviceState {
        self.current_state
    }

    pub fn is_active(&self) -> bool {
        self.current_state == DeviceState::Active
    }

    /// Transitions from oldest to newest.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Move to `target`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the move is not allowed; the
    /// state is left unchanged.
    pub fn transition_to(&mut self, target: DeviceState) -> Result<()> {
        if !self.current_state.can_transition_to(&target) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state,
                to: target,
            });
        }

        debug!("Device state {} -> {}", self.current_state, target);
        if self.history.len() == MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        self.history
            .push_back(StateTransition::new(self.current_state, target));
        self.current_state = target;
        Ok(())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
