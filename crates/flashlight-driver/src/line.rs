//! Exclusively-owned output lines.
//!
//! An [`OwnedLine`] is the only way the driver writes to a line. It is
//! created by requesting the line from a [`LineController`] at logical low
//! and gives the line back exactly once: either through
//! [`release`](OwnedLine::release), which consumes it, or on drop.

use std::fmt;
use std::sync::Arc;

use flashlight_core::{LineId, LineRole, LineValue, Result};
use flashlight_hardware::LineController;
use tracing::{debug, warn};

/// A line requested as an output and owned by one device context.
pub struct OwnedLine {
    id: LineId,
    role: LineRole,
    controller: Arc<dyn LineController>,
    released: bool,
}

impl OwnedLine {
    /// Request `id` for `role`, driving it low immediately.
    ///
    /// # Errors
    ///
    /// Returns `Error::ResourceBusy` if another consumer owns the line and
    /// `Error::InvalidLine` if it cannot be an output.
    pub fn acquire(
        controller: Arc<dyn LineController>,
        id: LineId,
        role: LineRole,
    ) -> Result<Self> {
        controller.request_output(id, role.label(), LineValue::LOW)?;
        debug!("Acquired GPIO {} as {}", id, role.label());
        Ok(Self {
            id,
            role,
            controller,
            released: false,
        })
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn role(&self) -> LineRole {
        self.role
    }

    /// Drive the line.
    pub fn set(&self, value: LineValue) -> Result<()> {
        self.controller.set_value(self.id, value)?;
        Ok(())
    }

    /// Read the line back from the controller.
    pub fn get(&self) -> Result<LineValue> {
        Ok(self.controller.get_value(self.id)?)
    }

    /// Give the line back to the controller.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.controller.free(self.id)?;
        debug!("Released GPIO {} ({})", self.id, self.role.label());
        Ok(())
    }
}

impl fmt::Debug for OwnedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedLine")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("released", &self.released)
            .finish()
    }
}

impl Drop for OwnedLine {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.controller.free(self.id) {
            let label = self.role.label();
            warn!("Failed to free GPIO {} ({label}): {e}", self.id);
        }
    }
}
