//! Line controller backed by the legacy `/sys/class/gpio` interface.
//!
//! A line is requested by writing its number to `export`, configured with
//! `gpioN/direction` (`low` sets output and drives low in one step) and
//! driven through `gpioN/value`. `unexport` gives it back.
//!
//! The kernel reports `EBUSY` from `export` when another consumer already
//! holds the line and `EINVAL` for a number it does not know.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use flashlight_core::{LineId, LineValue};
use tracing::{debug, warn};

use crate::error::{HardwareError, Result};
use crate::traits::LineController;

/// Default mount point of the GPIO class directory.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Sysfs GPIO line controller.
///
/// Only the least significant bit of a value reaches the pin, so reading a
/// line back reports `0` or `1` regardless of what was written.
#[derive(Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    exported: Mutex<HashSet<LineId>>,
}

impl SysfsGpio {
    /// Controller rooted at [`SYSFS_GPIO_ROOT`].
    pub fn new() -> Self {
        Self::with_root(SYSFS_GPIO_ROOT)
    }

    /// Controller rooted at a custom directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exported: Mutex::new(HashSet::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn line_dir(&self, line: LineId) -> PathBuf {
        self.root.join(format!("gpio{line}"))
    }

    fn exported(&self) -> MutexGuard<'_, HashSet<LineId>> {
        self.exported.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_exported(&self, line: LineId) -> Result<()> {
        if self.exported().contains(&line) {
            Ok(())
        } else {
            Err(HardwareError::NotRequested { line })
        }
    }

    fn unexport(&self, line: LineId) -> Result<()> {
        fs::write(self.root.join("unexport"), line.to_string())?;
        Ok(())
    }
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl LineController for SysfsGpio {
    fn request_output(&self, line: LineId, label: &str, initial: LineValue) -> Result<()> {
        let mut exported = self.exported();
        if exported.contains(&line) {
            return Err(HardwareError::line_busy(line, "this process"));
        }

        fs::write(self.root.join("export"), line.to_string()).map_err(|e| match e.kind() {
            ErrorKind::ResourceBusy => HardwareError::line_busy(line, "another consumer"),
            ErrorKind::InvalidInput => HardwareError::invalid_line(line, "unknown to the kernel"),
            _ => HardwareError::Io(e),
        })?;

        let direction = if initial.is_high() { "high" } else { "low" };
        if let Err(e) = fs::write(self.line_dir(line).join("direction"), direction) {
            warn!("gpio{}: cannot configure as output: {}", line, e);
            if let Err(e) = self.unexport(line) {
                warn!("gpio{}: unexport after failed request: {}", line, e);
            }
            return Err(HardwareError::invalid_line(line, e.to_string()));
        }

        debug!("gpio{}: exported for {} ({})", line, label, direction);
        exported.insert(line);
        Ok(())
    }

    fn free(&self, line: LineId) -> Result<()> {
        if !self.exported().remove(&line) {
            return Err(HardwareError::NotRequested { line });
        }
        self.unexport(line)?;
        debug!("gpio{}: unexported", line);
        Ok(())
    }

    fn set_value(&self, line: LineId, value: LineValue) -> Result<()> {
        self.ensure_exported(line)?;
        let level = if value.is_high() { "1" } else { "0" };
        fs::write(self.line_dir(line).join("value"), level)?;
        Ok(())
    }

    fn get_value(&self, line: LineId) -> Result<LineValue> {
        self.ensure_exported(line)?;
        let text = fs::read_to_string(self.line_dir(line).join("value"))?;
        let raw = text.trim().parse::<u64>().map_err(|e| {
            HardwareError::Io(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("gpio{line}/value: {e}"),
            ))
        })?;
        Ok(LineValue::new(raw))
    }
}
