//! Resolution of the enable and trigger entries to line numbers.

use flashlight_core::{Error, HardwareLineSpec, LineId, LineRole, Result};
use flashlight_hardware::HardwareDescription;
use tracing::error;

/// Line numbers for both roles, validated but not yet owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLines {
    pub enable: LineId,
    pub trigger: LineId,
}

/// Resolve both entries of `spec`, enable first.
///
/// Nothing is acquired here; the caller requests the lines only after both
/// have resolved, so a bad trigger entry never leaves an enable line behind.
///
/// # Errors
///
/// Returns `Error::Config` if an entry is missing from the description or
/// names an invalid line.
pub fn resolve(
    description: &dyn HardwareDescription,
    spec: &HardwareLineSpec,
) -> Result<ResolvedLines> {
    let enable = resolve_role(description, spec, LineRole::Enable)?;
    let trigger = resolve_role(description, spec, LineRole::Trigger)?;
    Ok(ResolvedLines { enable, trigger })
}

fn resolve_role(
    description: &dyn HardwareDescription,
    spec: &HardwareLineSpec,
    role: LineRole,
) -> Result<LineId> {
    let entry = spec.entry(role);
    let raw = description
        .resolve(&entry.collection, entry.index)
        .map_err(|e| {
            error!("Missing GPIO for {}: {}", role.label(), e);
            Error::from(e)
        })?;

    LineId::new(raw).map_err(|_| {
        error!("Invalid GPIO for {}: {}", role.label(), raw);
        Error::config(format!("{entry} resolves to invalid line {raw}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashlight_hardware::{GpioTable, HardwareError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn spec() -> HardwareLineSpec {
        HardwareLineSpec::default()
    }

    /// Description that counts lookups.
    struct Counting {
        table: GpioTable,
        calls: AtomicUsize,
    }

    impl HardwareDescription for Counting {
        fn resolve(&self, collection: &str, index: u32) -> flashlight_hardware::Result<i64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table.resolve(collection, index)
        }
    }

    #[test]
    fn test_resolves_both_lines() {
        let table = GpioTable::new().with_collection("qcom,flash-gpios", [12, 13]);
        let lines = resolve(&table, &spec()).unwrap();
        assert_eq!(lines.enable.as_u32(), 12);
        assert_eq!(lines.trigger.as_u32(), 13);
    }

    #[test]
    fn test_looks_up_exactly_twice() {
        let counting = Counting {
            table: GpioTable::new().with_collection("qcom,flash-gpios", [12, 13]),
            calls: AtomicUsize::new(0),
        };
        resolve(&counting, &spec()).unwrap();
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_trigger_is_config_error() {
        let table = GpioTable::new().with_collection("qcom,flash-gpios", [12]);
        let result = resolve(&table, &spec());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_negative_entry_is_config_error() {
        let table = GpioTable::new().with_collection("qcom,flash-gpios", [-517, 13]);
        match resolve(&table, &spec()) {
            Err(Error::Config(message)) => assert!(message.contains("-517")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_entry_is_config_error() {
        let table = GpioTable::new().with_collection("qcom,flash-gpios", [12, 4096]);
        assert!(matches!(resolve(&table, &spec()), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_collection_reports_not_found() {
        let table = GpioTable::new();
        let err = resolve(&table, &spec()).unwrap_err();
        let expected = Error::from(HardwareError::not_found("qcom,flash-gpios", 0));
        assert_eq!(err.to_string(), expected.to_string());
    }
}
