//! Table-backed hardware description.
//!
//! [`GpioTable`] maps collection names to ordered lists of raw line numbers,
//! the same shape a `*-gpios` property has in a device tree node. It is
//! loaded from configuration by the CLI and built inline by tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HardwareError, Result};
use crate::traits::HardwareDescription;

/// Named collections of raw line numbers.
///
/// Entries may be negative to model lookups that fail with an error code
/// (for example a provider that has not probed yet).
///
/// # Examples
///
/// ```
/// use flashlight_hardware::description::GpioTable;
///
/// let table: GpioTable =
///     serde_json::from_str(r#"{ "qcom,flash-gpios": [12, 13] }"#).unwrap();
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GpioTable {
    collections: BTreeMap<String, Vec<i64>>,
}

impl GpioTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a collection.
    pub fn with_collection(
        mut self,
        name: impl Into<String>,
        lines: impl IntoIterator<Item = i64>,
    ) -> Self {
        self.collections
            .insert(name.into(), lines.into_iter().collect());
        self
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl HardwareDescription for GpioTable {
    fn resolve(&self, collection: &str, index: u32) -> Result<i64> {
        self.collections
            .get(collection)
            .and_then(|lines| lines.get(index as usize))
            .copied()
            .ok_or_else(|| HardwareError::not_found(collection, index))
    }
}
