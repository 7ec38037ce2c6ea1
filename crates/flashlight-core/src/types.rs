use crate::{
    Result,
    constants::{
        ENABLE_LINE_INDEX, ENABLE_LINE_LABEL, FLASH_GPIOS_PROPERTY, MAX_LINE_COUNT,
        TRIGGER_LINE_INDEX, TRIGGER_LINE_LABEL,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated line number on the host platform.
///
/// Lookups in the hardware description hand back signed numbers where a
/// negative value is an error code, so construction takes an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct LineId(u32);

impl LineId {
    /// Create a new line id with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidLine` if the number is negative or not below
    /// [`MAX_LINE_COUNT`].
    pub fn new(raw: i64) -> Result<Self> {
        u32::try_from(raw)
            .ok()
            .filter(|n| *n < MAX_LINE_COUNT)
            .map(LineId)
            .ok_or_else(|| Error::invalid_line(raw))
    }

    /// Get the raw line number.
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for LineId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        LineId::new(raw)
    }
}

impl From<LineId> for u32 {
    fn from(id: LineId) -> Self {
        id.0
    }
}

impl std::str::FromStr for LineId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw: i64 = s.trim().parse().map_err(|e| Error::parse(s, e))?;
        LineId::new(raw)
    }
}

/// Raw value commanded on an output line.
///
/// The raw attribute passes user input through unclamped, so this carries the
/// full unsigned value. The physical level is the least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineValue(u64);

impl LineValue {
    /// Logical low: flash off, not triggered.
    pub const LOW: LineValue = LineValue(0);

    /// Logical high.
    pub const HIGH: LineValue = LineValue(1);

    #[must_use]
    pub const fn new(raw: u64) -> Self {
        LineValue(raw)
    }

    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Level actually driven on the pin.
    #[must_use]
    pub const fn is_high(&self) -> bool {
        self.0 & 1 == 1
    }
}

impl From<bool> for LineValue {
    fn from(high: bool) -> Self {
        if high {
            LineValue::HIGH
        } else {
            LineValue::LOW
        }
    }
}

impl From<u64> for LineValue {
    fn from(raw: u64) -> Self {
        LineValue(raw)
    }
}

impl fmt::Display for LineValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of an owned line within the flash circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    /// Powers/arms the flash circuit.
    Enable,
    /// Fires illumination once armed.
    Trigger,
}

impl LineRole {
    /// Consumer label used when requesting the line.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            LineRole::Enable => ENABLE_LINE_LABEL,
            LineRole::Trigger => TRIGGER_LINE_LABEL,
        }
    }
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LineRole::Enable => write!(f, "enable"),
            LineRole::Trigger => write!(f, "trigger"),
        }
    }
}

/// One entry of the hardware description: a named collection and an index
/// into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRef {
    pub collection: String,
    pub index: u32,
}

impl LineRef {
    pub fn new(collection: impl Into<String>, index: u32) -> Self {
        Self {
            collection: collection.into(),
            index,
        }
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}]", self.collection, self.index)
    }
}

/// Where the enable and trigger lines are declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareLineSpec {
    pub enable: LineRef,
    pub trigger: LineRef,
}

impl HardwareLineSpec {
    /// Both lines taken from the same collection at the given indices.
    pub fn from_collection(collection: &str, enable_index: u32, trigger_index: u32) -> Self {
        Self {
            enable: LineRef::new(collection, enable_index),
            trigger: LineRef::new(collection, trigger_index),
        }
    }

    /// Entry for the given role.
    #[must_use]
    pub fn entry(&self, role: LineRole) -> &LineRef {
        match role {
            LineRole::Enable => &self.enable,
            LineRole::Trigger => &self.trigger,
        }
    }
}

impl Default for HardwareLineSpec {
    fn default() -> Self {
        Self::from_collection(FLASH_GPIOS_PROPERTY, ENABLE_LINE_INDEX, TRIGGER_LINE_INDEX)
    }
}

/// Lifecycle state of one attached flash device.
///
/// # Valid Transitions
///
/// - Uninitialized → Active → Inactive
/// - Uninitialized → Failed
/// - Active → Failed, when publishing a surface fails during attach
///
/// `Inactive` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    /// Lines not yet resolved or acquired.
    Uninitialized,
    /// Lines owned. Surfaces are published right after entering this state.
    Active,
    /// Torn down; lines released and surfaces unpublished.
    Inactive,
    /// Attach failed; everything acquired was released.
    Failed,
}

impl DeviceState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use flashlight_core::DeviceState;
    ///
    /// assert!(DeviceState::Uninitialized.can_transition_to(&DeviceState::Active));
    /// assert!(!DeviceState::Inactive.can_transition_to(&DeviceState::Active));
    /// ```
    pub fn can_transition_to(&self, target: &DeviceState) -> bool {
        matches!(
            (self, target),
            (
                DeviceState::Uninitialized,
                DeviceState::Active | DeviceState::Failed
            ) | (
                DeviceState::Active,
                DeviceState::Inactive | DeviceState::Failed
            )
        )
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            DeviceState::Uninitialized => "Uninitialized",
            DeviceState::Active => "Active",
            DeviceState::Inactive => "Inactive",
            DeviceState::Failed => "Failed",
        };
        write!(f, "{}", state_str)
    }
}
