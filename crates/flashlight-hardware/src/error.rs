//! Error types for hardware collaborator operations.
//!
//! These are the failures reported by the pieces the driver talks to: the
//! hardware description, the line controller, and the two surface
//! registries. The driver converts them into [`flashlight_core::Error`]
//! through the `From` impl at the bottom of this module.

use flashlight_core::LineId;

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware collaborator operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// No entry at the given index of a hardware description collection.
    #[error("No entry {collection}[{index}] in hardware description")]
    NotFound { collection: String, index: u32 },

    /// Line is already requested by another consumer.
    #[error("Line {line} busy (owned by {owner})")]
    LineBusy { line: LineId, owner: String },

    /// Line cannot be driven as an output.
    #[error("Line {line} cannot be used as output: {reason}")]
    InvalidLine { line: LineId, reason: String },

    /// Operation on a line this controller never handed out.
    #[error("Line {line} is not requested")]
    NotRequested { line: LineId },

    /// A surface with the same name is already published.
    #[error("Name already registered: {name}")]
    DuplicateName { name: String },

    /// Handle does not refer to a published surface.
    #[error("Not registered: {name}")]
    NotRegistered { name: String },

    /// No attribute published at the given path.
    #[error("No such attribute: {path}")]
    NoSuchAttribute { path: String },

    /// Attribute mode does not allow the access.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new not found error.
    pub fn not_found(collection: impl Into<String>, index: u32) -> Self {
        Self::NotFound {
            collection: collection.into(),
            index,
        }
    }

    /// Create a new line busy error.
    pub fn line_busy(line: LineId, owner: impl Into<String>) -> Self {
        Self::LineBusy {
            line,
            owner: owner.into(),
        }
    }

    /// Create a new invalid line error.
    pub fn invalid_line(line: LineId, reason: impl Into<String>) -> Self {
        Self::InvalidLine {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new duplicate name error.
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create a new not registered error.
    pub fn not_registered(name: impl Into<String>) -> Self {
        Self::NotRegistered { name: name.into() }
    }
}

impl From<HardwareError> for flashlight_core::Error {
    fn from(error: HardwareError) -> Self {
        use flashlight_core::Error;

        match error {
            HardwareError::NotFound { .. } => Error::config(error.to_string()),
            HardwareError::LineBusy { line, .. } => Error::ResourceBusy { line },
            HardwareError::InvalidLine { line, .. } => Error::invalid_line(line),
            HardwareError::DuplicateName { ref name } => {
                Error::registration(name.clone(), error.to_string())
            }
            other => Error::Hardware(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashlight_core::Error;

    fn line(n: i64) -> LineId {
        LineId::new(n).unwrap()
    }

    #[test]
    fn test_not_found_error() {
        let error = HardwareError::not_found("qcom,flash-gpios", 1);
        assert_eq!(
            error.to_string(),
            "No entry qcom,flash-gpios[1] in hardware description"
        );
        assert!(matches!(Error::from(error), Error::Config(_)));
    }

    #[test]
    fn test_line_busy_maps_to_resource_busy() {
        let error = HardwareError::line_busy(line(12), "camera");
        assert_eq!(error.to_string(), "Line 12 busy (owned by camera)");
        match Error::from(error) {
            Error::ResourceBusy { line: l } => assert_eq!(l, line(12)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_line_maps_to_invalid_line() {
        let error = HardwareError::invalid_line(line(7), "input only");
        assert!(matches!(Error::from(error), Error::InvalidLine { .. }));
    }

    #[test]
    fn test_duplicate_name_maps_to_registration() {
        let error = HardwareError::duplicate_name("led:torch");
        match Error::from(error) {
            Error::Registration { name, .. } => assert_eq!(name, "led:torch"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_errors_map_to_hardware() {
        let error = HardwareError::NotRequested { line: line(3) };
        assert!(matches!(Error::from(error), Error::Hardware(_)));
    }
}
