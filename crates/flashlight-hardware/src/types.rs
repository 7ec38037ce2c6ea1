//! Types shared between the surface registries and their users.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Registration token returned when a surface is published.
///
/// The token is the only way to unpublish the surface. It is deliberately
/// not `Clone`: unpublishing consumes it, so a surface cannot be removed
/// twice through the same token.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SurfaceHandle {
    id: u64,
    name: String,
}

impl SurfaceHandle {
    /// Create a new handle. Intended for registry implementations.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Registry-assigned identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Name the surface was published under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// Description of an LED device offered to an [`LedRegistry`].
///
/// [`LedRegistry`]: crate::traits::LedRegistry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedDescriptor {
    /// Canonical device name (e.g., "led:torch").
    pub name: String,

    /// Highest brightness the registry will pass to the sink.
    pub max_brightness: u32,
}

impl LedDescriptor {
    pub fn new(name: impl Into<String>, max_brightness: u32) -> Self {
        Self {
            name: name.into(),
            max_brightness,
        }
    }
}
