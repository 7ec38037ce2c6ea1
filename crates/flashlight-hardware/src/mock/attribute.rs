//! In-memory attribute tree for testing and development.
//!
//! Stands in for a kobject directory: attributes are addressed as
//! `dir/name`, published once, and checked against their permission bits on
//! every read and write.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{HardwareError, Result};
use crate::traits::{Attribute, AttributeRegistry};
use crate::types::SurfaceHandle;

const MODE_READ: u32 = 0o400;
const MODE_WRITE: u32 = 0o200;

struct PublishedAttribute {
    id: u64,
    mode: u32,
    attribute: Arc<dyn Attribute>,
}

/// Mock attribute tree.
///
/// Clones share state. Reads and writes go through the published
/// [`Attribute`] exactly as a text file access would.
#[derive(Clone, Default)]
pub struct MockAttributeTree {
    attributes: Arc<Mutex<BTreeMap<String, PublishedAttribute>>>,
    next_id: Arc<AtomicU64>,
}

impl MockAttributeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an attribute by path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not published, the mode does not allow
    /// reading, or the attribute itself fails.
    pub fn read(&self, path: &str) -> flashlight_core::Result<String> {
        let attribute = self.lookup(path, MODE_READ)?;
        attribute.show()
    }

    /// Write text to an attribute by path. Returns the bytes consumed.
    pub fn write(&self, path: &str, text: &str) -> flashlight_core::Result<usize> {
        let attribute = self.lookup(path, MODE_WRITE)?;
        attribute.store(text)
    }

    /// Permission bits of a published attribute.
    pub fn mode(&self, path: &str) -> Option<u32> {
        self.attributes().get(path).map(|published| published.mode)
    }

    /// Check whether a path is published.
    pub fn contains(&self, path: &str) -> bool {
        self.attributes().contains_key(path)
    }

    /// All published paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.attributes().keys().cloned().collect()
    }

    fn lookup(&self, path: &str, access: u32) -> Result<Arc<dyn Attribute>> {
        let attributes = self.attributes();
        let published = attributes
            .get(path)
            .ok_or_else(|| HardwareError::NoSuchAttribute {
                path: path.to_string(),
            })?;
        if published.mode & access == 0 {
            return Err(HardwareError::PermissionDenied {
                path: path.to_string(),
            });
        }
        Ok(Arc::clone(&published.attribute))
    }

    fn attributes(&self) -> MutexGuard<'_, BTreeMap<String, PublishedAttribute>> {
        self.attributes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MockAttributeTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAttributeTree")
            .field("paths", &self.paths())
            .finish()
    }
}

impl AttributeRegistry for MockAttributeTree {
    fn publish(
        &self,
        dir: &str,
        name: &str,
        mode: u32,
        attribute: Arc<dyn Attribute>,
    ) -> Result<SurfaceHandle> {
        let path = format!("{dir}/{name}");
        let mut attributes = self.attributes();
        if attributes.contains_key(&path) {
            return Err(HardwareError::duplicate_name(path));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        attributes.insert(
            path.clone(),
            PublishedAttribute {
                id,
                mode,
                attribute,
            },
        );
        Ok(SurfaceHandle::new(id, path))
    }

    fn unpublish(&self, handle: SurfaceHandle) -> Result<()> {
        let mut attributes = self.attributes();
        let current = attributes
            .get(handle.name())
            .is_some_and(|published| published.id == handle.id());
        if !current {
            return Err(HardwareError::not_registered(handle.name()));
        }
        attributes.remove(handle.name());
        Ok(())
    }
}
