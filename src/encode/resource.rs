use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::encode::png::EncodedImage;

/// Prefix every managed reference starts with.
pub const MANAGED_SCHEME: &str = "blob:";
const NAMESPACE: &str = "swatch-composer/";

/// Reference to an encoded image held by a [`ResourceRegistry`].
///
/// The holder owns the payload's lifetime and gives it back with [`ResourceRegistry::release`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ResourceHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `reference` uses the managed scheme (as opposed to a static asset path).
pub fn is_managed(reference: &str) -> bool {
    reference.starts_with(MANAGED_SCHEME)
}

/// Table of live encoded payloads keyed by their managed reference.
#[derive(Default)]
pub struct ResourceRegistry {
    entries: Mutex<HashMap<String, Arc<EncodedImage>>>,
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Arc<EncodedImage>>> {
        // Every mutation is a single map operation, so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store `image` under a fresh managed reference.
    pub fn publish(&self, image: EncodedImage) -> ResourceHandle {
        let reference = format!("{MANAGED_SCHEME}{NAMESPACE}{}", uuid::Uuid::new_v4());
        tracing::debug!(%reference, bytes = image.bytes.len(), "published resource");
        self.entries().insert(reference.clone(), Arc::new(image));
        ResourceHandle(reference)
    }

    /// Payload behind a live reference.
    pub fn fetch(&self, reference: &str) -> Option<Arc<EncodedImage>> {
        self.entries().get(reference).cloned()
    }

    /// Revoke `reference` if it is managed. Static paths, empty strings, unknown and already
    /// released references are ignored. Returns whether a payload was actually dropped.
    pub fn release(&self, reference: &str) -> bool {
        if !is_managed(reference) {
            tracing::trace!(reference, "release ignored for non-managed reference");
            return false;
        }
        let removed = self.entries().remove(reference).is_some();
        if removed {
            tracing::debug!(reference, "released resource");
        } else {
            tracing::trace!(reference, "release of unknown or already released resource");
        }
        removed
    }

    pub fn live_count(&self) -> usize {
        self.entries().len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/resource.rs"]
mod tests;
