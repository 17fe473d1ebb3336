//! Named-instance registry with an optional default and locked entries.
//!
//! Applications that keep several orchestrators or containers alive (a
//! default plus named alternates) can store the handles here instead of
//! threading them through every call site. Locked entries refuse
//! replacement and removal, which pins the default wiring against
//! accidental override.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::RwLock;
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors raised by the registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Entry exists and is locked against replacement or removal
    #[error("registry entry '{0}' is locked")]
    Locked(String),

    /// No entry under the requested name
    #[error("registry entry '{0}' not found")]
    NotFound(String),
}

struct RegistryEntry<T> {
    value: T,
    locked: bool,
}

/// Concurrent named storage for shared handles.
///
/// Values must be cheaply cloneable handles (`Arc`-backed types like
/// containers and collectors); `get` hands out clones.
///
/// # Examples
///
/// ```rust
/// use conductor_rt::registry::Registry;
///
/// let registry: Registry<u32> = Registry::new();
/// registry.set("primary", 1).ok();
/// registry.set_default("primary").ok();
///
/// assert_eq!(registry.get("primary"), Some(1));
/// assert_eq!(registry.default(), Some(1));
/// ```
pub struct Registry<T: Clone + Send + Sync + 'static> {
    entries: DashMap<String, RegistryEntry<T>>,
    default_name: RwLock<Option<String>>,
}

impl<T: Clone + Send + Sync + 'static> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            default_name: RwLock::new(None),
        }
    }

    /// Store a value under a name, replacing any unlocked entry.
    pub fn set(&self, name: impl Into<String>, value: T) -> Result<(), RegistryError> {
        self.insert(name.into(), value, false)
    }

    /// Store a value under a name and lock it against replacement.
    pub fn set_locked(&self, name: impl Into<String>, value: T) -> Result<(), RegistryError> {
        self.insert(name.into(), value, true)
    }

    fn insert(&self, name: String, value: T, locked: bool) -> Result<(), RegistryError> {
        if let Some(existing) = self.entries.get(&name) {
            if existing.locked {
                return Err(RegistryError::Locked(name));
            }
        }
        self.entries.insert(name, RegistryEntry { value, locked });
        Ok(())
    }

    /// Fetch a clone of the value under a name.
    pub fn get(&self, name: &str) -> Option<T> {
        self.entries.get(name).map(|entry| entry.value.clone())
    }

    /// Whether a name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Mark an existing entry as the default.
    pub fn set_default(&self, name: &str) -> Result<(), RegistryError> {
        if !self.entries.contains_key(name) {
            return Err(RegistryError::NotFound(name.to_owned()));
        }
        *self.default_name.write() = Some(name.to_owned());
        Ok(())
    }

    /// Fetch a clone of the default entry, when one is set.
    pub fn default(&self) -> Option<T> {
        let name = self.default_name.read().clone()?;
        self.get(&name)
    }

    /// Remove an unlocked entry, returning its value.
    pub fn remove(&self, name: &str) -> Result<Option<T>, RegistryError> {
        if let Some(entry) = self.entries.get(name) {
            if entry.locked {
                return Err(RegistryError::Locked(name.to_owned()));
            }
        }
        let removed = self.entries.remove(name).map(|(_, entry)| entry.value);
        let mut default_name = self.default_name.write();
        if default_name.as_deref() == Some(name) {
            *default_name = None;
        }
        Ok(removed)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let registry: Registry<u32> = Registry::new();
        assert!(registry.set("a", 1).is_ok());

        assert_eq!(registry.get("a"), Some(1));
        assert_eq!(registry.get("b"), None);
        assert!(registry.contains("a"));
    }

    #[test]
    fn test_unlocked_entries_can_be_replaced() {
        let registry: Registry<u32> = Registry::new();
        registry.set("a", 1).ok();
        assert!(registry.set("a", 2).is_ok());
        assert_eq!(registry.get("a"), Some(2));
    }

    #[test]
    fn test_locked_entries_refuse_replacement() {
        let registry: Registry<u32> = Registry::new();
        registry.set_locked("a", 1).ok();

        let err = registry.set("a", 2).err();
        assert_eq!(err, Some(RegistryError::Locked("a".to_owned())));
        assert_eq!(registry.get("a"), Some(1));
    }

    #[test]
    fn test_locked_entries_refuse_removal() {
        let registry: Registry<u32> = Registry::new();
        registry.set_locked("a", 1).ok();

        let err = registry.remove("a").err();
        assert_eq!(err, Some(RegistryError::Locked("a".to_owned())));
    }

    #[test]
    fn test_default_entry() {
        let registry: Registry<u32> = Registry::new();
        registry.set("primary", 7).ok();

        assert!(registry.default().is_none());
        assert!(registry.set_default("primary").is_ok());
        assert_eq!(registry.default(), Some(7));
    }

    #[test]
    fn test_default_requires_existing_entry() {
        let registry: Registry<u32> = Registry::new();
        let err = registry.set_default("ghost").err();
        assert_eq!(err, Some(RegistryError::NotFound("ghost".to_owned())));
    }

    #[test]
    fn test_removing_default_clears_it() {
        let registry: Registry<u32> = Registry::new();
        registry.set("primary", 7).ok();
        registry.set_default("primary").ok();

        assert_eq!(registry.remove("primary").ok().flatten(), Some(7));
        assert!(registry.default().is_none());
    }
}
