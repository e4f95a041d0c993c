//! Key/value parameter storage.
//!
//! `ParameterStore` is the only view the resolver has of the outside
//! configuration: presence checks, typed reads with a default, and writes.
//! `MemoryStore` is the in-process implementation used by the binary and by
//! tests; a node backed by a remote parameter server implements the trait
//! itself.

use std::collections::BTreeMap;
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::Result;
use crate::value::{FromParameterValue, ParameterValue};
use crate::yaml;

/// A flat key/value parameter store.
///
/// All methods take `&self`; implementations own their synchronisation.
pub trait ParameterStore {
    /// Whether `key` is present, regardless of its type.
    fn has(&self, key: &str) -> bool;

    /// Raw value stored under `key`.
    fn get(&self, key: &str) -> Option<ParameterValue>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: ParameterValue);

    /// Read `key` as `T`, or return `default` unchanged when the key is
    /// absent or holds a value that cannot be converted.
    fn read<T: FromParameterValue>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        let Some(value) = self.get(key) else {
            return default;
        };
        match T::from_parameter_value(&value) {
            Some(v) => v,
            None => {
                warn!(
                    "[PARAMS] '{}' holds {} value {}, keeping previous value",
                    key,
                    value.parameter_type(),
                    value
                );
                default
            }
        }
    }

    /// Typed convenience over [`ParameterStore::set`].
    fn write<V: Into<ParameterValue>>(&self, key: &str, value: V)
    where
        Self: Sized,
    {
        self.set(key, value.into());
    }
}

impl<S: ParameterStore + ?Sized> ParameterStore for &S {
    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Option<ParameterValue> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: ParameterValue) {
        (**self).set(key, value)
    }
}

/// In-memory parameter store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    parameters: RwLock<BTreeMap<String, ParameterValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the parameters applicable to `node_fqn` from a YAML string.
    pub fn from_yaml_str(yaml: &str, node_fqn: &str) -> Result<Self> {
        let store = Self::new();
        store.extend(yaml::load_parameter_string(yaml, node_fqn)?);
        Ok(store)
    }

    /// Load the parameters applicable to `node_fqn` from a YAML file.
    pub fn from_yaml_file(path: &Path, node_fqn: &str) -> Result<Self> {
        let store = Self::new();
        store.extend(yaml::load_parameter_file(path, node_fqn)?);
        Ok(store)
    }

    /// Insert a value, returning the previous one.
    pub fn insert(
        &self,
        name: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Option<ParameterValue> {
        self.parameters.write().insert(name.into(), value.into())
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&self, name: &str) -> Option<ParameterValue> {
        self.parameters.write().remove(name)
    }

    /// Apply a batch of overrides. Later entries win.
    pub fn extend<I>(&self, overrides: I)
    where
        I: IntoIterator<Item = (String, ParameterValue)>,
    {
        self.parameters.write().extend(overrides);
    }

    /// Sorted parameter names.
    pub fn names(&self) -> Vec<String> {
        self.parameters.read().keys().cloned().collect()
    }

    /// Copy of every stored parameter.
    pub fn snapshot(&self) -> BTreeMap<String, ParameterValue> {
        self.parameters.read().clone()
    }

    pub fn len(&self) -> usize {
        self.parameters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.read().is_empty()
    }
}

impl FromIterator<(String, ParameterValue)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, ParameterValue)>>(iter: I) -> Self {
        let store = Self::new();
        store.extend(iter);
        store
    }
}

impl ParameterStore for MemoryStore {
    fn has(&self, key: &str) -> bool {
        self.parameters.read().contains_key(key)
    }

    fn get(&self, key: &str) -> Option<ParameterValue> {
        self.parameters.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: ParameterValue) {
        debug!("[PARAMS] set {} = {}", key, value);
        self.parameters.write().insert(key.to_string(), value);
    }
}
