use parking_lot::Mutex;
use pylon_param::{MemoryStore, ParameterStore, ParameterValue};

/// Store wrapper that records every write it receives.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    writes: Mutex<Vec<(String, ParameterValue)>>,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn with(entries: &[(&str, ParameterValue)]) -> Self {
        let store = Self::default();
        for (name, value) in entries {
            store.inner.insert(*name, value.clone());
        }
        store
    }

    pub fn writes(&self) -> Vec<(String, ParameterValue)> {
        self.writes.lock().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().clear();
    }
}

impl ParameterStore for RecordingStore {
    fn has(&self, key: &str) -> bool {
        self.inner.has(key)
    }

    fn get(&self, key: &str) -> Option<ParameterValue> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: ParameterValue) {
        self.writes.lock().push((key.to_string(), value.clone()));
        self.inner.set(key, value);
    }
}
