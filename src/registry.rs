use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::store::Store;

/// The process-wide map from entity name to its storage. Entities are created
/// on first reference and live for the process's lifetime; exactly one store
/// exists per name. The map is guarded by a mutex so two connections naming a
/// brand-new entity at the same time get the same store.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entities: Arc<Mutex<HashMap<String, Store>>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Returns the store for `name`, creating it on first reference.
    pub fn entity(&self, name: &str) -> Store {
        let mut entities = self.entities.lock().unwrap();
        entities
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!("Creating entity {:?}", name);
                Store::new()
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entities.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.lock().unwrap().is_empty()
    }
}
