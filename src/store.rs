use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use thiserror::Error as ThisError;

use crate::value::Value;

#[derive(Debug, ThisError, PartialEq)]
pub enum DataError {
    #[error("key '{0}' not found")]
    KeyNotFound(String),
    #[error("key '{0}' doesn't have type '{1}'")]
    IncorrectKeyType(String, &'static str),
}

/// A record's attribute mapping. Key order is insignificant and not
/// deterministic across reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Data(HashMap<String, Value>);

impl Data {
    pub fn new() -> Data {
        Data(HashMap::new())
    }

    pub fn insert(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Merges `incoming` into this mapping: keys present in `incoming`
    /// overwrite, keys absent are preserved.
    pub fn merge(&mut self, incoming: &Data) {
        for (key, value) in incoming.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn get_int(&self, key: &str) -> Result<i64, DataError> {
        match self.0.get(key) {
            Some(Value::Integer(i)) => Ok(*i),
            Some(_) => Err(DataError::IncorrectKeyType(key.to_string(), "integer")),
            None => Err(DataError::KeyNotFound(key.to_string())),
        }
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.0.insert(key.to_string(), Value::Integer(value));
    }
}

impl FromIterator<(String, Value)> for Data {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Data {
        Data(iter.into_iter().collect())
    }
}

/// One entity member: an immutable positive id plus an attribute mapping
/// guarded by its own mutation lock. The per-record lock lets concurrent
/// updates to different records proceed without contention while serializing
/// updates to the same record.
#[derive(Debug)]
pub struct Record {
    id: u64,
    data: Mutex<Data>,
}

impl Record {
    pub fn new(id: u64, data: Data) -> Record {
        Record {
            id,
            data: Mutex::new(data),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Locks the record's attribute mapping for reading or mutation.
    pub fn data(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap()
    }

    /// Wire form of the record: `id <n>` followed by ` <key> <value>` per
    /// attribute, in unspecified attribute order.
    pub fn serialize(&self) -> String {
        let data = self.data();
        let mut out = format!("id {}", self.id);
        for (key, value) in data.iter() {
            let _ = write!(out, " {} {}", key, value);
        }
        out
    }
}

/// The ordered index of one entity's records, keyed by id.
///
/// The index itself is guarded by a read-write lock; record contents are not,
/// each record carries its own lock. Cloning is cheap and hands out a handle
/// to the same index.
#[derive(Clone, Debug, Default)]
pub struct Store {
    records: Arc<RwLock<BTreeMap<u64, Arc<Record>>>>,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// Inserts a record, refusing to overwrite: returns false and leaves the
    /// existing record untouched when the id is already taken.
    pub fn insert(&self, record: Record) -> bool {
        let mut records = self.records.write().unwrap();
        match records.entry(record.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(record));
                true
            }
        }
    }

    /// Merges `data` into the record with this id, under that record's own
    /// lock. The index lock is released before the merge so updates to other
    /// records are not blocked. Returns false when the id does not exist.
    pub fn update(&self, id: u64, data: &Data) -> bool {
        let record = self.records.read().unwrap().get(&id).cloned();
        match record {
            Some(record) => {
                record.data().merge(data);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u64) -> Option<Arc<Record>> {
        self.records.read().unwrap().get(&id).cloned()
    }

    /// All records in ascending or descending id order. No snapshot is taken:
    /// the index is read-locked only while collecting handles, so mutations
    /// concurrent with the caller's traversal may be partially visible.
    pub fn get_all(&self, descending: bool) -> Vec<Arc<Record>> {
        let records = self.records.read().unwrap();
        if descending {
            records.values().rev().cloned().collect()
        } else {
            records.values().cloned().collect()
        }
    }

    pub fn delete(&self, id: u64) -> Option<Arc<Record>> {
        self.records.write().unwrap().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }
}
