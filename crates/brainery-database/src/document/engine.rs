//! Embedded document collections.
//!
//! A [`Collection`] stores schemaless JSON objects keyed by `_id`. Reads go
//! straight to the concurrent maps; every write takes the collection's write
//! lock so that unique-index checks and the write they guard happen in one
//! critical section.

use std::cmp::Ordering as CmpOrdering;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::DashMap;
use serde_json::{Map, Value};
use thiserror::Error;

use super::object_id::new_object_id;

/// A stored document.
pub type Document = Map<String, Value>;

/// Name of the primary key field.
pub const ID_FIELD: &str = "_id";

/// Failures raised by the engine itself.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A write would give two documents the same unique-index key.
    #[error("duplicate key for unique index '{index}'")]
    DuplicateKey { index: String },

    /// A writer panicked while holding the collection lock.
    #[error("collection '{collection}' is unavailable after a failed write")]
    Poisoned { collection: String },

    /// A document was offered without a usable `_id`.
    #[error("document in '{collection}' has no string _id")]
    MissingId { collection: String },
}

/// Conjunction of field equality tests.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality test.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }

    fn id(&self) -> Option<&str> {
        self.clauses
            .iter()
            .find(|(field, _)| field == ID_FIELD)
            .and_then(|(_, value)| value.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Ordering of query results. Ties fall back to insertion order, running in
/// the direction of the first key.
#[derive(Debug, Clone, Default)]
pub struct Sort {
    keys: Vec<(String, SortOrder)>,
}

impl Sort {
    /// Sort by one field.
    pub fn by(field: impl Into<String>, order: SortOrder) -> Self {
        Self::default().then(field, order)
    }

    /// Add a secondary key.
    pub fn then(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.keys.push((field.into(), order));
        self
    }

    fn compare(&self, a: &StoredDocument, b: &StoredDocument) -> CmpOrdering {
        for (field, order) in &self.keys {
            let ordering = compare_values(a.body.get(field), b.body.get(field));
            let ordering = match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            if ordering != CmpOrdering::Equal {
                return ordering;
            }
        }
        match self.keys.first() {
            Some((_, SortOrder::Desc)) => b.seq.cmp(&a.seq),
            _ => a.seq.cmp(&b.seq),
        }
    }
}

/// Missing and null sort first; strings compare byte-wise.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.as_bytes().cmp(y.as_bytes()),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    body: Document,
}

#[derive(Debug)]
struct UniqueIndex {
    name: String,
    fields: Vec<String>,
    entries: DashMap<String, String>,
}

impl UniqueIndex {
    /// Composite key, or `None` when any indexed field is absent.
    fn key(&self, doc: &Document) -> Option<String> {
        let values: Option<Vec<&Value>> = self.fields.iter().map(|f| doc.get(f)).collect();
        values.map(|values| Value::from(values.into_iter().cloned().collect::<Vec<_>>()).to_string())
    }
}

/// A named set of documents with optional unique indexes.
#[derive(Debug)]
pub struct Collection {
    name: String,
    docs: DashMap<String, StoredDocument>,
    indexes: Vec<UniqueIndex>,
    seq: AtomicU64,
    write_lock: Mutex<()>,
    dirty: AtomicBool,
}

impl Collection {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: DashMap::new(),
            indexes: Vec::new(),
            seq: AtomicU64::new(0),
            write_lock: Mutex::new(()),
            dirty: AtomicBool::new(false),
        }
    }

    /// Declare a unique index over one or more fields.
    pub fn with_unique_index(mut self, name: impl Into<String>, fields: &[&str]) -> Self {
        self.indexes.push(UniqueIndex {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            entries: DashMap::new(),
        });
        self
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a document, assigning an `_id` when it has none. Returns the id.
    pub fn insert_one(&self, mut doc: Document) -> Result<String, EngineError> {
        let id = match doc.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(_) => {
                return Err(EngineError::MissingId {
                    collection: self.name.clone(),
                });
            }
            None => {
                let id = new_object_id();
                doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        let _guard = self.lock()?;

        if self.docs.contains_key(&id) {
            return Err(EngineError::DuplicateKey {
                index: ID_FIELD.to_string(),
            });
        }
        let keys = self.index_keys(&doc);
        for (index, key) in self.indexes.iter().zip(&keys) {
            if let Some(key) = key {
                if index.entries.contains_key(key) {
                    return Err(EngineError::DuplicateKey {
                        index: index.name.clone(),
                    });
                }
            }
        }

        for (index, key) in self.indexes.iter().zip(keys) {
            if let Some(key) = key {
                index.entries.insert(key, id.clone());
            }
        }
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.docs.insert(id.clone(), StoredDocument { seq, body: doc });
        self.dirty.store(true, Ordering::Release);
        Ok(id)
    }

    /// Look a document up by `_id`.
    pub fn find_by_id(&self, id: &str) -> Option<Document> {
        self.docs.get(id).map(|entry| entry.body.clone())
    }

    /// First matching document in insertion order.
    pub fn find_one(&self, filter: &Filter) -> Option<Document> {
        self.find(filter, &Sort::default(), 0, Some(1)).into_iter().next()
    }

    /// All matching documents, sorted, then windowed by `skip` and `limit`.
    pub fn find(
        &self,
        filter: &Filter,
        sort: &Sort,
        skip: usize,
        limit: Option<usize>,
    ) -> Vec<Document> {
        let mut matched = self.matching(filter);
        matched.sort_by(|a, b| sort.compare(a, b));
        matched
            .into_iter()
            .skip(skip)
            .take(limit.unwrap_or(usize::MAX))
            .map(|stored| stored.body)
            .collect()
    }

    /// Number of matching documents.
    pub fn count(&self, filter: &Filter) -> u64 {
        if filter.clauses.is_empty() {
            return self.docs.len() as u64;
        }
        self.docs
            .iter()
            .filter(|entry| filter.matches(&entry.body))
            .count() as u64
    }

    /// Overwrite the given fields on the first matching document. Returns the
    /// updated document, or `None` when nothing matched.
    pub fn update_one(&self, filter: &Filter, set: Document) -> Result<Option<Document>, EngineError> {
        let _guard = self.lock()?;

        let Some(current) = self.first_match(filter) else {
            return Ok(None);
        };
        let id = document_id(&current.body).unwrap_or_default().to_string();

        let mut updated = current.body.clone();
        for (field, value) in set {
            if field != ID_FIELD {
                updated.insert(field, value);
            }
        }

        let old_keys = self.index_keys(&current.body);
        let new_keys = self.index_keys(&updated);
        for (index, (old, new)) in self.indexes.iter().zip(old_keys.iter().zip(&new_keys)) {
            if let Some(new) = new {
                if old.as_ref() != Some(new) {
                    let taken = index.entries.get(new).is_some_and(|owner| *owner != id);
                    if taken {
                        return Err(EngineError::DuplicateKey {
                            index: index.name.clone(),
                        });
                    }
                }
            }
        }

        for (index, (old, new)) in self.indexes.iter().zip(old_keys.into_iter().zip(new_keys)) {
            if old == new {
                continue;
            }
            if let Some(old) = old {
                index.entries.remove(&old);
            }
            if let Some(new) = new {
                index.entries.insert(new, id.clone());
            }
        }

        self.docs.insert(
            id,
            StoredDocument {
                seq: current.seq,
                body: updated.clone(),
            },
        );
        self.dirty.store(true, Ordering::Release);
        Ok(Some(updated))
    }

    /// Remove the first matching document and return it.
    pub fn delete_one(&self, filter: &Filter) -> Result<Option<Document>, EngineError> {
        let _guard = self.lock()?;
        let Some(current) = self.first_match(filter) else {
            return Ok(None);
        };
        self.remove_locked(&current.body);
        Ok(Some(current.body))
    }

    /// Remove every matching document. Returns how many were removed.
    pub fn delete_many(&self, filter: &Filter) -> Result<u64, EngineError> {
        let _guard = self.lock()?;
        let matched = self.matching(filter);
        for stored in &matched {
            self.remove_locked(&stored.body);
        }
        Ok(matched.len() as u64)
    }

    /// Every document in insertion order.
    pub fn dump(&self) -> Vec<Document> {
        self.find(&Filter::all(), &Sort::default(), 0, None)
    }

    /// Whether the collection changed since the last call, clearing the flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Flag the collection as changed.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Whether writers can still take the lock.
    pub fn is_healthy(&self) -> bool {
        !self.write_lock.is_poisoned()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, EngineError> {
        self.write_lock.lock().map_err(|_| EngineError::Poisoned {
            collection: self.name.clone(),
        })
    }

    fn index_keys(&self, doc: &Document) -> Vec<Option<String>> {
        self.indexes.iter().map(|index| index.key(doc)).collect()
    }

    fn matching(&self, filter: &Filter) -> Vec<StoredDocument> {
        if let Some(id) = filter.id() {
            return self
                .docs
                .get(id)
                .filter(|entry| filter.matches(&entry.body))
                .map(|entry| vec![entry.value().clone()])
                .unwrap_or_default();
        }
        self.docs
            .iter()
            .filter(|entry| filter.matches(&entry.body))
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn first_match(&self, filter: &Filter) -> Option<StoredDocument> {
        self.matching(filter).into_iter().min_by_key(|stored| stored.seq)
    }

    /// Caller must hold the write lock.
    fn remove_locked(&self, doc: &Document) {
        for (index, key) in self.indexes.iter().zip(self.index_keys(doc)) {
            if let Some(key) = key {
                index.entries.remove(&key);
            }
        }
        if let Some(id) = document_id(doc) {
            self.docs.remove(id);
        }
        self.dirty.store(true, Ordering::Release);
    }
}

/// The `_id` of a document, if it is a string.
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}
