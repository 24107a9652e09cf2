//! # Repository Layer
//!
//! Keyed, insertion-ordered storage for each entity type.
//!
//! A [`Table`] is the collection itself. It also owns a monotonic id counter
//! so deleted ids are never handed out again. The [`Repository`] trait exposes
//! exactly two primitives, [`Repository::read`] and [`Repository::write`],
//! each running a closure against the table under the store's lock; every
//! other operation is provided on top of them. A service that needs a
//! read-validate-write sequence (e.g. email uniqueness) runs it inside one
//! `write` call.
//!
//! [`InMemoryRepository`] is the process-memory implementation. Nothing is
//! persisted across restarts.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::entity::Record;

// -- Table --------------------------------------------------------------------

/// Ordered collection of records keyed by id.
///
/// Iteration yields records in insertion order. Saving a record whose id is
/// already present replaces it in place.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
    last_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

impl<T: Record> Table<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    /// Reserve the next id. Ids are never reused, even after deletion.
    pub fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Upsert a record by id, returning the record it replaced.
    pub fn save(&mut self, record: T) -> Option<T> {
        self.last_id = self.last_id.max(record.id());
        match self.position(record.id()) {
            Some(index) => Some(std::mem::replace(&mut self.rows[index], record)),
            None => {
                self.rows.push(record);
                None
            }
        }
    }

    /// Assign the next id to `record` and append it.
    pub fn insert_new(&mut self, mut record: T) -> T {
        let id = self.next_id();
        record.set_id(id);
        self.rows.push(record.clone());
        record
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    /// Remove a record, preserving the order of the rest.
    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.position(id).map(|index| self.rows.remove(index))
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// -- Repository ---------------------------------------------------------------

/// Storage port for one entity type.
pub trait Repository<T: Record>: Send + Sync {
    /// Run `f` with shared access to the table.
    fn read<R>(&self, f: impl FnOnce(&Table<T>) -> R) -> R;

    /// Run `f` with exclusive access to the table. The lock is held for the
    /// whole closure, so `f` is a single atomic read-modify-write.
    fn write<R>(&self, f: impl FnOnce(&mut Table<T>) -> R) -> R;

    /// Upsert a record by its own id.
    fn save(&self, record: T) -> Option<T> {
        self.write(|table| table.save(record))
    }

    /// Store a record under a freshly assigned id and return it.
    fn insert_new(&self, record: T) -> T {
        self.write(|table| table.insert_new(record))
    }

    /// Fetch a record by id.
    fn get(&self, id: u64) -> Option<T> {
        self.read(|table| table.get(id).cloned())
    }

    /// All records in insertion order.
    fn list_all(&self) -> Vec<T> {
        self.read(|table| table.iter().cloned().collect())
    }

    /// Apply `f` to the record with this id. Returns `None` when absent,
    /// otherwise the closure's result.
    fn update<R, E>(
        &self,
        id: u64,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.write(|table| table.get_mut(id).map(f))
    }

    /// Remove a record by id.
    fn delete(&self, id: u64) -> Option<T> {
        self.write(|table| table.remove(id))
    }

    /// Number of stored records.
    fn len(&self) -> usize {
        self.read(|table| table.len())
    }

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe, cloneable in-memory repository.
///
/// Clones share the same table. The lock is `parking_lot`, never held
/// across an `.await`, and does not poison on panic.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    table: Arc<RwLock<Table<T>>>,
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<T: Record> InMemoryRepository<T> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table::new())),
        }
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn read<R>(&self, f: impl FnOnce(&Table<T>) -> R) -> R {
        f(&self.table.read())
    }

    fn write<R>(&self, f: impl FnOnce(&mut Table<T>) -> R) -> R {
        f(&mut self.table.write())
    }
}
