use crate::domain::coordinator::{Coordinator, CoordinatorId};
use crate::domain::event::Event;
use crate::domain::ports::{CoordinatorStore, EventStore, RegistrationStore, TaskStore};
use crate::domain::registration::{RegisterId, Registration};
use crate::domain::task::Task;
use crate::error::{RegistryError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for registrations, keyed by register id.
pub const CF_REGISTRATIONS: &str = "registrations";
/// Column Family for events, keyed by uuid bytes.
pub const CF_EVENTS: &str = "events";
/// Column Family for tasks, keyed by uuid bytes.
pub const CF_TASKS: &str = "tasks";
/// Column Family for coordinator accounts, keyed by coordinator id.
pub const CF_COORDINATORS: &str = "coordinators";

const COLUMN_FAMILIES: [&str; 4] = [CF_REGISTRATIONS, CF_EVENTS, CF_TASKS, CF_COORDINATORS];

/// A persistent store implementation using RocksDB.
///
/// Every collection lives in its own Column Family with JSON-encoded values.
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

fn missing_cf(name: &str) -> RegistryError {
    RegistryError::InternalError(Box::new(std::io::Error::other(format!(
        "{name} column family not found"
    ))))
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at `path`, creating any missing
    /// column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: &[u8], value: &T) -> Result<()> {
        let cf = self.db.cf_handle(cf_name).ok_or_else(|| missing_cf(cf_name))?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(&cf, key, bytes)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.db.cf_handle(cf_name).ok_or_else(|| missing_cf(cf_name))?;
        match self.db.get_pinned_cf(&cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn delete(&self, cf_name: &str, key: &[u8]) -> Result<bool> {
        let cf = self.db.cf_handle(cf_name).ok_or_else(|| missing_cf(cf_name))?;
        let existed = self.db.get_pinned_cf(&cf, key)?.is_some();
        if existed {
            self.db.delete_cf(&cf, key)?;
        }
        Ok(existed)
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.db.cf_handle(cf_name).ok_or_else(|| missing_cf(cf_name))?;
        let mut items = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_key, value) = item?;
            items.push(serde_json::from_slice(&value)?);
        }
        Ok(items)
    }
}

#[async_trait]
impl RegistrationStore for RocksDBStore {
    async fn store(&self, registration: Registration) -> Result<()> {
        self.put(
            CF_REGISTRATIONS,
            registration.register_id.as_str().as_bytes(),
            &registration,
        )
    }

    async fn get(&self, register_id: &RegisterId) -> Result<Option<Registration>> {
        self.fetch(CF_REGISTRATIONS, register_id.as_str().as_bytes())
    }

    async fn remove(&self, register_id: &RegisterId) -> Result<bool> {
        self.delete(CF_REGISTRATIONS, register_id.as_str().as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Registration>> {
        self.scan(CF_REGISTRATIONS)
    }
}

#[async_trait]
impl EventStore for RocksDBStore {
    async fn store(&self, event: Event) -> Result<()> {
        self.put(CF_EVENTS, event.id.as_bytes(), &event)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        self.fetch(CF_EVENTS, id.as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Event>> {
        self.scan(CF_EVENTS)
    }
}

#[async_trait]
impl TaskStore for RocksDBStore {
    async fn store(&self, task: Task) -> Result<()> {
        self.put(CF_TASKS, task.id.as_bytes(), &task)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        self.fetch(CF_TASKS, id.as_bytes())
    }

    async fn remove(&self, id: Uuid) -> Result<bool> {
        self.delete(CF_TASKS, id.as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Task>> {
        self.scan(CF_TASKS)
    }
}

#[async_trait]
impl CoordinatorStore for RocksDBStore {
    async fn store(&self, coordinator: Coordinator) -> Result<()> {
        self.put(CF_COORDINATORS, coordinator.id.as_str().as_bytes(), &coordinator)
    }

    async fn get(&self, id: &CoordinatorId) -> Result<Option<Coordinator>> {
        self.fetch(CF_COORDINATORS, id.as_str().as_bytes())
    }

    async fn get_all(&self) -> Result<Vec<Coordinator>> {
        self.scan(CF_COORDINATORS)
    }
}
