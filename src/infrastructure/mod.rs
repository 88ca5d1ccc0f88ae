//! Storage adapters implementing the domain ports.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::domain::ports::{CoordinatorStoreBox, EventStoreBox, RegistrationStoreBox, TaskStoreBox};
use crate::error::Result;
use in_memory::{
    InMemoryCoordinatorStore, InMemoryEventStore, InMemoryRegistrationStore, InMemoryTaskStore,
};
use std::path::Path;
use tracing::info;

/// One boxed store per collection.
pub struct Stores {
    pub registrations: RegistrationStoreBox,
    pub events: EventStoreBox,
    pub tasks: TaskStoreBox,
    pub coordinators: CoordinatorStoreBox,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            registrations: Box::new(InMemoryRegistrationStore::new()),
            events: Box::new(InMemoryEventStore::new()),
            tasks: Box::new(InMemoryTaskStore::new()),
            coordinators: Box::new(InMemoryCoordinatorStore::new()),
        }
    }

    /// Persistent stores when a database path is given, in-memory otherwise.
    pub fn open(db_path: Option<&Path>) -> Result<Self> {
        match db_path {
            None => {
                info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            Some(path) => Self::open_persistent(path),
        }
    }

    #[cfg(feature = "storage-rocksdb")]
    fn open_persistent(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "Opening RocksDB storage");
        let store = rocksdb::RocksDBStore::open(path)?;
        Ok(Self {
            registrations: Box::new(store.clone()),
            events: Box::new(store.clone()),
            tasks: Box::new(store.clone()),
            coordinators: Box::new(store),
        })
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    fn open_persistent(path: &Path) -> Result<Self> {
        Err(crate::error::RegistryError::ConfigError(format!(
            "cannot open {}: built without the storage-rocksdb feature",
            path.display()
        )))
    }
}
