use crate::domain::coordinator::{Coordinator, CoordinatorId};
use crate::domain::event::Event;
use crate::domain::ports::{CoordinatorStore, EventStore, RegistrationStore, TaskStore};
use crate::domain::registration::{RegisterId, Registration};
use crate::domain::task::Task;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for registrations.
///
/// Uses `Arc<RwLock<HashMap<RegisterId, Registration>>>` so clones share state.
/// Ideal for testing or a single-day desk where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryRegistrationStore {
    registrations: Arc<RwLock<HashMap<RegisterId, Registration>>>,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn store(&self, registration: Registration) -> Result<()> {
        let mut registrations = self.registrations.write().await;
        registrations.insert(registration.register_id.clone(), registration);
        Ok(())
    }

    async fn get(&self, register_id: &RegisterId) -> Result<Option<Registration>> {
        let registrations = self.registrations.read().await;
        Ok(registrations.get(register_id).cloned())
    }

    async fn remove(&self, register_id: &RegisterId) -> Result<bool> {
        let mut registrations = self.registrations.write().await;
        Ok(registrations.remove(register_id).is_some())
    }

    async fn get_all(&self) -> Result<Vec<Registration>> {
        let registrations = self.registrations.read().await;
        Ok(registrations.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn store(&self, event: Event) -> Result<()> {
        self.events.write().await.insert(event.id, event);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().await.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn store(&self, task: Task) -> Result<()> {
        self.tasks.write().await.insert(task.id, task);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn remove(&self, id: Uuid) -> Result<bool> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }

    async fn get_all(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryCoordinatorStore {
    coordinators: Arc<RwLock<HashMap<CoordinatorId, Coordinator>>>,
}

impl InMemoryCoordinatorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoordinatorStore for InMemoryCoordinatorStore {
    async fn store(&self, coordinator: Coordinator) -> Result<()> {
        self.coordinators
            .write()
            .await
            .insert(coordinator.id.clone(), coordinator);
        Ok(())
    }

    async fn get(&self, id: &CoordinatorId) -> Result<Option<Coordinator>> {
        Ok(self.coordinators.read().await.get(id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Coordinator>> {
        Ok(self.coordinators.read().await.values().cloned().collect())
    }
}
