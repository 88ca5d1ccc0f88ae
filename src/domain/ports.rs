use super::coordinator::{Coordinator, CoordinatorId};
use super::event::Event;
use super::registration::{RegisterId, Registration};
use super::task::Task;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn store(&self, registration: Registration) -> Result<()>;
    async fn get(&self, register_id: &RegisterId) -> Result<Option<Registration>>;
    async fn remove(&self, register_id: &RegisterId) -> Result<bool>;
    async fn get_all(&self) -> Result<Vec<Registration>>;

    /// Looks a registration up by register id first, then by user id.
    async fn find(&self, key: &str) -> Result<Option<Registration>> {
        if let Some(found) = self.get(&RegisterId::parse(key)).await? {
            return Ok(Some(found));
        }
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|r| r.matches_key(key)))
    }
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn store(&self, event: Event) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Event>>;
    async fn get_all(&self) -> Result<Vec<Event>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn store(&self, task: Task) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Task>>;
    async fn remove(&self, id: Uuid) -> Result<bool>;
    async fn get_all(&self) -> Result<Vec<Task>>;
}

#[async_trait]
pub trait CoordinatorStore: Send + Sync {
    async fn store(&self, coordinator: Coordinator) -> Result<()>;
    async fn get(&self, id: &CoordinatorId) -> Result<Option<Coordinator>>;
    async fn get_all(&self) -> Result<Vec<Coordinator>>;

    /// An active account holding `token` wins over a deactivated one.
    async fn find_by_token(&self, token: &str) -> Result<Option<Coordinator>> {
        let mut inactive = None;
        for coordinator in self.get_all().await? {
            if coordinator.token == token {
                if coordinator.active {
                    return Ok(Some(coordinator));
                }
                inactive.get_or_insert(coordinator);
            }
        }
        Ok(inactive)
    }
}

pub type RegistrationStoreBox = Box<dyn RegistrationStore>;
pub type EventStoreBox = Box<dyn EventStore>;
pub type TaskStoreBox = Box<dyn TaskStore>;
pub type CoordinatorStoreBox = Box<dyn CoordinatorStore>;
