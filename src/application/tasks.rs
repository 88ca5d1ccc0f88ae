use crate::domain::ports::TaskStoreBox;
use crate::domain::task::{NewTask, Priority, Task, TaskStatus, TaskUpdate};
use crate::error::{RegistryError, Result};
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::cmp::Ordering;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    #[serde(alias = "created_at")]
    CreatedAt,
    #[serde(alias = "updated_at")]
    UpdatedAt,
    Title,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub sort_by: SortField,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// Percentage completed, rounded to a whole number.
    pub completion_rate: Decimal,
}

fn compare(field: SortField, a: &Task, b: &Task) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Priority => a.priority.cmp(&b.priority),
    }
}

pub struct TaskService {
    store: TaskStoreBox,
}

impl TaskService {
    pub fn new(store: TaskStoreBox) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: TaskQuery) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter(|t| query.status.is_none_or(|s| t.status == s))
            .filter(|t| query.priority.is_none_or(|p| t.priority == p))
            .collect();
        tasks.sort_by(|a, b| {
            let ord = compare(query.sort_by, a, b).then_with(|| a.id.cmp(&b.id));
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        Ok(tasks)
    }

    pub async fn get(&self, id: Uuid) -> Result<Task> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RegistryError::not_found(format!("Task {id}")))
    }

    pub async fn create(&self, task: NewTask) -> Result<Task> {
        let task = task.into_task(Utc::now())?;
        self.store.store(task.clone()).await?;
        info!(task_id = %task.id, "Task created");
        Ok(task)
    }

    pub async fn update(&self, id: Uuid, update: TaskUpdate) -> Result<Task> {
        let mut task = self.get(id).await?;
        update.apply(&mut task, Utc::now())?;
        self.store.store(task.clone()).await?;
        Ok(task)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.remove(id).await? {
            return Err(RegistryError::not_found(format!("Task {id}")));
        }
        info!(task_id = %id, "Task deleted");
        Ok(())
    }

    pub async fn toggle(&self, id: Uuid) -> Result<Task> {
        let mut task = self.get(id).await?;
        task.toggle(Utc::now());
        self.store.store(task.clone()).await?;
        Ok(task)
    }

    pub async fn stats(&self) -> Result<TaskStats> {
        let tasks = self.store.get_all().await?;
        let total = tasks.len();
        let completed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        let completion_rate = if total == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(completed) * Decimal::ONE_HUNDRED / Decimal::from(total))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        };
        Ok(TaskStats {
            total,
            pending: total - completed,
            completed,
            completion_rate,
        })
    }
}
