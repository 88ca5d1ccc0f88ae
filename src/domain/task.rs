use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_TASK_TITLE_LEN: usize = 200;
pub const MAX_TASK_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn check_title(raw: &str) -> Result<String, RegistryError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(RegistryError::validation("Task title is required"));
    }
    if title.chars().count() > MAX_TASK_TITLE_LEN {
        return Err(RegistryError::validation(format!(
            "Title cannot exceed {MAX_TASK_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn check_description(raw: &str) -> Result<String, RegistryError> {
    let description = raw.trim();
    if description.chars().count() > MAX_TASK_DESCRIPTION_LEN {
        return Err(RegistryError::validation(format!(
            "Description cannot exceed {MAX_TASK_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(description.to_string())
}

impl Task {
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.status = match self.status {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        };
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
}

impl NewTask {
    pub fn into_task(self, now: DateTime<Utc>) -> Result<Task, RegistryError> {
        Ok(Task {
            id: Uuid::new_v4(),
            title: check_title(&self.title)?,
            description: check_description(self.description.as_deref().unwrap_or_default())?,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
}

impl TaskUpdate {
    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) -> Result<(), RegistryError> {
        // Validate everything before touching the task.
        let title = self.title.as_deref().map(check_title).transpose()?;
        let description = self.description.as_deref().map(check_description).transpose()?;

        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        task.updated_at = now;
        Ok(())
    }
}
