use super::coordinator::CoordinatorId;
use crate::error::RegistryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Cultural,
    Technical,
    Sports,
    Literary,
    Art,
    Music,
    Dance,
    Drama,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub max_participants: u32,
    pub current_participants: u32,
    pub coordinator_id: CoordinatorId,
    pub status: EventStatus,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }
}

/// Entry kept on a registration for every event it signed up for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEvent {
    pub event_id: Uuid,
    pub event_name: String,
    pub category: EventCategory,
    pub registered_at: DateTime<Utc>,
}

impl RegisteredEvent {
    pub fn for_event(event: &Event, now: DateTime<Utc>) -> Self {
        Self {
            event_id: event.id,
            event_name: event.title.clone(),
            category: event.category,
            registered_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub max_participants: u32,
    #[serde(default)]
    pub status: EventStatus,
    /// Admins may create events on behalf of another coordinator.
    #[serde(default)]
    pub coordinator_id: Option<CoordinatorId>,
}

impl NewEvent {
    pub fn into_event(self, owner: CoordinatorId, now: DateTime<Utc>) -> Result<Event, RegistryError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(RegistryError::validation("Event title is required"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(RegistryError::validation(format!(
                "Title cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(RegistryError::validation("Event description is required"));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(RegistryError::validation(format!(
                "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        let venue = self.venue.trim().to_string();
        if venue.is_empty() {
            return Err(RegistryError::validation("Venue is required"));
        }
        if self.max_participants == 0 {
            return Err(RegistryError::validation("At least 1 participant is required"));
        }

        Ok(Event {
            id: Uuid::new_v4(),
            title,
            description,
            category: self.category,
            event_date: self.event_date,
            venue,
            max_participants: self.max_participants,
            current_participants: 0,
            coordinator_id: owner,
            status: self.status,
            active: true,
            created_at: now,
        })
    }
}
