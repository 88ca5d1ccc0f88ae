use crate::application::registry::{Pagination, RegistrationService};
use crate::domain::coordinator::Coordinator;
use crate::domain::event::{Event, NewEvent, RegisteredEvent};
use crate::domain::payment::PaymentStatus;
use crate::domain::ports::EventStoreBox;
use crate::domain::registration::Registration;
use crate::error::{RegistryError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Filters for an event roster. Pages are 1-based.
#[derive(Debug, Clone, Default)]
pub struct RosterQuery {
    pub status: Option<PaymentStatus>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Who signed up for one event.
#[derive(Debug, Clone)]
pub struct Roster {
    pub event: Event,
    pub registrations: Vec<Registration>,
    pub pagination: Pagination,
}

/// Event catalogue and event signups for registered participants.
pub struct EventService {
    store: EventStoreBox,
    registry: Arc<RegistrationService>,
}

impl EventService {
    pub fn new(store: EventStoreBox, registry: Arc<RegistrationService>) -> Self {
        Self { store, registry }
    }

    /// Creates an event owned by `coordinator`. Only admins may assign it to
    /// someone else.
    pub async fn create(&self, coordinator: &Coordinator, mut event: NewEvent) -> Result<Event> {
        let owner = match event.coordinator_id.take() {
            Some(other) if other != coordinator.id => {
                if !coordinator.is_admin() {
                    return Err(RegistryError::Forbidden(
                        "Only admins can create events for another coordinator".into(),
                    ));
                }
                other
            }
            _ => coordinator.id.clone(),
        };

        let event = event.into_event(owner, Utc::now())?;
        self.store.store(event.clone()).await?;
        info!(event_id = %event.id, title = %event.title, "Event created");
        Ok(event)
    }

    /// Active events by date. With `only_mine`, just the viewer's own.
    pub async fn list(&self, viewer: &Coordinator, only_mine: bool) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter(|e| e.active)
            .filter(|e| !only_mine || e.coordinator_id == viewer.id)
            .collect();
        events.sort_by(|a, b| a.event_date.cmp(&b.event_date).then_with(|| a.title.cmp(&b.title)));
        Ok(events)
    }

    /// Registrations signed up for `event_id`, latest signup first. Visible
    /// to the event's coordinator and to admins.
    pub async fn participants(
        &self,
        viewer: &Coordinator,
        event_id: Uuid,
        query: RosterQuery,
    ) -> Result<Roster> {
        let event = self
            .store
            .get(event_id)
            .await?
            .ok_or_else(|| RegistryError::not_found(format!("Event {event_id}")))?;
        if event.coordinator_id != viewer.id && !viewer.is_admin() {
            return Err(RegistryError::Forbidden(
                "Only the event coordinator can view its participants".into(),
            ));
        }

        let mut signed_up: Vec<(DateTime<Utc>, Registration)> = self
            .registry
            .all()
            .await?
            .into_iter()
            .filter(|r| query.status.is_none_or(|s| r.payment.status == s))
            .filter_map(|r| {
                let at = r
                    .registered_events
                    .iter()
                    .find(|e| e.event_id == event_id)?
                    .registered_at;
                Some((at, r))
            })
            .collect();
        signed_up.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.register_id.cmp(&a.1.register_id))
        });

        let registrations = signed_up.into_iter().map(|(_, r)| r).collect();
        let (registrations, pagination) =
            Pagination::paginate(registrations, query.page, query.limit);
        Ok(Roster {
            event,
            registrations,
            pagination,
        })
    }

    /// Signs a registration up for events. Already registered events are
    /// skipped; a full event rejects the whole request.
    #[instrument(skip(self, event_ids), fields(events = event_ids.len()))]
    pub async fn register_for_events(&self, user_id: &str, event_ids: &[Uuid]) -> Result<Registration> {
        if event_ids.is_empty() {
            return Err(RegistryError::validation("At least one event must be selected"));
        }

        let _guard = self.registry.lock().lock().await;
        let mut registration = self.registry.find(user_id).await?;

        let mut events = Vec::with_capacity(event_ids.len());
        for id in event_ids {
            match self.store.get(*id).await? {
                Some(event) if event.active => events.push(event),
                _ => {
                    return Err(RegistryError::validation(format!(
                        "Event {id} does not exist or is inactive"
                    )));
                }
            }
        }

        let mut fresh: Vec<Event> = Vec::new();
        for event in events {
            let already = registration
                .registered_events
                .iter()
                .any(|r| r.event_id == event.id || r.event_name == event.title);
            if !already && !fresh.iter().any(|e| e.id == event.id) {
                fresh.push(event);
            }
        }
        if fresh.is_empty() {
            return Err(RegistryError::conflict("Already registered for the selected events"));
        }
        if let Some(full) = fresh.iter().find(|e| e.is_full()) {
            return Err(RegistryError::conflict(format!("Event {} is full", full.title)));
        }

        let before = registration.clone();
        let now = Utc::now();
        registration
            .registered_events
            .extend(fresh.iter().map(|e| RegisteredEvent::for_event(e, now)));
        registration.updated_at = now;
        self.registry.save(registration.clone()).await?;

        // Counters follow the saved signup; a failed write puts both back.
        for (written, event) in fresh.iter().enumerate() {
            let mut counted = event.clone();
            counted.current_participants += 1;
            if let Err(e) = self.store.store(counted).await {
                warn!(event_id = %event.id, error = %e, "Event signup rolled back");
                for event in &fresh[..written] {
                    if let Err(e) = self.store.store(event.clone()).await {
                        error!(event_id = %event.id, error = %e, "Failed to restore participant count");
                    }
                }
                self.registry.save(before).await?;
                return Err(e);
            }
        }

        info!(
            register_id = %registration.register_id,
            total = registration.registered_events.len(),
            "Registered for events"
        );
        Ok(registration)
    }
}
