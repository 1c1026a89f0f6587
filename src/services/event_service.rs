// src/services/event_service.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EventRepository,
    models::{
        auth::Actor,
        event::{ensure_ordered, CalendarEvent, CreateEventPayload, UpdateEventPayload},
    },
};

#[derive(Clone)]
pub struct EventService {
    repo: EventRepository,
}

// Mescla a atualização parcial e revalida o intervalo resultante
fn apply_changes(
    mut event: CalendarEvent,
    changes: UpdateEventPayload,
    now: DateTime<Utc>,
) -> Result<CalendarEvent, AppError> {
    if let Some(title) = changes.title {
        event.title = title.trim().to_string();
    }
    if changes.description.is_some() {
        event.description = changes.description;
    }
    event.start = changes.start.unwrap_or(event.start);
    event.end = changes.end.unwrap_or(event.end);
    event.all_day = changes.all_day.unwrap_or(event.all_day);
    event.kind = changes.kind.unwrap_or(event.kind);
    if changes.client_id.is_some() {
        event.client_id = changes.client_id;
    }
    if changes.quote_id.is_some() {
        event.quote_id = changes.quote_id;
    }
    ensure_ordered(event.start, event.end)?;
    event.updated_at = now;
    Ok(event)
}

impl EventService {
    pub fn new(repo: EventRepository) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        if let (Some(from), Some(to)) = (from, to) {
            ensure_ordered(from, to)?;
        }
        self.repo.list(from, to).await
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<CalendarEvent>, AppError> {
        self.repo.list_by_client(client_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<CalendarEvent, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Evento"))
    }

    pub async fn create(
        &self,
        actor: Actor,
        payload: CreateEventPayload,
    ) -> Result<CalendarEvent, AppError> {
        ensure_ordered(payload.start, payload.end)?;
        let now = Utc::now();

        let event = CalendarEvent {
            id: Uuid::new_v4(),
            title: payload.title.trim().to_string(),
            description: payload.description,
            start: payload.start,
            end: payload.end,
            all_day: payload.all_day,
            kind: payload.kind,
            client_id: payload.client_id,
            quote_id: payload.quote_id,
            created_by: actor.id,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(&event).await
    }

    // Só quem criou o evento, ou um admin, pode alterá-lo
    async fn load_owned(&self, actor: Actor, id: Uuid) -> Result<CalendarEvent, AppError> {
        let event = self.get(id).await?;
        if !actor.is_admin && event.created_by != actor.id {
            return Err(AppError::Forbidden("Sem permissão para alterar este evento"));
        }
        Ok(event)
    }

    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        changes: UpdateEventPayload,
    ) -> Result<CalendarEvent, AppError> {
        let current = self.load_owned(actor, id).await?;
        let merged = apply_changes(current, changes, Utc::now())?;
        self.repo
            .update(&merged)
            .await?
            .ok_or(AppError::NotFound("Evento"))
    }

    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), AppError> {
        self.load_owned(actor, id).await?;
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Evento"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventKind;
    use chrono::Duration;

    fn event() -> CalendarEvent {
        let start = Utc::now();
        CalendarEvent {
            id: Uuid::new_v4(),
            title: "Visita".into(),
            description: None,
            start,
            end: start + Duration::hours(1),
            all_day: false,
            kind: EventKind::Visit,
            client_id: None,
            quote_id: None,
            created_by: Uuid::new_v4(),
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let original = event();
        let merged = apply_changes(
            original.clone(),
            UpdateEventPayload {
                title: Some(" Reunião ".into()),
                kind: Some(EventKind::Meeting),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(merged.title, "Reunião");
        assert_eq!(merged.kind, EventKind::Meeting);
        assert_eq!(merged.start, original.start);
        assert_eq!(merged.end, original.end);
    }

    #[test]
    fn moving_start_past_end_is_rejected() {
        let original = event();
        let result = apply_changes(
            original.clone(),
            UpdateEventPayload {
                start: Some(original.end + Duration::minutes(5)),
                ..Default::default()
            },
            Utc::now(),
        );
        assert!(matches!(result, Err(AppError::InvalidDateRange)));
    }
}
