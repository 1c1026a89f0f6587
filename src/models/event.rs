// src/models/event.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "event_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Meeting,
    Visit,
    Reminder,
    Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    #[schema(example = "Visita técnica")]
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub client_id: Option<Uuid>,
    pub quote_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub client_id: Option<Uuid>,
    pub quote_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<EventKind>,
    pub client_id: Option<Uuid>,
    pub quote_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// O fim de um evento (ou de um filtro) não pode vir antes do início.
pub fn ensure_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::InvalidDateRange);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn rejects_end_before_start() {
        let start = Utc::now();
        assert!(ensure_ordered(start, start).is_ok());
        assert!(ensure_ordered(start, start + Duration::hours(1)).is_ok());
        assert!(matches!(
            ensure_ordered(start, start - Duration::minutes(1)),
            Err(AppError::InvalidDateRange)
        ));
    }

    #[test]
    fn kind_is_serialized_as_type() {
        let payload: CreateEventPayload = serde_json::from_value(serde_json::json!({
            "title": "Reunião com cliente",
            "start": "2026-03-02T13:00:00Z",
            "end": "2026-03-02T14:00:00Z",
            "type": "visit"
        }))
        .unwrap();
        assert_eq!(payload.kind, EventKind::Visit);
        assert!(!payload.all_day);
    }
}
