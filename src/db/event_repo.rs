// src/db/event_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{common::error::AppError, models::event::CalendarEvent};

const EVENT_COLUMNS: &str = r#"
    id, title, description, start, "end", all_day, kind,
    client_id, quote_id, created_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Sem limites, lista tudo; com limites, filtra pelo início do evento
    pub async fn list(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE TRUE"
        ));
        if let Some(from) = from {
            qb.push(" AND start >= ").push_bind(from);
        }
        if let Some(to) = to {
            qb.push(" AND start <= ").push_bind(to);
        }
        qb.push(" ORDER BY start");

        let events = qb
            .build_query_as::<CalendarEvent>()
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<CalendarEvent>, AppError> {
        let events = sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE client_id = $1 ORDER BY start"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CalendarEvent>, AppError> {
        let event = sqlx::query_as::<_, CalendarEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn insert(&self, event: &CalendarEvent) -> Result<CalendarEvent, AppError> {
        let created = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"
            INSERT INTO events (
                id, title, description, start, "end", all_day, kind,
                client_id, quote_id, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(event.all_day)
        .bind(event.kind)
        .bind(event.client_id)
        .bind(event.quote_id)
        .bind(event.created_by)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    // O serviço já mesclou as alterações; aqui grava o estado inteiro
    pub async fn update(&self, event: &CalendarEvent) -> Result<Option<CalendarEvent>, AppError> {
        let updated = sqlx::query_as::<_, CalendarEvent>(&format!(
            r#"
            UPDATE events
            SET title = $2, description = $3, start = $4, "end" = $5, all_day = $6,
                kind = $7, client_id = $8, quote_id = $9, updated_at = $10
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(event.all_day)
        .bind(event.kind)
        .bind(event.client_id)
        .bind(event.quote_id)
        .bind(event.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
