// src/db/client_repo.rs

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::client::{Client, CreateClientPayload, UpdateClientPayload},
};

const CLIENT_COLUMNS: &str =
    "id, name, email, phone, company, address, notes, created_at, updated_at";

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }

    // `pattern` já vem escapado (ver models::client::prefix_pattern)
    pub async fn search_by_name(&self, pattern: &str) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE name ILIKE $1 ORDER BY name"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn create(&self, payload: &CreateClientPayload) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients (id, name, email, phone, company, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(payload.name.trim())
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.company)
        .bind(payload.address.as_ref().map(Json))
        .bind(&payload.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateClientPayload,
    ) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                address = COALESCE($6, address),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.company)
        .bind(payload.address.as_ref().map(Json))
        .bind(&payload.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
