// src/db/machine_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::machine::{Machine, MachinePayload},
};

const MACHINE_COLUMNS: &str =
    "id, name, description, model, manufacturer, client_id, active, created_at, updated_at";

#[derive(Clone)]
pub struct MachineRepository {
    pool: PgPool,
}

impl MachineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Machine>, AppError> {
        let machines = sqlx::query_as::<_, Machine>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(machines)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Machine>, AppError> {
        let machines = sqlx::query_as::<_, Machine>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines WHERE client_id = $1 ORDER BY name"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(machines)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Machine>, AppError> {
        let machine = sqlx::query_as::<_, Machine>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(machine)
    }

    pub async fn create(&self, name: &str, payload: &MachinePayload) -> Result<Machine, AppError> {
        let machine = sqlx::query_as::<_, Machine>(&format!(
            r#"
            INSERT INTO machines (id, name, description, model, manufacturer, client_id, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MACHINE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&payload.description)
        .bind(&payload.model)
        .bind(&payload.manufacturer)
        .bind(payload.client_id)
        .bind(payload.active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;
        Ok(machine)
    }

    pub async fn update(&self, id: Uuid, payload: &MachinePayload) -> Result<Option<Machine>, AppError> {
        let machine = sqlx::query_as::<_, Machine>(&format!(
            r#"
            UPDATE machines
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                model = COALESCE($4, model),
                manufacturer = COALESCE($5, manufacturer),
                client_id = COALESCE($6, client_id),
                active = COALESCE($7, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MACHINE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.model)
        .bind(&payload.manufacturer)
        .bind(payload.client_id)
        .bind(payload.active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(machine)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM machines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
