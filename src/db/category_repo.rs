// src/db/category_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::category::{Category, CategoryPayload},
};

const CATEGORY_COLUMNS: &str = "id, name, description, active, created_at, updated_at";

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn create(&self, name: &str, payload: &CategoryPayload) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (id, name, description, active)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&payload.description)
        .bind(payload.active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AppError::Conflict("Já existe uma categoria com este nome.")))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                active = COALESCE($4, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AppError::Conflict("Já existe uma categoria com este nome.")))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
