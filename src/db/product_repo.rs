// src/db/product_repo.rs

use std::collections::BTreeMap;

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::product::{Product, ProductPayload},
};

const PRODUCT_COLUMNS: &str = r#"
    id, name, description, price, category, code, image,
    videos, documents, specs, machine_ids, active, created_at, updated_at
"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY name"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    // `payload` já sanitizado e com nome garantido pelo serviço
    pub async fn create(&self, name: &str, payload: &ProductPayload) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                id, name, description, price, category, code, image,
                videos, documents, specs, machine_ids, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(&payload.category)
        .bind(&payload.code)
        .bind(&payload.image)
        .bind(Json(payload.videos.clone().unwrap_or_default()))
        .bind(Json(payload.documents.clone().unwrap_or_default()))
        .bind(Json(payload.specs.clone().unwrap_or_else(BTreeMap::new)))
        .bind(payload.machine_ids.clone().unwrap_or_default())
        .bind(payload.active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AppError::Conflict("Já existe um produto com este código.")))
    }

    // Campos ausentes no payload permanecem como estão
    pub async fn update(&self, id: Uuid, payload: &ProductPayload) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                code = COALESCE($6, code),
                image = COALESCE($7, image),
                videos = COALESCE($8, videos),
                documents = COALESCE($9, documents),
                specs = COALESCE($10, specs),
                machine_ids = COALESCE($11, machine_ids),
                active = COALESCE($12, active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(&payload.category)
        .bind(&payload.code)
        .bind(&payload.image)
        .bind(payload.videos.as_ref().map(Json))
        .bind(payload.documents.as_ref().map(Json))
        .bind(payload.specs.as_ref().map(Json))
        .bind(&payload.machine_ids)
        .bind(payload.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AppError::Conflict("Já existe um produto com este código.")))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
