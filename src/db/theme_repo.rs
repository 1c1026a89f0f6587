// src/db/theme_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::theme::{ThemeDocument, ThemeSettings},
};

const THEME_KEY: &str = "theme";

#[derive(Debug, FromRow)]
struct PublicDocumentRow {
    data: Json<ThemeSettings>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl From<PublicDocumentRow> for ThemeDocument {
    fn from(row: PublicDocumentRow) -> Self {
        ThemeDocument {
            settings: row.data.0,
            updated_at: Some(row.updated_at),
            updated_by: row.updated_by,
        }
    }
}

// Documentos públicos (legíveis sem login), guardados por chave em 'public_documents'
#[derive(Clone)]
pub struct ThemeRepository {
    pool: PgPool,
}

impl ThemeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self) -> Result<Option<ThemeDocument>, AppError> {
        let row = sqlx::query_as::<_, PublicDocumentRow>(
            "SELECT data, updated_at, updated_by FROM public_documents WHERE key = $1",
        )
        .bind(THEME_KEY)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ThemeDocument::from))
    }

    pub async fn upsert(
        &self,
        settings: &ThemeSettings,
        updated_by: Uuid,
    ) -> Result<ThemeDocument, AppError> {
        let row = sqlx::query_as::<_, PublicDocumentRow>(
            r#"
            INSERT INTO public_documents (key, data, updated_at, updated_by)
            VALUES ($1, $2, NOW(), $3)
            ON CONFLICT (key) DO UPDATE
            SET data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at,
                updated_by = EXCLUDED.updated_by
            RETURNING data, updated_at, updated_by
            "#,
        )
        .bind(THEME_KEY)
        .bind(Json(settings))
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
