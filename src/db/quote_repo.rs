// src/db/quote_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{types::Json, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quote::{Quote, QuoteItem, QuoteStatus, StatusHistoryEntry, TransferHistoryEntry},
};

/// Critérios de listagem. Sempre ordenado por `created_at` decrescente.
#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub created_by: Option<Uuid>,
    pub status: Option<QuoteStatus>,
    pub client_id: Option<Uuid>,
    // Apenas cotações com ao menos uma transferência
    pub transferred_only: bool,
    // Apenas transferências em que o usuário é origem ou destino
    pub transfer_party: Option<Uuid>,
}

/// Estado completo dos campos editáveis, gravado de uma vez.
#[derive(Debug, Clone)]
pub struct QuoteWrite {
    pub client_id: Uuid,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub date: DateTime<Utc>,
    pub items: Vec<QuoteItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub status: QuoteStatus,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub last_updated_by: Uuid,
    // Entrada de histórico gravada junto com a mudança de status
    pub status_entry: Option<StatusHistoryEntry>,
}

/// Persistência dos documentos de cotação.
///
/// Os históricos só crescem por append atômico; `update` só grava se o status
/// no banco ainda for `expected_status`.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn insert(&self, quote: &Quote) -> Result<(), AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Quote>, AppError>;

    async fn list(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, AppError>;

    /// Retorna `false` se a cotação não existe.
    async fn append_status(&self, id: Uuid, entry: &StatusHistoryEntry) -> Result<bool, AppError>;

    /// Retorna `None` se a cotação sumiu ou se o status mudou desde a leitura.
    async fn update(
        &self,
        id: Uuid,
        expected_status: QuoteStatus,
        write: &QuoteWrite,
    ) -> Result<Option<Quote>, AppError>;

    async fn append_transfer(
        &self,
        id: Uuid,
        entry: &TransferHistoryEntry,
    ) -> Result<Option<Quote>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

const QUOTE_COLUMNS: &str = r#"
    id, client_id, client_name, client_email, client_phone, date,
    items, subtotal, discount, total, status,
    status_history, transfer_history, notes,
    created_by, created_at, updated_at, last_updated_by
"#;

#[derive(Debug, FromRow)]
struct QuoteRow {
    id: Uuid,
    client_id: Uuid,
    client_name: String,
    client_email: Option<String>,
    client_phone: Option<String>,
    date: DateTime<Utc>,
    items: Json<Vec<QuoteItem>>,
    subtotal: Decimal,
    discount: Decimal,
    total: Decimal,
    status: QuoteStatus,
    status_history: Json<Vec<StatusHistoryEntry>>,
    transfer_history: Json<Vec<TransferHistoryEntry>>,
    notes: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_updated_by: Option<Uuid>,
}

impl From<QuoteRow> for Quote {
    fn from(row: QuoteRow) -> Self {
        Quote {
            id: row.id,
            client_id: row.client_id,
            client_name: row.client_name,
            client_email: row.client_email,
            client_phone: row.client_phone,
            date: row.date,
            items: row.items.0,
            subtotal: row.subtotal,
            discount: row.discount,
            total: row.total,
            status: row.status,
            status_history: row.status_history.0,
            transfer_history: row.transfer_history.0,
            notes: row.notes,
            created_by: row.created_by,
            seller_name: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_updated_by: row.last_updated_by,
        }
    }
}

// O repositório de cotações, responsável por todas as interações com a tabela 'quotes'
#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteStore for QuoteRepository {
    async fn insert(&self, quote: &Quote) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, client_id, client_name, client_email, client_phone, date,
                items, subtotal, discount, total, status,
                status_history, transfer_history, notes,
                created_by, created_at, updated_at, last_updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(quote.id)
        .bind(quote.client_id)
        .bind(&quote.client_name)
        .bind(&quote.client_email)
        .bind(&quote.client_phone)
        .bind(quote.date)
        .bind(Json(&quote.items))
        .bind(quote.subtotal)
        .bind(quote.discount)
        .bind(quote.total)
        .bind(quote.status)
        .bind(Json(&quote.status_history))
        .bind(Json(&quote.transfer_history))
        .bind(&quote.notes)
        .bind(quote.created_by)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .bind(quote.last_updated_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Quote>, AppError> {
        let row = sqlx::query_as::<_, QuoteRow>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Quote::from))
    }

    async fn list(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE TRUE"
        ));

        if let Some(created_by) = filter.created_by {
            qb.push(" AND created_by = ").push_bind(created_by);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(client_id) = filter.client_id {
            qb.push(" AND client_id = ").push_bind(client_id);
        }
        if filter.transferred_only {
            qb.push(" AND jsonb_array_length(transfer_history) > 0");
        }
        if let Some(user_id) = filter.transfer_party {
            // Containment no JSONB: alguma transferência com o usuário na origem ou no destino
            qb.push(" AND (transfer_history @> ")
                .push_bind(Json(json!([{ "fromUserId": user_id }])))
                .push(" OR transfer_history @> ")
                .push_bind(Json(json!([{ "toUserId": user_id }])))
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build_query_as::<QuoteRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Quote::from).collect())
    }

    async fn append_status(&self, id: Uuid, entry: &StatusHistoryEntry) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE quotes SET status_history = status_history || $1 WHERE id = $2",
        )
        .bind(Json([entry]))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(
        &self,
        id: Uuid,
        expected_status: QuoteStatus,
        write: &QuoteWrite,
    ) -> Result<Option<Quote>, AppError> {
        // Status e histórico na mesma instrução: o campo nunca diverge da última entrada.
        let new_entries: Vec<&StatusHistoryEntry> = write.status_entry.iter().collect();

        let row = sqlx::query_as::<_, QuoteRow>(&format!(
            r#"
            UPDATE quotes
            SET client_id = $1, client_name = $2, client_email = $3, client_phone = $4,
                date = $5, items = $6, subtotal = $7, discount = $8, total = $9,
                status = $10, notes = $11, updated_at = $12, last_updated_by = $13,
                status_history = status_history || $14
            WHERE id = $15 AND status = $16
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(write.client_id)
        .bind(&write.client_name)
        .bind(&write.client_email)
        .bind(&write.client_phone)
        .bind(write.date)
        .bind(Json(&write.items))
        .bind(write.subtotal)
        .bind(write.discount)
        .bind(write.total)
        .bind(write.status)
        .bind(&write.notes)
        .bind(write.updated_at)
        .bind(write.last_updated_by)
        .bind(Json(new_entries))
        .bind(id)
        .bind(expected_status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Quote::from))
    }

    async fn append_transfer(
        &self,
        id: Uuid,
        entry: &TransferHistoryEntry,
    ) -> Result<Option<Quote>, AppError> {
        let row = sqlx::query_as::<_, QuoteRow>(&format!(
            r#"
            UPDATE quotes
            SET transfer_history = transfer_history || $1,
                last_updated_by = $2,
                updated_at = $3
            WHERE id = $4
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(Json([entry]))
        .bind(entry.transferred_by)
        .bind(entry.date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Quote::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
