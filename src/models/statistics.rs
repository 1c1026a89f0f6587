// src/models/statistics.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quote::{Quote, QuoteStatus},
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBucket {
    pub status: QuoteStatus,
    #[schema(example = 12)]
    pub count: usize,
    #[schema(example = "15320.50")]
    pub total: Decimal,
    #[schema(example = "R$ 15.320,50")]
    pub formatted_total: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStatistics {
    // Ausentes na visão geral (todos os vendedores)
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub quote_count: usize,
    pub by_status: Vec<StatusBucket>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatisticsQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl StatisticsQuery {
    pub fn validate_range(&self) -> Result<(), AppError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => Err(AppError::InvalidDateRange),
            _ => Ok(()),
        }
    }

    // Intervalo fechado sobre a data da cotação
    pub fn contains(&self, quote: &Quote) -> bool {
        self.start.is_none_or(|start| quote.date >= start)
            && self.end.is_none_or(|end| quote.date <= end)
    }
}
