// src/models/machine.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: Uuid,
    #[schema(example = "Prensa Hidráulica PH-200")]
    pub name: String,
    pub description: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    // Cliente onde a máquina está instalada
    pub client_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachinePayload {
    #[validate(length(min = 1, message = "O nome da máquina é obrigatório."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub client_id: Option<Uuid>,
    pub active: Option<bool>,
}
