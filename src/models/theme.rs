// src/models/theme.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CardShadow {
    Light,
    Medium,
    Strong,
}

/// Tema público da aplicação (documento `public/theme`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSettings {
    #[validate(length(min = 1))]
    #[schema(example = "#1976d2")]
    pub primary_color: String,
    #[validate(length(min = 1))]
    pub secondary_color: String,
    #[validate(length(min = 1))]
    pub menu_color: String,
    #[validate(length(min = 1))]
    pub background_color: String,
    #[validate(length(min = 1))]
    pub text_color: String,
    pub logo: Option<String>,
    #[validate(range(max = 64, message = "Raio máximo de 64px."))]
    pub button_radius: u16,
    #[validate(range(max = 64, message = "Raio máximo de 64px."))]
    pub card_radius: u16,
    pub card_shadow: CardShadow,
    #[validate(length(min = 1))]
    pub success_color: String,
    #[validate(length(min = 1))]
    pub error_color: String,
    #[validate(length(min = 1))]
    pub warning_color: String,
    pub table_border: bool,
    pub table_striped: bool,
    #[schema(example = "rgba(0, 0, 0, 0.08)")]
    pub menu_selected: String,
    pub menu_hover: String,
    pub login_card_color: String,
    #[validate(range(max = 64, message = "Raio máximo de 64px."))]
    pub login_card_radius: u16,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#1976d2".into(),
            secondary_color: "#dc004e".into(),
            menu_color: "#ffffff".into(),
            background_color: "#f5f5f5".into(),
            text_color: "#000000".into(),
            logo: None,
            button_radius: 4,
            card_radius: 4,
            card_shadow: CardShadow::Medium,
            success_color: "#4caf50".into(),
            error_color: "#f44336".into(),
            warning_color: "#ff9800".into(),
            table_border: true,
            table_striped: true,
            menu_selected: "rgba(0, 0, 0, 0.08)".into(),
            menu_hover: "rgba(0, 0, 0, 0.04)".into(),
            login_card_color: "#ffffff".into(),
            login_card_radius: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDocument {
    #[serde(flatten)]
    pub settings: ThemeSettings,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogoPayload {
    #[validate(url(message = "URL do logo inválida."))]
    pub logo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let theme: ThemeSettings = serde_json::from_value(serde_json::json!({
            "primaryColor": "#2563eb",
            "cardShadow": "strong"
        }))
        .unwrap();

        assert_eq!(theme.primary_color, "#2563eb");
        assert_eq!(theme.card_shadow, CardShadow::Strong);
        assert_eq!(theme.secondary_color, "#dc004e");
        assert!(theme.table_striped);
    }

    #[test]
    fn oversized_radius_is_rejected() {
        let theme = ThemeSettings { card_radius: 200, ..Default::default() };
        assert!(theme.validate().is_err());
        assert!(ThemeSettings::default().validate().is_ok());
    }
}
