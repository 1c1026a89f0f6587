// src/models/product.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VideoKind {
    Tecnico,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    VistaExplodida,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Video {
    #[serde(rename = "type")]
    pub kind: VideoKind,
    #[schema(example = "Troca de rolamento")]
    pub title: String,
    #[schema(example = "https://youtu.be/abc123")]
    pub external_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDocument {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    #[schema(example = "Manual de instalação")]
    pub title: String,
    pub external_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Rolamento 6204")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "45.90")]
    pub price: Option<Decimal>,
    #[schema(example = "Rolamentos")]
    pub category: Option<String>,
    #[schema(example = "ROL-6204")]
    pub code: Option<String>,
    pub image: Option<String>,
    #[schema(value_type = Vec<Video>)]
    pub videos: Json<Vec<Video>>,
    #[schema(value_type = Vec<ProductDocument>)]
    pub documents: Json<Vec<ProductDocument>>,
    #[schema(value_type = BTreeMap<String, String>, example = json!({"diâmetro": "47mm"}))]
    pub specs: Json<BTreeMap<String, String>>,
    pub machine_ids: Vec<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Usado tanto na criação quanto na atualização parcial.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub code: Option<String>,
    pub image: Option<String>,
    pub videos: Option<Vec<Video>>,
    pub documents: Option<Vec<ProductDocument>>,
    pub specs: Option<BTreeMap<String, String>>,
    pub machine_ids: Option<Vec<Uuid>>,
    pub active: Option<bool>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    })
}

impl ProductPayload {
    /// Strings vazias viram ausentes; vídeos e documentos sem título ou link são descartados.
    pub fn sanitize(self) -> Self {
        Self {
            name: non_empty(self.name),
            description: non_empty(self.description),
            price: self.price,
            category: non_empty(self.category),
            code: non_empty(self.code),
            image: non_empty(self.image),
            videos: self.videos.map(|videos| {
                videos
                    .into_iter()
                    .filter(|v| !v.title.trim().is_empty() && !v.external_link.trim().is_empty())
                    .collect()
            }),
            documents: self.documents.map(|docs| {
                docs.into_iter()
                    .filter(|d| !d.title.trim().is_empty() && !d.external_link.trim().is_empty())
                    .collect()
            }),
            specs: self.specs,
            machine_ids: self.machine_ids,
            active: self.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductFilter {
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_blank_strings_and_incomplete_media() {
        let payload = ProductPayload {
            name: Some("  Polia  ".into()),
            description: Some("".into()),
            code: Some("   ".into()),
            videos: Some(vec![
                Video { kind: VideoKind::Tecnico, title: "Montagem".into(), external_link: "https://v/1".into() },
                Video { kind: VideoKind::Tecnico, title: "".into(), external_link: "https://v/2".into() },
            ]),
            documents: Some(vec![ProductDocument {
                kind: DocumentKind::Manual,
                title: "Manual".into(),
                external_link: " ".into(),
            }]),
            ..Default::default()
        }
        .sanitize();

        assert_eq!(payload.name.as_deref(), Some("Polia"));
        assert!(payload.description.is_none());
        assert!(payload.code.is_none());
        assert_eq!(payload.videos.unwrap().len(), 1);
        assert!(payload.documents.unwrap().is_empty());
    }

    #[test]
    fn document_kind_uses_snake_case_type_field() {
        let doc: ProductDocument = serde_json::from_value(serde_json::json!({
            "type": "vista_explodida",
            "title": "Vista explodida",
            "external_link": "https://docs/1.pdf"
        }))
        .unwrap();
        assert_eq!(doc.kind, DocumentKind::VistaExplodida);
    }
}
