// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[schema(example = "Rua das Indústrias")]
    pub street: String,
    #[schema(example = "450")]
    pub number: String,
    pub complement: Option<String>,
    #[schema(example = "Joinville")]
    pub city: String,
    #[validate(length(equal = 2, message = "Use a sigla do estado (ex: SC)."))]
    #[schema(example = "SC")]
    pub state: String,
    #[schema(example = "89219-000")]
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[schema(example = "Metalúrgica Silva Ltda")]
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    #[schema(value_type = Option<Address>)]
    pub address: Option<Json<Address>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    #[schema(example = "(47) 99999-8888")]
    pub phone: String,
    pub company: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Telefone inválido."))]
    pub phone: Option<String>,
    pub company: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClientSearch {
    pub search: Option<String>,
}

/// Padrão ILIKE para busca por prefixo, escapando os curingas do próprio termo.
pub fn prefix_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 1);
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_pattern_escapes_wildcards() {
        assert_eq!(prefix_pattern("Silva"), "Silva%");
        assert_eq!(prefix_pattern(" 50%_off "), "50\\%\\_off%");
    }

    #[test]
    fn address_requires_state_abbreviation() {
        let address = Address {
            street: "Rua A".into(),
            number: "1".into(),
            complement: None,
            city: "Blumenau".into(),
            state: "Santa Catarina".into(),
            zip_code: "89000-000".into(),
        };
        assert!(address.validate().is_err());
    }
}
