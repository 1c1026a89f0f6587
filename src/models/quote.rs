// src/models/quote.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// --- Status ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Enviado,
    Negociacao,
    Fechado,
    Perdido,
}

/// Rótulo, cor, ícone e próximos status permitidos de cada status.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStatusInfo {
    pub status: QuoteStatus,
    #[schema(value_type = String, example = "Em Negociação")]
    pub label: &'static str,
    #[schema(value_type = String, example = "warning")]
    pub color: &'static str,
    #[schema(value_type = String, example = "handshake")]
    pub icon: &'static str,
    #[schema(value_type = Vec<QuoteStatus>)]
    pub next_statuses: &'static [QuoteStatus],
}

pub const QUOTE_STATUS_INFO: [QuoteStatusInfo; 4] = [
    QuoteStatusInfo {
        status: QuoteStatus::Enviado,
        label: "Enviado",
        color: "primary",
        icon: "send",
        next_statuses: &[QuoteStatus::Negociacao, QuoteStatus::Fechado, QuoteStatus::Perdido],
    },
    QuoteStatusInfo {
        status: QuoteStatus::Negociacao,
        label: "Em Negociação",
        color: "warning",
        icon: "handshake",
        next_statuses: &[QuoteStatus::Fechado, QuoteStatus::Perdido],
    },
    QuoteStatusInfo {
        status: QuoteStatus::Fechado,
        label: "Fechado",
        color: "success",
        icon: "check_circle",
        next_statuses: &[],
    },
    QuoteStatusInfo {
        status: QuoteStatus::Perdido,
        label: "Perdido",
        color: "error",
        icon: "cancel",
        next_statuses: &[],
    },
];

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 4] = [
        QuoteStatus::Enviado,
        QuoteStatus::Negociacao,
        QuoteStatus::Fechado,
        QuoteStatus::Perdido,
    ];

    pub fn info(self) -> &'static QuoteStatusInfo {
        let index = match self {
            QuoteStatus::Enviado => 0,
            QuoteStatus::Negociacao => 1,
            QuoteStatus::Fechado => 2,
            QuoteStatus::Perdido => 3,
        };
        &QUOTE_STATUS_INFO[index]
    }

    pub fn next_statuses(self) -> &'static [QuoteStatus] {
        self.info().next_statuses
    }

    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Enviado => "enviado",
            QuoteStatus::Negociacao => "negociacao",
            QuoteStatus::Fechado => "fechado",
            QuoteStatus::Perdido => "perdido",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Documento da cotação ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub product_id: Uuid,
    #[schema(example = "Rolamento 6204")]
    pub product_name: String,
    #[schema(example = "2")]
    pub quantity: Decimal,
    #[schema(example = "45.90")]
    pub unit_price: Decimal,
    #[schema(example = "91.80")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub status: QuoteStatus,
    pub date: DateTime<Utc>,
    pub updated_by: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferHistoryEntry {
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub date: DateTime<Utc>,
    pub transferred_by: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub client_id: Uuid,
    #[schema(example = "Metalúrgica Silva Ltda")]
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub date: DateTime<Utc>,
    pub items: Vec<QuoteItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub status: QuoteStatus,
    pub status_history: Vec<StatusHistoryEntry>,
    pub transfer_history: Vec<TransferHistoryEntry>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    // Preenchido apenas para administradores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_updated_by: Option<Uuid>,
}

impl Quote {
    /// O usuário aparece em alguma transferência (como origem ou destino)?
    pub fn involves_in_transfer(&self, user_id: Uuid) -> bool {
        self.transfer_history
            .iter()
            .any(|t| t.from_user_id == user_id || t.to_user_id == user_id)
    }
}

// Transferência com os nomes dos vendedores, para o histórico do cliente
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamedTransfer {
    #[serde(flatten)]
    pub entry: TransferHistoryEntry,
    pub from_user_name: String,
    pub to_user_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuote {
    #[serde(flatten)]
    pub quote: Quote,
    pub created_by_name: String,
    pub transfers: Vec<NamedTransfer>,
}

// --- Cálculo de totais ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Limite exclusivo das colunas NUMERIC(14, 2): 10^12.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Arredonda para centavos como o Postgres faz ao gravar em NUMERIC(_, 2).
pub fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn within_limit(value: Decimal) -> Result<Decimal, AppError> {
    if value >= AMOUNT_LIMIT {
        return Err(AppError::AmountOutOfRange);
    }
    Ok(value)
}

impl QuoteItemInput {
    /// O total da linha é quantidade × preço unitário, em centavos.
    pub fn into_item(self) -> Result<QuoteItem, AppError> {
        let total = self
            .quantity
            .checked_mul(self.unit_price)
            .ok_or(AppError::AmountOutOfRange)?;

        Ok(QuoteItem {
            total: within_limit(to_cents(total))?,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
        })
    }
}

impl QuoteTotals {
    /// Soma linhas já arredondadas, então `total == subtotal - discount` vale também no banco.
    pub fn compute(items: &[QuoteItem], discount: Decimal) -> Result<Self, AppError> {
        let subtotal = items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total))
            .ok_or(AppError::AmountOutOfRange)?;
        let subtotal = within_limit(subtotal)?;

        let discount = to_cents(discount);
        if (discount.is_sign_negative() && !discount.is_zero()) || discount > subtotal {
            return Err(AppError::InvalidDiscount);
        }
        Ok(Self {
            subtotal,
            discount,
            total: subtotal - discount,
        })
    }
}

// --- Payloads ---

fn validate_below_limit(value: &Decimal) -> Result<(), validator::ValidationError> {
    if *value >= AMOUNT_LIMIT {
        let mut err = validator::ValidationError::new("amount_limit");
        err.message = Some("O valor excede o limite permitido.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_positive(value: &Decimal) -> Result<(), validator::ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = validator::ValidationError::new("positive");
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    validate_below_limit(value)
}

fn validate_non_negative(value: &Decimal) -> Result<(), validator::ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = validator::ValidationError::new("non_negative");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    validate_below_limit(value)
}

// Campo ausente fica `None`; `null` explícito vira `Some(None)` e limpa o valor
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItemInput {
    pub product_id: Uuid,

    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    #[schema(example = "Rolamento 6204")]
    pub product_name: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "2")]
    pub quantity: Decimal,

    #[validate(custom(function = "validate_non_negative"))]
    #[schema(example = "45.90")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotePayload {
    pub client_id: Option<Uuid>,

    #[serde(default)]
    #[schema(example = "Metalúrgica Silva Ltda")]
    pub client_name: String,

    #[validate(email(message = "O e-mail do cliente é inválido."))]
    pub client_email: Option<String>,
    pub client_phone: Option<String>,

    // Se ausente, usa a data de criação
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<QuoteItemInput>,

    #[validate(custom(function = "validate_non_negative"))]
    pub discount: Option<Decimal>,

    pub status: Option<QuoteStatus>,
    pub notes: Option<String>,
}

/// Atualização parcial: só os campos presentes são alterados.
/// E-mail, telefone e observações aceitam `null` para apagar o valor atual.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotePayload {
    pub client_id: Option<Uuid>,
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(email(message = "O e-mail do cliente é inválido."))]
    #[schema(value_type = Option<String>)]
    pub client_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub client_phone: Option<Option<String>>,
    pub date: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub items: Option<Vec<QuoteItemInput>>,
    #[validate(custom(function = "validate_non_negative"))]
    pub discount: Option<Decimal>,
    pub status: Option<QuoteStatus>,
    // Observação gravada no histórico de status
    pub status_notes: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusPayload {
    pub status: QuoteStatus,
    #[schema(example = "Cliente pediu prazo de 30 dias")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuotePayload {
    pub to_user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(quantity: &str, unit_price: &str) -> QuoteItem {
        QuoteItemInput {
            product_id: Uuid::new_v4(),
            product_name: "Correia".into(),
            quantity: dec(quantity),
            unit_price: dec(unit_price),
        }
        .into_item()
        .unwrap()
    }

    #[test]
    fn transition_table_matches_status_info() {
        use QuoteStatus::*;

        assert!(Enviado.can_transition_to(Negociacao));
        assert!(Enviado.can_transition_to(Fechado));
        assert!(Enviado.can_transition_to(Perdido));
        assert!(Negociacao.can_transition_to(Fechado));
        assert!(Negociacao.can_transition_to(Perdido));

        assert!(!Negociacao.can_transition_to(Enviado));
        assert!(!Enviado.can_transition_to(Enviado));
        for next in QuoteStatus::ALL {
            assert!(!Fechado.can_transition_to(next));
            assert!(!Perdido.can_transition_to(next));
        }
    }

    #[test]
    fn info_is_indexed_by_status() {
        for status in QuoteStatus::ALL {
            assert_eq!(status.info().status, status);
        }
        assert_eq!(QuoteStatus::Negociacao.info().label, "Em Negociação");
    }

    #[test]
    fn status_serializes_as_portuguese_slug() {
        assert_eq!(serde_json::to_string(&QuoteStatus::Negociacao).unwrap(), "\"negociacao\"");
        let parsed: QuoteStatus = serde_json::from_str("\"perdido\"").unwrap();
        assert_eq!(parsed, QuoteStatus::Perdido);
    }

    #[test]
    fn item_total_is_quantity_times_unit_price() {
        let line = item("3", "12.50");
        assert_eq!(line.total, dec("37.50"));
    }

    #[test]
    fn totals_subtract_discount_from_subtotal() {
        let items = vec![item("2", "10"), item("1", "5.25")];
        let totals = QuoteTotals::compute(&items, dec("5")).unwrap();

        assert_eq!(totals.subtotal, dec("25.25"));
        assert_eq!(totals.total, dec("20.25"));
        assert_eq!(totals.total, totals.subtotal - totals.discount);
    }

    #[test]
    fn discount_cannot_exceed_subtotal_or_be_negative() {
        let items = vec![item("1", "10")];
        assert!(matches!(
            QuoteTotals::compute(&items, dec("10.01")),
            Err(AppError::InvalidDiscount)
        ));
        assert!(matches!(
            QuoteTotals::compute(&items, dec("-1")),
            Err(AppError::InvalidDiscount)
        ));
        assert_eq!(QuoteTotals::compute(&items, dec("10")).unwrap().total, Decimal::ZERO);
    }

    #[test]
    fn zero_quantity_fails_validation() {
        let input = QuoteItemInput {
            product_id: Uuid::new_v4(),
            product_name: "Polia".into(),
            quantity: Decimal::ZERO,
            unit_price: dec("1"),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn line_totals_and_discount_are_kept_in_cents() {
        let items = vec![item("1.5", "6.67")];
        assert_eq!(items[0].total, dec("10.01"));

        let totals = QuoteTotals::compute(&items, dec("0.004")).unwrap();
        assert_eq!(totals.subtotal, dec("10.01"));
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, totals.subtotal - totals.discount);
        for value in [totals.subtotal, totals.discount, totals.total] {
            assert_eq!(to_cents(value), value);
        }
    }

    #[test]
    fn amounts_beyond_the_column_limit_are_rejected() {
        let huge = QuoteItemInput {
            product_id: Uuid::new_v4(),
            product_name: "Polia".into(),
            quantity: Decimal::MAX,
            unit_price: dec("2"),
        };
        assert!(huge.validate().is_err());
        assert!(matches!(huge.into_item(), Err(AppError::AmountOutOfRange)));

        let near_limit = QuoteItemInput {
            product_id: Uuid::new_v4(),
            product_name: "Polia".into(),
            quantity: dec("2"),
            unit_price: dec("999999999999"),
        };
        assert!(near_limit.validate().is_ok());
        assert!(matches!(near_limit.into_item(), Err(AppError::AmountOutOfRange)));

        let lines = vec![item("1", "600000000000"), item("1", "600000000000")];
        assert!(matches!(
            QuoteTotals::compute(&lines, Decimal::ZERO),
            Err(AppError::AmountOutOfRange)
        ));
        assert_eq!(AMOUNT_LIMIT, dec("1000000000000"));
    }

    #[test]
    fn explicit_null_clears_optional_fields() {
        let cleared: UpdateQuotePayload =
            serde_json::from_value(serde_json::json!({ "clientEmail": null, "notes": null })).unwrap();
        assert_eq!(cleared.client_email, Some(None));
        assert_eq!(cleared.notes, Some(None));
        assert_eq!(cleared.client_phone, None);

        let invalid: UpdateQuotePayload =
            serde_json::from_value(serde_json::json!({ "clientEmail": "nao-e-email" })).unwrap();
        assert!(invalid.validate().is_err());
    }
}
