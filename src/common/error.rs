use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::quote::QuoteStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campos obrigatórios não preenchidos")]
    MissingRequiredFields,

    #[error("Desconto inválido")]
    InvalidDiscount,

    #[error("Valor acima do limite")]
    AmountOutOfRange,

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: QuoteStatus, to: QuoteStatus },

    // Outro usuário alterou o status entre a leitura e a escrita
    #[error("Conflito de status")]
    StatusConflict,

    #[error("Destino de transferência inválido")]
    InvalidTransferTarget,

    #[error("Intervalo de datas inválido")]
    InvalidDateRange,

    #[error("Cotação não encontrada")]
    QuoteNotFound,

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Sem permissão: {0}")]
    Forbidden(&'static str),

    // Chave única violada (código de produto, nome de categoria)
    #[error("Conflito: {0}")]
    Conflict(&'static str),

    #[error("Acesso restrito a administradores")]
    AdminRequired,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidStatusTransition { from, to } => {
                let message = format!(
                    "Não é possível alterar o status de '{}' para '{}'.",
                    from.info().label,
                    to.info().label
                );
                let body = Json(json!({
                    "error": message,
                    "allowed": from.next_statuses(),
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::NotFound(entity) => {
                let body = Json(json!({ "error": format!("{} não encontrado(a).", entity) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::MissingRequiredFields => {
                (StatusCode::BAD_REQUEST, "Campos obrigatórios não preenchidos.")
            }
            AppError::AmountOutOfRange => (
                StatusCode::BAD_REQUEST,
                "Valor acima do limite permitido (R$ 999.999.999.999,99).",
            ),
            AppError::InvalidDiscount => (
                StatusCode::BAD_REQUEST,
                "O desconto deve ser positivo e não pode exceder o subtotal.",
            ),
            AppError::StatusConflict => (
                StatusCode::CONFLICT,
                "O status desta cotação foi alterado por outro usuário. Recarregue e tente novamente.",
            ),
            AppError::InvalidTransferTarget => (
                StatusCode::BAD_REQUEST,
                "Selecione outro vendedor para receber a cotação.",
            ),
            AppError::InvalidDateRange => (
                StatusCode::BAD_REQUEST,
                "A data final não pode ser anterior à data inicial.",
            ),
            AppError::QuoteNotFound => (StatusCode::NOT_FOUND, "Cotação não encontrada."),
            AppError::AdminRequired => (
                StatusCode::FORBIDDEN,
                "Apenas administradores podem realizar esta ação.",
            ),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),

            // Banco, bcrypt, JWT e anyhow viram 500 com mensagem genérica.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado. Por favor, tente novamente.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let cases = [
            (AppError::QuoteNotFound, StatusCode::NOT_FOUND),
            (AppError::Forbidden("Sem permissão"), StatusCode::FORBIDDEN),
            (AppError::AdminRequired, StatusCode::FORBIDDEN),
            (AppError::StatusConflict, StatusCode::CONFLICT),
            (AppError::MissingRequiredFields, StatusCode::BAD_REQUEST),
            (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AppError::NotFound("Produto"), StatusCode::NOT_FOUND),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn invalid_transition_lists_allowed_statuses() {
        let response = AppError::InvalidStatusTransition {
            from: QuoteStatus::Negociacao,
            to: QuoteStatus::Enviado,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["allowed"], serde_json::json!(["fechado", "perdido"]));
        assert!(body["error"].as_str().unwrap().contains("Em Negociação"));
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("pool exhausted")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(!body["error"].as_str().unwrap().contains("pool"));
    }
}
