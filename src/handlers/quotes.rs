// src/handlers/quotes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::quote::{
        ChangeStatusPayload, ClientQuote, CreateQuotePayload, Quote, QuoteStatus, QuoteStatusInfo,
        TransferQuotePayload, UpdateQuotePayload,
    },
};

#[derive(Debug, Serialize, ToSchema)]
pub struct QuotePermission {
    pub allowed: bool,
}

// GET /api/quotes
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    responses(
        (status = 200, description = "Cotações visíveis ao usuário, mais recentes primeiro", body = Vec<Quote>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quotes(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let quotes = app_state.quote_service.get_all(user.actor()).await?;
    Ok(Json(quotes))
}

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = CreateQuotePayload,
    responses(
        (status = 201, description = "Cotação criada", body = Quote),
        (status = 400, description = "Campos obrigatórios ausentes ou desconto inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let quote = app_state.quote_service.create(user.actor(), payload).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

// GET /api/quotes/status-info
#[utoipa::path(
    get,
    path = "/api/quotes/status-info",
    tag = "Quotes",
    responses(
        (status = 200, description = "Rótulos, cores e transições de cada status", body = Vec<QuoteStatusInfo>)
    ),
    security(("api_jwt" = []))
)]
pub async fn status_info(State(app_state): State<AppState>) -> Json<&'static [QuoteStatusInfo]> {
    Json(app_state.quote_service.status_info())
}

// GET /api/quotes/transferred
#[utoipa::path(
    get,
    path = "/api/quotes/transferred",
    tag = "Quotes",
    responses(
        (status = 200, description = "Cotações com transferências envolvendo o usuário", body = Vec<Quote>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transferred(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let quotes = app_state
        .quote_service
        .get_transferred_quotes(user.actor())
        .await?;
    Ok(Json(quotes))
}

// GET /api/quotes/status/{status}
#[utoipa::path(
    get,
    path = "/api/quotes/status/{status}",
    tag = "Quotes",
    params(("status" = QuoteStatus, Path, description = "Status da cotação")),
    responses((status = 200, description = "Cotações no status", body = Vec<Quote>)),
    security(("api_jwt" = []))
)]
pub async fn list_by_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(status): Path<QuoteStatus>,
) -> Result<impl IntoResponse, AppError> {
    let quotes = app_state
        .quote_service
        .get_by_status(user.actor(), status)
        .await?;
    Ok(Json(quotes))
}

// GET /api/quotes/{id}
#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID da cotação")),
    responses(
        (status = 200, description = "Cotação", body = Quote),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Cotação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state
        .quote_service
        .get_by_id(user.actor(), id)
        .await?
        .ok_or(AppError::QuoteNotFound)?;
    Ok(Json(quote))
}

// PUT /api/quotes/{id}
#[utoipa::path(
    put,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID da cotação")),
    request_body = UpdateQuotePayload,
    responses(
        (status = 200, description = "Cotação atualizada", body = Quote),
        (status = 409, description = "Status alterado por outro usuário"),
        (status = 422, description = "Transição de status não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quote(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let quote = app_state
        .quote_service
        .update(user.actor(), id, payload)
        .await?;
    Ok(Json(quote))
}

// DELETE /api/quotes/{id}
#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID da cotação")),
    responses(
        (status = 204, description = "Cotação excluída"),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_quote(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.quote_service.delete(user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/quotes/{id}/status
#[utoipa::path(
    post,
    path = "/api/quotes/{id}/status",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID da cotação")),
    request_body = ChangeStatusPayload,
    responses(
        (status = 200, description = "Status alterado e registrado no histórico", body = Quote),
        (status = 422, description = "Transição de status não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state
        .quote_service
        .change_status(user.actor(), id, payload.status, payload.notes)
        .await?;
    Ok(Json(quote))
}

// POST /api/quotes/{id}/transfer
#[utoipa::path(
    post,
    path = "/api/quotes/{id}/transfer",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID da cotação")),
    request_body = TransferQuotePayload,
    responses(
        (status = 200, description = "Transferência registrada", body = Quote),
        (status = 400, description = "Vendedor de destino inválido"),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn transfer_quote(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransferQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state
        .quote_service
        .transfer_quote(user.actor(), id, payload.to_user_id)
        .await?;
    Ok(Json(quote))
}

// GET /api/quotes/{id}/permissions
#[utoipa::path(
    get,
    path = "/api/quotes/{id}/permissions",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID da cotação")),
    responses((status = 200, description = "O usuário pode alterar a cotação?", body = QuotePermission)),
    security(("api_jwt" = []))
)]
pub async fn quote_permissions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let allowed = app_state
        .quote_service
        .check_permissions(user.actor(), id)
        .await?;
    Ok(Json(QuotePermission { allowed }))
}

// GET /api/clients/{id}/quotes
#[utoipa::path(
    get,
    path = "/api/clients/{id}/quotes",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Histórico de cotações do cliente", body = Vec<ClientQuote>)
    ),
    security(("api_jwt" = []))
)]
pub async fn client_history(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state
        .quote_service
        .get_client_history(user.actor(), client_id)
        .await?;
    Ok(Json(history))
}
