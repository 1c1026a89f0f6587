// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        client::{Client, ClientSearch, CreateClientPayload, UpdateClientPayload},
        event::CalendarEvent,
        machine::Machine,
    },
};

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(("search" = Option<String>, Query, description = "Prefixo do nome")),
    responses((status = 200, description = "Clientes ordenados por nome", body = Vec<Client>)),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ClientSearch>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state
        .client_service
        .list(query.search.as_deref())
        .await?;
    Ok(Json(clients))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let client = app_state.client_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.get(id).await?;
    Ok(Json(client))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateClientPayload,
    responses((status = 200, description = "Cliente atualizado", body = Client)),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let client = app_state.client_service.update(id, payload).await?;
    Ok(Json(client))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 204, description = "Cliente excluído")),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.client_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/clients/{id}/machines
#[utoipa::path(
    get,
    path = "/api/clients/{id}/machines",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Máquinas instaladas no cliente", body = Vec<Machine>)),
    security(("api_jwt" = []))
)]
pub async fn client_machines(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let machines = app_state.machine_service.list_by_client(id).await?;
    Ok(Json(machines))
}

// GET /api/clients/{id}/events
#[utoipa::path(
    get,
    path = "/api/clients/{id}/events",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Eventos do cliente", body = Vec<CalendarEvent>)),
    security(("api_jwt" = []))
)]
pub async fn client_events(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let events = app_state.event_service.list_by_client(id).await?;
    Ok(Json(events))
}
