// src/handlers/machines.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminUser, AuthenticatedUser},
    models::machine::{Machine, MachinePayload},
};

#[utoipa::path(
    get,
    path = "/api/machines",
    tag = "Machines",
    responses((status = 200, description = "Máquinas cadastradas", body = Vec<Machine>)),
    security(("api_jwt" = []))
)]
pub async fn list_machines(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.machine_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/machines/{id}",
    tag = "Machines",
    params(("id" = Uuid, Path, description = "ID da máquina")),
    responses(
        (status = 200, description = "Máquina", body = Machine),
        (status = 404, description = "Máquina não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_machine(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.machine_service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/machines",
    tag = "Machines",
    request_body = MachinePayload,
    responses((status = 201, description = "Máquina criada", body = Machine)),
    security(("api_jwt" = []))
)]
pub async fn create_machine(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<MachinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let machine = app_state
        .machine_service
        .create(admin.actor(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(machine)))
}

#[utoipa::path(
    put,
    path = "/api/machines/{id}",
    tag = "Machines",
    params(("id" = Uuid, Path, description = "ID da máquina")),
    request_body = MachinePayload,
    responses((status = 200, description = "Máquina atualizada", body = Machine)),
    security(("api_jwt" = []))
)]
pub async fn update_machine(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MachinePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let machine = app_state
        .machine_service
        .update(admin.actor(), id, payload)
        .await?;
    Ok(Json(machine))
}

#[utoipa::path(
    delete,
    path = "/api/machines/{id}",
    tag = "Machines",
    params(("id" = Uuid, Path, description = "ID da máquina")),
    responses((status = 204, description = "Máquina excluída")),
    security(("api_jwt" = []))
)]
pub async fn delete_machine(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.machine_service.delete(admin.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
