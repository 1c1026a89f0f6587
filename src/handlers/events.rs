// src/handlers/events.rs

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
    models::event::{CalendarEvent, CreateEventPayload, DateRange, UpdateEventPayload},
};

// GET /api/events?from=...&to=...
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(
        ("from" = Option<String>, Query, description = "Início do intervalo (RFC 3339)"),
        ("to" = Option<String>, Query, description = "Fim do intervalo (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Eventos da agenda ordenados pelo início", body = Vec<CalendarEvent>),
        (status = 400, description = "Intervalo invertido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(range): Query<DateRange>,
) -> Result<impl IntoResponse, AppError> {
    let events = app_state.event_service.list(range.from, range.to).await?;
    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Evento", body = CalendarEvent),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_event(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.event_service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventPayload,
    responses((status = 201, description = "Evento criado", body = CalendarEvent)),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let event = app_state.event_service.create(user.actor(), payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "ID do evento")),
    request_body = UpdateEventPayload,
    responses(
        (status = 200, description = "Evento atualizado", body = CalendarEvent),
        (status = 403, description = "Apenas o criador ou um administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let event = app_state
        .event_service
        .update(user.actor(), id, payload)
        .await?;
    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "ID do evento")),
    responses((status = 204, description = "Evento excluído")),
    security(("api_jwt" = []))
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.event_service.delete(user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
