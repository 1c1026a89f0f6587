// src/handlers/statistics.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminUser, AuthenticatedUser},
    models::statistics::{QuoteStatistics, StatisticsQuery},
};

// GET /api/statistics
#[utoipa::path(
    get,
    path = "/api/statistics",
    tag = "Statistics",
    params(
        ("start" = Option<String>, Query, description = "Data inicial (RFC 3339)"),
        ("end" = Option<String>, Query, description = "Data final (RFC 3339)")
    ),
    responses((status = 200, description = "Estatísticas de cada usuário", body = Vec<QuoteStatistics>)),
    security(("api_jwt" = []))
)]
pub async fn all_users(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state
        .statistics_service
        .all_users(admin.actor(), query)
        .await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/statistics/overview",
    tag = "Statistics",
    params(
        ("start" = Option<String>, Query, description = "Data inicial (RFC 3339)"),
        ("end" = Option<String>, Query, description = "Data final (RFC 3339)")
    ),
    responses((status = 200, description = "Totais gerais por status", body = QuoteStatistics)),
    security(("api_jwt" = []))
)]
pub async fn overview(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state
        .statistics_service
        .overview(admin.actor(), query)
        .await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/statistics/users/{id}",
    tag = "Statistics",
    params(
        ("id" = Uuid, Path, description = "ID do usuário"),
        ("start" = Option<String>, Query, description = "Data inicial (RFC 3339)"),
        ("end" = Option<String>, Query, description = "Data final (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Estatísticas do usuário", body = QuoteStatistics),
        (status = 403, description = "Vendedores só consultam os próprios números")
    ),
    security(("api_jwt" = []))
)]
pub async fn user_stats(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state
        .statistics_service
        .user_stats(user.actor(), id, query)
        .await?;
    Ok(Json(stats))
}
