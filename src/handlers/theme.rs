// src/handlers/theme.rs

use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::theme::{ThemeDocument, ThemeSettings, UpdateLogoPayload},
};

// GET /api/theme (público: a tela de login também usa o tema)
#[utoipa::path(
    get,
    path = "/api/theme",
    tag = "Theme",
    responses((status = 200, description = "Tema atual, ou o padrão", body = ThemeDocument))
)]
pub async fn get_theme(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.theme_service.get().await?))
}

#[utoipa::path(
    put,
    path = "/api/theme",
    tag = "Theme",
    request_body = ThemeSettings,
    responses(
        (status = 200, description = "Tema salvo", body = ThemeDocument),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_theme(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Json(settings): Json<ThemeSettings>,
) -> Result<impl IntoResponse, AppError> {
    settings.validate()?;
    let theme = app_state
        .theme_service
        .save(admin.actor(), settings)
        .await?;
    Ok(Json(theme))
}

#[utoipa::path(
    put,
    path = "/api/theme/logo",
    tag = "Theme",
    request_body = UpdateLogoPayload,
    responses((status = 200, description = "Logo atualizado", body = ThemeDocument)),
    security(("api_jwt" = []))
)]
pub async fn update_logo(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<UpdateLogoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let theme = app_state
        .theme_service
        .set_logo(admin.actor(), payload.logo)
        .await?;
    Ok(Json(theme))
}
