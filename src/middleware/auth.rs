// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Actor, User},
};

// Valida o Bearer token e deixa o usuário nos "extensions" da requisição
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::InvalidToken)?;

    let user = app_state.auth_service.validate_token(bearer.token()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

/// Como `AuthenticatedUser`, mas rejeita com 403 quem não é administrador.
pub struct AdminUser(pub User);

impl AdminUser {
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            tracing::warn!(user_id = %user.id, "Acesso de administrador negado");
            return Err(AppError::AdminRequired);
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(is_admin: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "vendedor@empresa.com.br".into(),
            name: "Vendedor".into(),
            is_admin,
            password_hash: String::new(),
            force_password_reset: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn parts_with(user: Option<User>) -> Parts {
        let mut request = Request::builder().uri("/api/quotes").body(()).unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn missing_user_is_unauthorized() {
        let mut parts = parts_with(None);
        let rejection = AuthenticatedUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_extractor_rejects_sellers() {
        let mut seller = parts_with(Some(user(false)));
        let rejection = AdminUser::from_request_parts(&mut seller, &()).await.err().unwrap();
        assert_eq!(rejection.into_response().status(), StatusCode::FORBIDDEN);

        let mut admin = parts_with(Some(user(true)));
        let AdminUser(found) = AdminUser::from_request_parts(&mut admin, &()).await.ok().unwrap();
        assert!(found.is_admin);
    }
}
