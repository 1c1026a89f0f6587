// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, User},
};

const TOKEN_TTL_DAYS: i64 = 7;

// O bcrypt é caro: roda fora do executor assíncrono
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub fn encode_token(secret: &str, user_id: Uuid) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::days(TOKEN_TTL_DAYS);

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;
    Ok(token_data.claims)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            tracing::warn!(email = %email, "Tentativa de login com senha inválida");
            return Err(AppError::InvalidCredentials);
        }

        let token = encode_token(&self.jwt_secret, user.id)?;
        tracing::info!(user_id = %user.id, "Login efetuado");
        Ok(AuthResponse { token, user })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Cria o primeiro administrador se o e-mail ainda não estiver cadastrado.
    pub async fn seed_admin(&self, email: &str, password: &str, name: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            tracing::debug!(email = %email, "Administrador inicial já existe");
            return Ok(());
        }

        let password_hash = hash_password(password).await?;
        let admin = self
            .user_repo
            .create_user(email, name, &password_hash, true, false)
            .await?;

        tracing::info!(user_id = %admin.id, "👤 Administrador inicial criado");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "segredo-de-teste";

    #[test]
    fn token_carries_user_id_and_seven_day_expiry() {
        let user_id = Uuid::new_v4();
        let token = encode_token(SECRET, user_id).unwrap();

        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = encode_token("outro-segredo", Uuid::new_v4()).unwrap();
        assert!(matches!(decode_token(SECRET, &token), Err(AppError::InvalidToken)));
        assert!(matches!(decode_token(SECRET, "lixo"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("senha123").await.unwrap();
        assert_ne!(hashed, "senha123");
        assert!(verify("senha123", &hashed).unwrap());
    }
}
