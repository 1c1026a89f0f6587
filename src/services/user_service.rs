// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Actor, CreateUserPayload, UpdateUserPayload, User},
    services::auth::hash_password,
};

/// Gestão de vendedores e administradores.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

// Só o próprio usuário ou um administrador
fn ensure_self_or_admin(actor: Actor, user_id: Uuid) -> Result<(), AppError> {
    if actor.is_admin || actor.id == user_id {
        Ok(())
    } else {
        Err(AppError::AdminRequired)
    }
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, actor: Actor, id: Uuid) -> Result<User, AppError> {
        ensure_self_or_admin(actor, id)?;
        self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        let password_hash = hash_password(&payload.password).await?;
        let user = self
            .repo
            .create_user(
                payload.email.trim(),
                payload.name.trim(),
                &password_hash,
                payload.is_admin,
                payload.force_password_reset,
            )
            .await?;

        tracing::info!(user_id = %user.id, is_admin = user.is_admin, "Usuário criado");
        Ok(user)
    }

    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        payload: UpdateUserPayload,
    ) -> Result<User, AppError> {
        // Um admin não pode retirar o próprio acesso
        if actor.id == id && payload.is_admin == Some(false) {
            return Err(AppError::Forbidden("Você não pode remover seu próprio acesso de administrador."));
        }

        self.repo
            .update_user(
                id,
                payload.name.as_deref().map(str::trim),
                payload.is_admin,
                payload.force_password_reset,
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), AppError> {
        if actor.id == id {
            return Err(AppError::Forbidden("Você não pode excluir o próprio usuário."));
        }
        if !self.repo.delete_user(id).await? {
            return Err(AppError::UserNotFound);
        }
        tracing::info!(user_id = %id, "Usuário excluído");
        Ok(())
    }

    pub async fn change_password(
        &self,
        actor: Actor,
        id: Uuid,
        new_password: &str,
    ) -> Result<(), AppError> {
        ensure_self_or_admin(actor, id)?;
        let password_hash = hash_password(new_password).await?;
        if !self.repo.update_password(id, &password_hash).await? {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_self_or_admin_may_touch_an_account() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(ensure_self_or_admin(Actor::seller(me), me).is_ok());
        assert!(ensure_self_or_admin(Actor::admin(me), other).is_ok());
        assert!(matches!(
            ensure_self_or_admin(Actor::seller(me), other),
            Err(AppError::AdminRequired)
        ));
    }
}
