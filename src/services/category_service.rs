// src/services/category_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CategoryRepository,
    models::{
        auth::Actor,
        category::{Category, CategoryPayload},
    },
};

#[derive(Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
}

impl CategoryService {
    pub fn new(repo: CategoryRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Categoria"))
    }

    pub async fn create(&self, actor: Actor, payload: CategoryPayload) -> Result<Category, AppError> {
        actor.require_admin()?;
        let name = payload
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(AppError::MissingRequiredFields)?
            .to_string();
        self.repo.create(&name, &payload).await
    }

    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        payload: CategoryPayload,
    ) -> Result<Category, AppError> {
        actor.require_admin()?;
        self.repo
            .update(id, &payload)
            .await?
            .ok_or(AppError::NotFound("Categoria"))
    }

    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), AppError> {
        actor.require_admin()?;
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Categoria"));
        }
        Ok(())
    }
}
