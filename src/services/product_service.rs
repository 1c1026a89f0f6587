// src/services/product_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::{
        auth::Actor,
        product::{Product, ProductPayload},
    },
};

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
}

impl ProductService {
    pub fn new(repo: ProductRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, AppError> {
        match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => self.repo.list_by_category(category).await,
            None => self.repo.list().await,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Product, AppError> {
        self.repo
            .find_by_code(code.trim())
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn create(&self, actor: Actor, payload: ProductPayload) -> Result<Product, AppError> {
        actor.require_admin()?;
        let payload = payload.sanitize();
        let name = payload.name.clone().ok_or(AppError::MissingRequiredFields)?;

        let product = self.repo.create(&name, &payload).await?;
        tracing::info!(product_id = %product.id, "Produto criado");
        Ok(product)
    }

    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        payload: ProductPayload,
    ) -> Result<Product, AppError> {
        actor.require_admin()?;
        self.repo
            .update(id, &payload.sanitize())
            .await?
            .ok_or(AppError::NotFound("Produto"))
    }

    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), AppError> {
        actor.require_admin()?;
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Produto"));
        }
        tracing::info!(product_id = %id, "Produto excluído");
        Ok(())
    }
}
