// src/services/client_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ClientRepository,
    models::client::{prefix_pattern, Client, CreateClientPayload, UpdateClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
}

impl ClientService {
    pub fn new(repo: ClientRepository) -> Self {
        Self { repo }
    }

    // Termo vazio lista todos
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Client>, AppError> {
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => self.repo.search_by_name(&prefix_pattern(term)).await,
            None => self.repo.list().await,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    pub async fn create(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        let client = self.repo.create(&payload).await?;
        tracing::info!(client_id = %client.id, "Cliente criado");
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateClientPayload) -> Result<Client, AppError> {
        self.repo
            .update(id, &payload)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Cliente"));
        }
        tracing::info!(client_id = %id, "Cliente excluído");
        Ok(())
    }
}
