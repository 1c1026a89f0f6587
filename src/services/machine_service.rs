// src/services/machine_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MachineRepository,
    models::{
        auth::Actor,
        machine::{Machine, MachinePayload},
    },
};

#[derive(Clone)]
pub struct MachineService {
    repo: MachineRepository,
}

impl MachineService {
    pub fn new(repo: MachineRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Machine>, AppError> {
        self.repo.list().await
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Machine>, AppError> {
        self.repo.list_by_client(client_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Machine, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Máquina"))
    }

    pub async fn create(&self, actor: Actor, payload: MachinePayload) -> Result<Machine, AppError> {
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
        payload: MachinePayload,
    ) -> Result<Machine, AppError> {
        actor.require_admin()?;
        self.repo
            .update(id, &payload)
            .await?
            .ok_or(AppError::NotFound("Máquina"))
    }

    pub async fn delete(&self, actor: Actor, id: Uuid) -> Result<(), AppError> {
        actor.require_admin()?;
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Máquina"));
        }
        Ok(())
    }
}
