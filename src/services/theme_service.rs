// src/services/theme_service.rs

use crate::{
    common::error::AppError,
    db::ThemeRepository,
    models::{
        auth::Actor,
        theme::{ThemeDocument, ThemeSettings},
    },
};

#[derive(Clone)]
pub struct ThemeService {
    repo: ThemeRepository,
}

impl ThemeService {
    pub fn new(repo: ThemeRepository) -> Self {
        Self { repo }
    }

    /// Sem documento salvo, devolve o tema padrão.
    pub async fn get(&self) -> Result<ThemeDocument, AppError> {
        Ok(self.repo.find().await?.unwrap_or_else(|| ThemeDocument {
            settings: ThemeSettings::default(),
            updated_at: None,
            updated_by: None,
        }))
    }

    pub async fn save(&self, actor: Actor, settings: ThemeSettings) -> Result<ThemeDocument, AppError> {
        actor.require_admin()?;
        let saved = self.repo.upsert(&settings, actor.id).await?;
        tracing::info!(user_id = %actor.id, "Tema atualizado");
        Ok(saved)
    }

    pub async fn set_logo(&self, actor: Actor, logo: String) -> Result<ThemeDocument, AppError> {
        actor.require_admin()?;
        let mut settings = self.get().await?.settings;
        settings.logo = Some(logo);
        self.repo.upsert(&settings, actor.id).await
    }
}
