// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CategoryRepository, ClientRepository, EventRepository, MachineRepository,
        ProductRepository, QuoteRepository, ThemeRepository, UserRepository,
    },
    services::{
        auth::AuthService, category_service::CategoryService, client_service::ClientService,
        event_service::EventService, machine_service::MachineService,
        product_service::ProductService, quote_service::QuoteService,
        statistics_service::StatisticsService, theme_service::ThemeService,
        user_service::UserService,
    },
};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub max_connections: u32,
    // Presente só quando ADMIN_EMAIL e ADMIN_PASSWORD estão definidos
    pub admin_seed: Option<AdminSeed>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let admin_seed = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                email,
                password,
                name: lookup("ADMIN_NAME").unwrap_or_else(|| "Administrador".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr,
            max_connections,
            admin_seed,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub quote_service: QuoteService,
    pub statistics_service: StatisticsService,
    pub product_service: ProductService,
    pub client_service: ClientService,
    pub category_service: CategoryService,
    pub machine_service: MachineService,
    pub event_service: EventService,
    pub theme_service: ThemeService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let directory = Arc::new(user_repo.clone());
        let quote_service =
            QuoteService::new(Arc::new(QuoteRepository::new(db_pool.clone())), directory.clone());

        Ok(Self {
            auth_service: AuthService::new(user_repo.clone(), config.jwt_secret.clone()),
            user_service: UserService::new(user_repo),
            statistics_service: StatisticsService::new(quote_service.clone(), directory),
            quote_service,
            product_service: ProductService::new(ProductRepository::new(db_pool.clone())),
            client_service: ClientService::new(ClientRepository::new(db_pool.clone())),
            category_service: CategoryService::new(CategoryRepository::new(db_pool.clone())),
            machine_service: MachineService::new(MachineRepository::new(db_pool.clone())),
            event_service: EventService::new(EventRepository::new(db_pool.clone())),
            theme_service: ThemeService::new(ThemeRepository::new(db_pool.clone())),
            db_pool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/vendas"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:3000");
        assert_eq!(config.max_connections, 5);
        assert!(config.admin_seed.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/vendas")]));
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn admin_seed_requires_email_and_password() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/vendas"),
            ("JWT_SECRET", "segredo"),
            ("ADMIN_EMAIL", "admin@empresa.com.br"),
            ("ADMIN_PASSWORD", "troque-me"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.max_connections, 12);
        let seed = config.admin_seed.unwrap();
        assert_eq!(seed.name, "Administrador");
        assert_eq!(seed.email, "admin@empresa.com.br");
    }
}
