//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carrega o .env antes do logger para que RUST_LOG também venha de lá
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new(&config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let Some(seed) = &config.admin_seed {
        app_state
            .auth_service
            .seed_admin(&seed.email, &seed.password, &seed.name)
            .await?;
    }

    let app = app_router(app_state);

    let listener = TcpListener::bind(&config.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn app_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/me", get(handlers::auth::get_me))
        .route("/me/password", put(handlers::auth::change_my_password))
        .route(
            "/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/{id}/password", put(handlers::users::reset_user_password));

    let quote_routes = Router::new()
        .route(
            "/",
            get(handlers::quotes::list_quotes).post(handlers::quotes::create_quote),
        )
        .route("/status-info", get(handlers::quotes::status_info))
        .route("/transferred", get(handlers::quotes::list_transferred))
        .route("/status/{status}", get(handlers::quotes::list_by_status))
        .route(
            "/{id}",
            get(handlers::quotes::get_quote)
                .put(handlers::quotes::update_quote)
                .delete(handlers::quotes::delete_quote),
        )
        .route("/{id}/status", post(handlers::quotes::change_status))
        .route("/{id}/transfer", post(handlers::quotes::transfer_quote))
        .route("/{id}/permissions", get(handlers::quotes::quote_permissions));

    let client_routes = Router::new()
        .route(
            "/",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route("/{id}/quotes", get(handlers::quotes::client_history))
        .route("/{id}/machines", get(handlers::clients::client_machines))
        .route("/{id}/events", get(handlers::clients::client_events));

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/code/{code}", get(handlers::products::get_product_by_code))
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let category_routes = Router::new()
        .route(
            "/",
            get(handlers::categories::list_categories)
                .post(handlers::categories::create_category),
        )
        .route(
            "/{id}",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        );

    let machine_routes = Router::new()
        .route(
            "/",
            get(handlers::machines::list_machines).post(handlers::machines::create_machine),
        )
        .route(
            "/{id}",
            get(handlers::machines::get_machine)
                .put(handlers::machines::update_machine)
                .delete(handlers::machines::delete_machine),
        );

    let event_routes = Router::new()
        .route(
            "/",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route(
            "/{id}",
            get(handlers::events::get_event)
                .put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        );

    let statistics_routes = Router::new()
        .route("/", get(handlers::statistics::all_users))
        .route("/overview", get(handlers::statistics::overview))
        .route("/users/{id}", get(handlers::statistics::user_stats));

    // O GET do tema é público; só a escrita passa pelo guard
    let theme_admin_routes = Router::new()
        .route("/api/theme", put(handlers::theme::save_theme))
        .route("/api/theme/logo", put(handlers::theme::update_logo));

    // Tudo abaixo exige Bearer token válido
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/quotes", quote_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/products", product_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/machines", machine_routes)
        .nest("/api/events", event_routes)
        .nest("/api/statistics", statistics_routes)
        .merge(theme_admin_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/api/theme", get(handlers::theme::get_theme))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .with_state(app_state)
}
