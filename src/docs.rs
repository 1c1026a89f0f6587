// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::change_my_password,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::reset_user_password,
        handlers::users::delete_user,

        // --- Quotes ---
        handlers::quotes::list_quotes,
        handlers::quotes::create_quote,
        handlers::quotes::status_info,
        handlers::quotes::list_transferred,
        handlers::quotes::list_by_status,
        handlers::quotes::get_quote,
        handlers::quotes::update_quote,
        handlers::quotes::delete_quote,
        handlers::quotes::change_status,
        handlers::quotes::transfer_quote,
        handlers::quotes::quote_permissions,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::create_client,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::clients::client_machines,
        handlers::clients::client_events,
        handlers::quotes::client_history,

        // --- Catálogo ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::get_product_by_code,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::categories::list_categories,
        handlers::categories::get_category,
        handlers::categories::create_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::machines::list_machines,
        handlers::machines::get_machine,
        handlers::machines::create_machine,
        handlers::machines::update_machine,
        handlers::machines::delete_machine,

        // --- Agenda ---
        handlers::events::list_events,
        handlers::events::get_event,
        handlers::events::create_event,
        handlers::events::update_event,
        handlers::events::delete_event,

        // --- Theme ---
        handlers::theme::get_theme,
        handlers::theme::save_theme,
        handlers::theme::update_logo,

        // --- Statistics ---
        handlers::statistics::all_users,
        handlers::statistics::overview,
        handlers::statistics::user_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::ChangePasswordPayload,

            // --- Quotes ---
            models::quote::QuoteStatus,
            models::quote::QuoteStatusInfo,
            models::quote::QuoteItem,
            models::quote::StatusHistoryEntry,
            models::quote::TransferHistoryEntry,
            models::quote::Quote,
            models::quote::NamedTransfer,
            models::quote::ClientQuote,
            models::quote::QuoteItemInput,
            models::quote::CreateQuotePayload,
            models::quote::UpdateQuotePayload,
            models::quote::ChangeStatusPayload,
            models::quote::TransferQuotePayload,
            handlers::quotes::QuotePermission,

            // --- Clients ---
            models::client::Address,
            models::client::Client,
            models::client::CreateClientPayload,
            models::client::UpdateClientPayload,

            // --- Catálogo ---
            models::product::VideoKind,
            models::product::DocumentKind,
            models::product::Video,
            models::product::ProductDocument,
            models::product::Product,
            models::product::ProductPayload,
            models::category::Category,
            models::category::CategoryPayload,
            models::machine::Machine,
            models::machine::MachinePayload,

            // --- Agenda ---
            models::event::EventKind,
            models::event::CalendarEvent,
            models::event::CreateEventPayload,
            models::event::UpdateEventPayload,

            // --- Theme ---
            models::theme::CardShadow,
            models::theme::ThemeSettings,
            models::theme::ThemeDocument,
            models::theme::UpdateLogoPayload,

            // --- Statistics ---
            models::statistics::StatusBucket,
            models::statistics::QuoteStatistics,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Usuários e Perfil"),
        (name = "Quotes", description = "Cotações, Histórico de Status e Transferências"),
        (name = "Clients", description = "Clientes"),
        (name = "Products", description = "Catálogo de Produtos"),
        (name = "Categories", description = "Categorias de Produto"),
        (name = "Machines", description = "Máquinas"),
        (name = "Events", description = "Agenda"),
        (name = "Theme", description = "Tema Visual"),
        (name = "Statistics", description = "Indicadores de Vendas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_quote_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/quotes/{id}/transfer"));
        assert!(doc.paths.paths.contains_key("/api/statistics/users/{id}"));
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("api_jwt"));
        assert!(components.schemas.contains_key("Quote"));
    }
}
