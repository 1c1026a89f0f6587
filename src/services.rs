pub mod auth;
pub mod category_service;
pub mod client_service;
pub mod event_service;
pub mod machine_service;
pub mod product_service;
pub mod quote_service;
pub mod statistics_service;
pub mod theme_service;
pub mod user_service;
