pub mod user_repo;
pub use user_repo::{UserDirectory, UserRepository};
pub mod quote_repo;
pub use quote_repo::{QuoteFilter, QuoteRepository, QuoteStore, QuoteWrite};
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod category_repo;
pub use category_repo::CategoryRepository;
pub mod machine_repo;
pub use machine_repo::MachineRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod theme_repo;
pub use theme_repo::ThemeRepository;

#[cfg(test)]
pub mod memory;
