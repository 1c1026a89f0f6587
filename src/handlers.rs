pub mod auth;
pub mod categories;
pub mod clients;
pub mod events;
pub mod machines;
pub mod products;
pub mod quotes;
pub mod statistics;
pub mod theme;
pub mod users;
