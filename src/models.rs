pub mod auth;
pub mod category;
pub mod client;
pub mod event;
pub mod machine;
pub mod product;
pub mod quote;
pub mod statistics;
pub mod theme;
