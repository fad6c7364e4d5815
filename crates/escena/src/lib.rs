pub mod chat;
pub mod conversation;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod store;
