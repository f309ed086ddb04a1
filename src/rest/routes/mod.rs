pub mod analysis;
pub mod auth;
pub mod cases;
pub mod chat;
pub mod health;
pub mod profile;
pub mod upload;
