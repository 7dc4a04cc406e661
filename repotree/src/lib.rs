pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use server::{AppState, router, serve};
