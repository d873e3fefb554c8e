// Library entry point - exposes the volunteer-hub functionality as a reusable library

// Public modules that can be used by other applications
pub mod config;
pub mod models;
pub mod dto;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod middleware;
pub mod routes;

pub mod schema;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use config::{ Config, ConfigError, DatabaseConfig };
pub use errors::{ HttpError, ErrorMessage };
pub use models::{ Post, VolunteerRequest };
pub use services::request_service::RequestLedger;

use std::sync::Arc;
use axum::Router;
use diesel_migrations::{ embed_migrations, EmbeddedMigrations };

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

// Application state type
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ledger: RequestLedger,
}

impl AppState {
    /// Create a new application state with configuration from the environment
    pub async fn new() -> Result<Self, ConfigError> {
        let config = Config::new().await?;
        let ledger = RequestLedger::new(config.database.pool.clone());

        Ok(Self { config, ledger })
    }

    /// Create application state for testing
    pub fn for_testing(config: Config) -> Self {
        let ledger = RequestLedger::new(config.database.pool.clone());

        Self { config, ledger }
    }
}

/// Create the complete application router
pub fn create_app(state: Arc<AppState>) -> Router<Arc<AppState>> {
    routes::create_router(state)
}
