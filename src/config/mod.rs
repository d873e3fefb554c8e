pub mod database;
pub mod logging;

pub use database::{ DatabaseConfig, ConfigError };

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub database: DatabaseConfig,
}

impl Config {
    pub async fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: std::env
                ::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            database: DatabaseConfig::new()?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
