use crate::error::AppError;
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid PORT: {}", e)))?;

        // Both are required: there is no sensible fallback for the store.
        let uri = required("MONGODB_URI")?;
        let database = required("MONGODB_DATABASE")?;

        Ok(Self {
            server: ServerConfig { host, port },
            mongodb: MongoConfig { uri, database },
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key)
        .map_err(|_| AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key)))
}
