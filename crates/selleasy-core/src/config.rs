//! Configuration module
//!
//! Environment-driven configuration for the API service: server, database,
//! storage, and upload limit settings. Every field except `DATABASE_URL` has a
//! working default for local development.

use std::env;

use crate::constants::MAX_MEDIA_FILES;

// Common constants
const DEFAULT_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: usize = 10;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Root directory for stored media files.
    pub storage_path: String,
    /// Public base URL under which stored media is served.
    pub storage_base_url: String,
    pub max_media_files: usize,
    pub max_file_size_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let storage_base_url = env::var("STORAGE_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}/media", server_port));

        Ok(Config {
            environment,
            server_port,
            cors_origins,
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "./data/media".to_string()),
            storage_base_url,
            max_media_files: env::var("MAX_MEDIA_FILES")
                .unwrap_or_else(|_| MAX_MEDIA_FILES.to_string())
                .parse()
                .unwrap_or(MAX_MEDIA_FILES),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase().eq("production")
            || self.environment.to_lowercase().eq("prod")
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_media_files == 0 {
            return Err(anyhow::anyhow!("MAX_MEDIA_FILES must be at least 1"));
        }
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be at least 1"));
        }
        Ok(())
    }

    /// Upper bound for a create request body: every media slot at its size
    /// limit plus slack for the text fields and multipart framing.
    pub fn request_body_limit_bytes(&self) -> usize {
        self.max_media_files * self.max_file_size_bytes + 1024 * 1024
    }
}
