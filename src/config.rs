use anyhow::{Context, Result};
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // Server
    pub host: String,
    pub port: u16,
    pub cors_origins: String,

    // Media and frontend
    pub public_base_url: Option<String>,
    pub frontend_base_url: String,

    // Import
    pub seed_file: Option<String>,
    pub max_import_bytes: usize,
}

/// Origins the API answers cross-origin requests from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Database - optional; the in-memory store is used without it
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            // Server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),

            // Media and frontend
            public_base_url: non_empty_var("PUBLIC_BASE_URL"),
            frontend_base_url: std::env::var("FRONTEND_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),

            // Import
            seed_file: non_empty_var("SEED_FILE"),
            max_import_bytes: std::env::var("MAX_IMPORT_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
        })
    }

    /// Allowed CORS origins parsed from `CORS_ORIGINS`.
    ///
    /// `*` anywhere in the list allows every origin; blank entries are dropped.
    pub fn allowed_origins(&self) -> AllowedOrigins {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| origin.trim_end_matches('/').to_string())
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
