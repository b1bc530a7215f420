//! Application configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use anyhow::Context;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Postgres connection URL
    pub database_url: String,
    /// Pool size
    pub database_max_connections: u32,
    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", value))?,
            None => 8080,
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse::<u32>().with_context(|| {
                format!("DATABASE_MAX_CONNECTIONS must be a number, got {:?}", value)
            })?,
            None => 10,
        };

        let run_migrations = match lookup("RUN_MIGRATIONS").as_deref() {
            None | Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => anyhow::bail!("RUN_MIGRATIONS must be true or false, got {:?}", other),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            database_max_connections,
            run_migrations,
        })
    }

    /// Socket address to listen on
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}
