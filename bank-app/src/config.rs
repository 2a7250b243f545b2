//! Configuration loading from environment.

use std::env;

use anyhow::Context;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_address: String,
    pub http_port: u16,
    pub grpc_port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let http_port = lookup("HTTP_PORT")
            .or_else(|| lookup("PORT"))
            .unwrap_or_else(|| "8001".to_string())
            .parse()
            .context("HTTP_PORT must be a port number")?;

        let grpc_port = lookup("GRPC_PORT")
            .unwrap_or_else(|| "8002".to_string())
            .parse()
            .context("GRPC_PORT must be a port number")?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?
            .unwrap_or(bank_repo::DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be a positive integer");
        }

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Self {
            bind_address,
            http_port,
            grpc_port,
            database_url,
            max_connections,
        })
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }

    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.grpc_port)
    }
}
