//! Configuration management for the Annotator Store

use std::env;

use axum::http::HeaderName;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Where the gateway-asserted identity is read from
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub user_header: HeaderName,
    pub consumer_header: HeaderName,
    pub admin_users: Vec<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid SERVER_PORT: {0}")]
    InvalidPort(String),

    #[error("Invalid header name in {var}: {value}")]
    InvalidHeader { var: &'static str, value: String },
}

const DEFAULT_USER_HEADER: &str = "x-annotator-user-id";
const DEFAULT_CONSUMER_HEADER: &str = "x-annotator-consumer-key";

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite:./annotator.db".to_string(),
            },
            auth: AuthConfig {
                user_header: HeaderName::from_static(DEFAULT_USER_HEADER),
                consumer_header: HeaderName::from_static(DEFAULT_CONSUMER_HEADER),
                admin_users: Vec::new(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            Err(_) => 5000,
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:./annotator.db".to_string()),
            },
            auth: AuthConfig {
                user_header: header_from_env("AUTH_USER_HEADER", DEFAULT_USER_HEADER)?,
                consumer_header: header_from_env("AUTH_CONSUMER_HEADER", DEFAULT_CONSUMER_HEADER)?,
                admin_users: env::var("ANNOTATOR_ADMIN_USERS")
                    .map(|raw| parse_list(&raw))
                    .unwrap_or_default(),
            },
        })
    }
}

fn header_from_env(var: &'static str, default: &'static str) -> Result<HeaderName, ConfigError> {
    match env::var(var) {
        Ok(value) => HeaderName::try_from(value.trim())
            .map_err(|_| ConfigError::InvalidHeader { var, value }),
        Err(_) => Ok(HeaderName::from_static(default)),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.user_header.as_str(), "x-annotator-user-id");
        assert!(config.auth.admin_users.is_empty());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("alice, bob,,carol "), vec!["alice", "bob", "carol"]);
        assert!(parse_list("").is_empty());
    }
}
