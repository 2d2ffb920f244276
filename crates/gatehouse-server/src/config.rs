//! Server configuration, loaded from the environment.

use std::net::SocketAddr;

use gatehouse_auth::config::AuthConfig;
use gatehouse_db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid {
        name: &'static str,
        message: String,
    },

    #[error("failed to read {name} from {path}: {source}")]
    KeyFile {
        name: &'static str,
        path: String,
        source: std::io::Error,
    },
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from `GATEHOUSE_*` environment variables.
    ///
    /// Database credentials and the JWT key pair are required; any
    /// missing piece fails startup rather than falling back to an
    /// insecure default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = optional("GATEHOUSE_LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".into())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "GATEHOUSE_LISTEN_ADDR",
                message: e.to_string(),
            })?;

        let db = DbConfig {
            url: optional("GATEHOUSE_DB_URL").unwrap_or_else(|| "127.0.0.1:8000".into()),
            namespace: optional("GATEHOUSE_DB_NAMESPACE").unwrap_or_else(|| "gatehouse".into()),
            database: optional("GATEHOUSE_DB_DATABASE").unwrap_or_else(|| "main".into()),
            username: required("GATEHOUSE_DB_USERNAME")?,
            password: required("GATEHOUSE_DB_PASSWORD")?,
        };

        let auth = AuthConfig {
            jwt_private_key_pem: read_key_file("GATEHOUSE_JWT_PRIVATE_KEY_FILE")?,
            jwt_public_key_pem: read_key_file("GATEHOUSE_JWT_PUBLIC_KEY_FILE")?,
            access_token_lifetime_secs: parse_or("GATEHOUSE_TOKEN_TTL_SECS", 900)?,
            jwt_issuer: optional("GATEHOUSE_JWT_ISSUER").unwrap_or_else(|| "gatehouse".into()),
            pepper: optional("GATEHOUSE_PASSWORD_PEPPER"),
            min_password_length: parse_or("GATEHOUSE_MIN_PASSWORD_LENGTH", 8)?,
        };

        Ok(Self {
            listen_addr,
            db,
            auth,
        })
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

fn read_key_file(name: &'static str) -> Result<String, ConfigError> {
    let path = required(name)?;
    std::fs::read_to_string(&path).map_err(|source| ConfigError::KeyFile { name, path, source })
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
