use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::DEFAULT_PROXY_HEADER;
use crate::types::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    SingleUser,
    BasicAuth,
    Proxy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub proxy: Option<ProxyAuthConfig>,
    pub single_user: Option<SingleUserAuthConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyAuthConfig {
    pub header: Option<String>,
}

impl ProxyAuthConfig {
    /// ## Summary
    /// Returns the configured identity header, lowercased, or the default one.
    #[must_use]
    pub fn header_name(&self) -> String {
        self.header
            .as_deref()
            .unwrap_or(DEFAULT_PROXY_HEADER)
            .to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleUserAuthConfig {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// JSON file the memory backend is populated from at startup.
    pub seed: Option<String>,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8710)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "info")?
            .set_default("storage.backend", "postgres")?
            .set_default("auth.method", "basic_auth")?
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_header_defaults_and_lowercases() {
        let default = ProxyAuthConfig { header: None };
        assert_eq!(default.header_name(), "x-remote-user");

        let custom = ProxyAuthConfig {
            header: Some("X-Forwarded-Email".to_string()),
        };
        assert_eq!(custom.header_name(), "x-forwarded-email");
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8710,
        };
        assert_eq!(server.bind_addr(), "127.0.0.1:8710");
    }

    #[test]
    fn auth_method_and_role_deserialize_from_config_strings() {
        let raw = r#"{"name":"Ops","email":"ops@example.org","role":"super-admin"}"#;
        let single: SingleUserAuthConfig = serde_json::from_str(raw).expect("valid config");
        assert_eq!(single.role, Some(Role::SuperAdmin));

        let method: AuthMethod = serde_json::from_str(r#""basic_auth""#).expect("valid method");
        assert_eq!(method, AuthMethod::BasicAuth);
    }

    #[test]
    fn storage_seed_is_optional() {
        let storage: StorageConfig =
            serde_json::from_str(r#"{"backend":"postgres"}"#).expect("valid storage");
        assert_eq!(storage.backend, StorageBackend::Postgres);
        assert!(storage.seed.is_none());

        let storage: StorageConfig =
            serde_json::from_str(r#"{"backend":"memory","seed":"registry.json"}"#)
                .expect("valid storage");
        assert_eq!(storage.backend, StorageBackend::Memory);
        assert_eq!(storage.seed.as_deref(), Some("registry.json"));
    }
}
