//! Configuration loading from disk and the environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::schema::{ServerConfig, TlsConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Process-level switches layered over the file configuration.
///
/// These mirror the environment variables the server has always honoured:
/// `PORT`, `USE_TLS` with `TLS_CERT`/`TLS_KEY`, and `LOG=no`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub use_tls: bool,
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
    pub log_requests: Option<bool>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Apply the overrides and re-validate.
    pub fn apply(&self, config: &mut ServerConfig) -> Result<(), ConfigError> {
        if let Some(port) = self.port {
            let mut addr: SocketAddr = config.listener.bind_address.parse().map_err(|_| {
                ConfigError::Validation(vec![ValidationError::InvalidAddress {
                    field: "listener.bind_address",
                    value: config.listener.bind_address.clone(),
                }])
            })?;
            addr.set_port(port);
            config.listener.bind_address = addr.to_string();
        }

        if self.use_tls || self.tls_cert.is_some() || self.tls_key.is_some() {
            let tls = config.listener.tls.get_or_insert_with(TlsConfig::default);
            if let Some(cert) = &self.tls_cert {
                tls.cert_path = cert.clone();
            }
            if let Some(key) = &self.tls_key {
                tls.key_path = key.clone();
            }
        }

        if let Some(log_requests) = self.log_requests {
            config.observability.log_requests = log_requests;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }

        validate_config(config).map_err(ConfigError::Validation)
    }
}
