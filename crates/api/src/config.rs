//! Server configuration from environment variables.

use std::net::SocketAddr;

use pantry_infra::{ConfigError, StoreSettings};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreSettings,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("PANTRY_BIND_ADDR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("PANTRY_BIND_ADDR not set; using {DEFAULT_BIND_ADDR}");
                DEFAULT_BIND_ADDR.to_string()
            });
        let bind_addr = raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "PANTRY_BIND_ADDR",
                value: raw.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            bind_addr,
            store: StoreSettings::from_lookup(&lookup)?,
        })
    }
}
