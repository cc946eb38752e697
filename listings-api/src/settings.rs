use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

/// Process-level settings read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    pub port: u16,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_port_var(std::env::var("PORT").ok())
    }

    fn from_port_var(value: Option<String>) -> Result<Self, SettingsError> {
        let port = match value {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { port })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}
