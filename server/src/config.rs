//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 8080;

/// Configuration for the todo server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Sets the port, keeping the host.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }

    /// Sets the host, keeping the port.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.bind_addr.set_ip(host);
        self
    }

    /// Reads `HOST` and `PORT` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable source. Unset
    /// variables keep their defaults; set but unparsable ones are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup("HOST") {
            let host = value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name: "HOST", value })?;
            config = config.with_host(host);
        }
        if let Some(value) = lookup("PORT") {
            let port = value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name: "PORT", value })?;
            config = config.with_port(port);
        }
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT))
    }
}
