use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CONTENT_URL, DEFAULT_LISTEN_ADDRESS, DEFAULT_PORT,
    DEFAULT_STATIC_URL,
};

use std::net::IpAddr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the server binds to (all interfaces by default)
    pub listen_address: String,
    pub port: u16,
    /// Directory of collected static assets, mounted at `static_url`
    pub static_root: Option<String>,
    pub static_url: String,
    /// Content directory; its `databases` and `storage` subdirectories are
    /// mounted under `content_url`
    pub content_dir: Option<String>,
    pub content_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from(DEFAULT_LISTEN_ADDRESS),
            port: DEFAULT_PORT,
            static_root: None,
            static_url: String::from(DEFAULT_STATIC_URL),
            content_dir: None,
            content_url: String::from(DEFAULT_CONTENT_URL),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.listen_ip()?;

        // The port is recorded in the PID file before the socket is bound,
        // so it has to be known up front.
        if self.port == 0 {
            return Err(ConfigError::server("server.port must be non-zero"));
        }

        for (name, url) in [
            ("server.static_url", &self.static_url),
            ("server.content_url", &self.content_url),
        ] {
            if !url.starts_with('/') || url.ends_with('/') || url.len() < 2 {
                return Err(ConfigError::server(format!(
                    "{name} must start with '/', name a path and have no trailing '/', got '{url}'"
                )));
            }
        }

        if self.static_url == self.content_url {
            return Err(ConfigError::server(
                "server.static_url and server.content_url must differ",
            ));
        }

        Ok(())
    }

    /// Parsed listen address.
    pub fn listen_ip(&self) -> ConfigErrorResult<IpAddr> {
        self.listen_address.parse().map_err(|_| {
            ConfigError::server(format!(
                "server.listen_address must be an IP address, got '{}'",
                self.listen_address
            ))
        })
    }
}
