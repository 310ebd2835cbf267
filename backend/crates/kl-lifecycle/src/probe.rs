//! HTTP liveness probe.

use crate::LifecycleResult;

use std::error::Error as _;
use std::io;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

const PROTOCOL: &str = "http";

/// Result of a single probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Something answered with this HTTP status
    Status(u16),
    /// Connection refused, reset, closed early, timed out or answered with
    /// something that is not HTTP
    Unreachable(String),
    /// The request could not be built or was redirected away
    Failed(String),
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Issue one GET against the server root on `port`. No retries.
    async fn probe(&self, port: u16) -> ProbeOutcome;
}

/// Probe over plain HTTP with a fixed timeout.
pub struct HttpProbe {
    client: reqwest::Client,
    host: String,
}

impl HttpProbe {
    pub fn new(host: impl Into<String>, timeout: Duration) -> LifecycleResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            host: host.into(),
        })
    }

    pub fn url(&self, port: u16) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(addr)) => format!("{PROTOCOL}://[{addr}]:{port}/"),
            _ => format!("{PROTOCOL}://{}:{port}/", self.host),
        }
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn probe(&self, port: u16) -> ProbeOutcome {
        let url = self.url(port);

        match self.client.get(&url).send().await {
            Ok(response) => {
                debug!("Probe {url} answered HTTP {}", response.status());
                ProbeOutcome::Status(response.status().as_u16())
            }
            Err(e) if is_unreachable(&e) => {
                debug!("Probe {url} unreachable: {e}");
                ProbeOutcome::Unreachable(e.to_string())
            }
            Err(e) => {
                debug!("Probe {url} failed: {e}");
                ProbeOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Transport-level failures mean the port is not serving HTTP right now.
fn is_unreachable(error: &reqwest::Error) -> bool {
    if error.is_connect() || error.is_timeout() || error.is_request() {
        return true;
    }

    let mut source = error.source();
    while let Some(cause) = source {
        if cause.is::<io::Error>() {
            return true;
        }
        source = cause.source();
    }

    false
}
