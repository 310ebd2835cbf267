use crate::StatusCode;

use std::net::IpAddr;

use thiserror::Error;

/// A server that answered the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningServer {
    pub pid: u32,
    /// Address the server is configured to listen on
    pub address: IpAddr,
    pub port: u16,
}

impl RunningServer {
    pub fn url(&self) -> String {
        match self.address {
            IpAddr::V4(addr) => format!("http://{}:{}/", addr, self.port),
            IpAddr::V6(addr) => format!("http://[{}]:{}/", addr, self.port),
        }
    }
}

/// The server was expected to run but didn't; `status` says why.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Server is not running: {status}")]
pub struct NotRunning {
    pub status: StatusCode,
}

impl NotRunning {
    pub fn new(status: StatusCode) -> Self {
        Self { status }
    }
}

impl From<StatusCode> for NotRunning {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

pub type StatusResult = Result<RunningServer, NotRunning>;
