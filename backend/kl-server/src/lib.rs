//! The `kolibri` command line: server startup, the embedded HTTP server and
//! the background task worker.

pub mod app;
pub mod cli;
pub mod commands;
pub mod daemon;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod worker;

#[cfg(test)]
mod tests;

pub use crate::app::{exit_code, run};
pub use crate::cli::Cli;
pub use crate::commands::Commands;
pub use crate::error::{Result as ServerResult, ServerError};
pub use crate::routes::build_router;
pub use crate::server::serve;
pub use crate::shutdown::ShutdownCoordinator;
pub use crate::worker::Worker;
