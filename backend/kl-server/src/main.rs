//! kolibri - Kolibri server lifecycle CLI
//!
//! # Examples
//!
//! ```bash
//! # Start in the background and wait until it answers
//! kolibri start --port 8080
//!
//! # Exit code is the numeric status code
//! kolibri status
//!
//! kolibri stop
//! ```

use kl_server::{Cli, run};

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
