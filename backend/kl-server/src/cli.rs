use crate::commands::Commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "kolibri")]
#[command(about = "Start, stop and inspect the Kolibri server")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Home directory for the PID file, logs and config (default: $KOLIBRI_HOME or ~/.kolibri)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,
}
