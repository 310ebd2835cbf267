use clap::Subcommand;
use log::Level;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the server (in the background unless --foreground)
    Start {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,

        /// Run in this process instead of daemonizing
        #[arg(long)]
        foreground: bool,
    },

    /// Stop the running server
    Stop {
        /// Stop this process id instead of the one in the PID file
        #[arg(long)]
        pid: Option<u32>,

        /// Stop whatever the PID file names, even if the server looks dead
        #[arg(long)]
        force: bool,
    },

    /// Show the server status (exit code = status code)
    Status,

    /// Print the URLs the server can be reached on
    Urls,

    /// Run the background task worker
    Worker,
}

impl Commands {
    /// Level the configuration summary is logged at. Only `start` announces
    /// it; the query commands keep stderr quiet unless debugging.
    pub fn summary_level(&self) -> Level {
        match self {
            Commands::Start { .. } => Level::Info,
            _ => Level::Debug,
        }
    }
}
