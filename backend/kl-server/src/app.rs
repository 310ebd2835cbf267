//! Command dispatch for the `kolibri` binary.

use crate::error::{Result as ServerErrorResult, ServerError};
use crate::{Cli, Commands, ShutdownCoordinator, Worker, build_router, daemon, logger, server};

use kl_config::{Config, Paths};
use kl_lifecycle::{LifecycleManager, NotRunning, StartupLock, StatusCode, WorkerCommand};

use std::path::PathBuf;

use log::info;

const SUCCESS: u8 = 0;

/// Exit code reported for a status.
pub fn exit_code(status: StatusCode) -> u8 {
    u8::try_from(status.code()).unwrap_or(u8::MAX)
}

/// Run a parsed command line. Returns the process exit code.
pub async fn run(cli: Cli) -> ServerErrorResult<u8> {
    let home = match cli.home {
        Some(home) => home,
        None => Config::home_dir()?,
    };

    let config = Config::load_in(&home)?;
    config.validate()?;
    let paths = Paths::new(&home);

    logger::initialize(
        config.logging.level,
        log_file_path(&config, &paths)?,
        config.logging.colored,
    )?;
    config.log_summary(cli.command.summary_level());

    match cli.command {
        Commands::Start { port, foreground } => {
            let port = port.unwrap_or(config.server.port);
            if port != config.server.port {
                info!("Port {port} overrides configured port {}", config.server.port);
            }
            start(&config, &paths, port, foreground).await
        }
        Commands::Stop { pid, force } => stop(&config, &paths, pid, force).await,
        Commands::Status => status(&config, &paths).await,
        Commands::Urls => urls(&config, &paths).await,
        Commands::Worker => worker(&config).await,
    }
}

/// Construct log file path if configured, creating its directory.
fn log_file_path(config: &Config, paths: &Paths) -> ServerErrorResult<Option<PathBuf>> {
    let Some(filename) = &config.logging.file else {
        return Ok(None);
    };

    let log_dir = paths.log_dir(&config.logging);
    std::fs::create_dir_all(&log_dir)?;
    Ok(Some(log_dir.join(filename)))
}

async fn start(
    config: &Config,
    paths: &Paths,
    port: u16,
    foreground: bool,
) -> ServerErrorResult<u8> {
    let manager = LifecycleManager::from_config(config, paths.clone())?;

    if let Ok(server) = manager.get_status().await {
        println!("Kolibri is already running at {}", server.url());
        return Ok(SUCCESS);
    }

    if foreground || !config.startup.daemonize {
        run_foreground(config, paths, manager, port).await?;
        return Ok(SUCCESS);
    }

    let mut child = daemon::spawn_background(paths, port)?;
    let server =
        daemon::wait_until_running(&manager, &mut child, &config.startup, &paths.daemon_log)
            .await?;

    println!("Kolibri is running at {}", server.url());
    Ok(SUCCESS)
}

async fn run_foreground(
    config: &Config,
    paths: &Paths,
    manager: LifecycleManager,
    port: u16,
) -> ServerErrorResult<()> {
    info!("Starting kolibri v{}", env!("CARGO_PKG_VERSION"));

    let lock = StartupLock::acquire(&paths.startup_lock, port, manager.process())?;

    let manager = if config.worker.enabled {
        manager.with_worker(worker_command(paths)?)
    } else {
        manager
    };

    let shutdown = ShutdownCoordinator::new();
    shutdown.listen_for_signals();

    let router = build_router(&config.server, paths);

    manager
        .start(port, |address| {
            server::serve(address, router, shutdown, Some(lock))
        })
        .await
}

/// `kolibri worker` for the same home directory.
fn worker_command(paths: &Paths) -> ServerErrorResult<WorkerCommand> {
    let exe = std::env::current_exe()?;
    Ok(WorkerCommand::new(exe)
        .arg("--home")
        .arg(paths.home.to_string_lossy())
        .arg("worker")
        .env("KOLIBRI_LOG_COLORED", "0")
        .log_file(&paths.daemon_log))
}

async fn stop(
    config: &Config,
    paths: &Paths,
    pid: Option<u32>,
    force: bool,
) -> ServerErrorResult<u8> {
    let manager = LifecycleManager::from_config(config, paths.clone())?;

    if let Some(pid) = pid {
        manager.stop(Some(pid), false)?;
        println!("Stopped process {pid}");
        return Ok(SUCCESS);
    }

    match manager.get_status().await {
        Ok(server) => {
            manager.stop(Some(server.pid), false)?;
            println!("Kolibri server stopped (PID {})", server.pid);
            Ok(SUCCESS)
        }
        Err(NotRunning { status }) if force => {
            info!("Server not running ({status}), forcing stop");
            manager.stop(None, true)?;
            println!("Kolibri server stopped (forced)");
            Ok(SUCCESS)
        }
        Err(NotRunning { status }) => {
            println!("Kolibri server is not running: {status}");
            Ok(exit_code(status))
        }
    }
}

async fn status(config: &Config, paths: &Paths) -> ServerErrorResult<u8> {
    let manager = LifecycleManager::from_config(config, paths.clone())?;

    match manager.get_status().await {
        Ok(server) => {
            println!(
                "{} (PID {}, {})",
                StatusCode::Running,
                server.pid,
                server.url()
            );
            Ok(exit_code(StatusCode::Running))
        }
        Err(NotRunning { status }) => {
            println!("{status}");
            Ok(exit_code(status))
        }
    }
}

async fn urls(config: &Config, paths: &Paths) -> ServerErrorResult<u8> {
    let manager = LifecycleManager::from_config(config, paths.clone())?;

    let (status, urls) = manager.get_urls().await;
    if urls.is_empty() {
        println!("{status}");
    }
    for url in urls {
        println!("{url}");
    }

    Ok(exit_code(status))
}

async fn worker(config: &Config) -> ServerErrorResult<u8> {
    let worker = Worker::new(config.worker.heartbeat());
    worker.register_signals()?;

    tokio::task::spawn_blocking(move || worker.run())
        .await
        .map_err(|e| ServerError::from(std::io::Error::other(e)))?;

    Ok(SUCCESS)
}
