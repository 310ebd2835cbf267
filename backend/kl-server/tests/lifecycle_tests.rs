//! Start the real HTTP server through the lifecycle manager and observe it
//! with the status probe.

use kl_config::{Paths, ServerConfig};
use kl_lifecycle::{
    HttpProbe, LifecycleManager, NotRunning, StartupLock, StatusCode, SystemProcess,
};
use kl_server::{ServerError, ShutdownCoordinator, build_router, serve};

use std::net::{IpAddr, Ipv4Addr, TcpListener};
use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{eq, err};
use tempfile::TempDir;

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn manager(home: &TempDir) -> LifecycleManager {
    LifecycleManager::new(
        Paths::new(home.path()),
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        SystemProcess,
        HttpProbe::new("127.0.0.1", Duration::from_secs(3)).unwrap(),
    )
}

#[tokio::test]
async fn test_started_server_reports_running_then_stopped_after_shutdown() {
    let home = TempDir::new().unwrap();
    let paths = Paths::new(home.path());
    let port = free_port();
    let manager = manager(&home);
    let shutdown = ShutdownCoordinator::new();

    let lock = StartupLock::acquire(&paths.startup_lock, port, &SystemProcess).unwrap();
    let router = build_router(&ServerConfig::default(), &paths);

    let serving = manager.start(port, |address| {
        serve(address, router, shutdown.clone(), Some(lock))
    });

    let observe = async {
        let mut running = None;
        for _ in 0..100 {
            if let Ok(server) = manager.get_status().await {
                running = Some(server);
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let lock_released = !paths.startup_lock.exists();
        shutdown.shutdown();
        (running, lock_released)
    };

    let (result, (running, lock_released)) = tokio::join!(serving, observe);

    assert!(result.is_ok(), "{result:?}");
    let running = running.expect("server never reported running");
    assert_that!(running.pid, eq(std::process::id()));
    assert_that!(running.port, eq(port));
    assert!(lock_released);
    assert!(!paths.pid_file.exists());
    assert_that!(
        manager.get_status().await,
        err(eq(NotRunning::new(StatusCode::Stopped)))
    );
}

#[tokio::test]
async fn test_bind_failure_removes_pid_record() {
    let home = TempDir::new().unwrap();
    let paths = Paths::new(home.path());
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let manager = manager(&home);

    let result = manager
        .start(port, |address| {
            serve(
                address,
                build_router(&ServerConfig::default(), &paths),
                ShutdownCoordinator::new(),
                None,
            )
        })
        .await;

    assert!(matches!(result, Err(ServerError::Bind { .. })));
    assert!(!paths.pid_file.exists());
}
