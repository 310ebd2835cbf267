//! End-to-end status detection against the real OS and a mock HTTP server

#![cfg(unix)]

use kl_config::Paths;
use kl_lifecycle::{
    HttpProbe, LifecycleManager, NotRunning, PidRecord, StatusCode, SystemProcess,
};

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{eq, err};
use tempfile::TempDir;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

const DEAD_PID: u32 = i32::MAX as u32;

fn manager(home: &TempDir) -> LifecycleManager {
    LifecycleManager::new(
        Paths::new(home.path()),
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        SystemProcess,
        HttpProbe::new("127.0.0.1", Duration::from_secs(3)).unwrap(),
    )
}

#[tokio::test]
async fn test_status_running_for_live_process_and_healthy_server() {
    let home = TempDir::new().unwrap();
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    let port = mock_server.address().port();
    PidRecord::current(port)
        .write(&Paths::new(home.path()).pid_file)
        .unwrap();

    let server = manager(&home).get_status().await.unwrap();

    assert_that!(server.pid, eq(std::process::id()));
    assert_that!(server.port, eq(port));
    assert_that!(server.url(), eq(&format!("http://127.0.0.1:{port}/")));
}

#[tokio::test]
async fn test_status_unknown_instance_when_port_answers_404() {
    let home = TempDir::new().unwrap();
    let mock_server = MockServer::start().await;
    PidRecord::current(mock_server.address().port())
        .write(&Paths::new(home.path()).pid_file)
        .unwrap();

    let status = manager(&home).get_status().await;

    assert_that!(status, err(eq(NotRunning::new(StatusCode::UnknownInstance))));
}

#[tokio::test]
async fn test_status_not_responding_when_nothing_listens() {
    let home = TempDir::new().unwrap();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    PidRecord::current(port)
        .write(&Paths::new(home.path()).pid_file)
        .unwrap();

    let status = manager(&home).get_status().await;

    assert_that!(status, err(eq(NotRunning::new(StatusCode::NotResponding))));
}

#[tokio::test]
async fn test_status_unclean_shutdown_for_dead_process() {
    let home = TempDir::new().unwrap();
    PidRecord::new(DEAD_PID, Some(8080))
        .write(&Paths::new(home.path()).pid_file)
        .unwrap();

    let status = manager(&home).get_status().await;

    assert_that!(
        status,
        err(eq(NotRunning::new(StatusCode::UncleanShutdown)))
    );
}

#[tokio::test]
async fn test_stop_removes_pid_record_of_dead_process_when_forced() {
    let home = TempDir::new().unwrap();
    let pid_file = Paths::new(home.path()).pid_file;
    PidRecord::new(DEAD_PID, Some(8080)).write(&pid_file).unwrap();

    manager(&home).stop(None, true).unwrap();

    assert!(!pid_file.exists());
    assert_that!(
        manager(&home).get_status().await,
        err(eq(NotRunning::new(StatusCode::Stopped)))
    );
}
