use crate::{ServerError, exit_code};

use kl_lifecycle::StatusCode;

use std::path::PathBuf;

use googletest::assert_that;
use googletest::prelude::eq;

#[test]
fn given_status_when_exit_code_then_numeric_status() {
    assert_that!(exit_code(StatusCode::Running), eq(0));
    assert_that!(exit_code(StatusCode::NotResponding), eq(5));
    assert_that!(exit_code(StatusCode::PidFileInvalid), eq(100));
}

#[test]
fn given_start_failure_when_exit_code_then_status_code() {
    let error = ServerError::StartFailed {
        status: StatusCode::UnknownInstance,
    };

    assert_that!(error.exit_code(), eq(8));
}

#[test]
fn given_daemon_exit_when_exit_code_then_failed_to_start() {
    let error = ServerError::DaemonExited {
        status: String::from("exit status: 1"),
        log: PathBuf::from("/tmp/server.log"),
    };

    assert_that!(error.exit_code(), eq(6));
}

#[test]
fn given_other_error_when_exit_code_then_generic_failure() {
    let error = ServerError::logger("no terminal");

    assert_that!(error.exit_code(), eq(1));
}
