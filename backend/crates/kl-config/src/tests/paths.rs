use crate::{LoggingConfig, Paths};

use std::path::PathBuf;

use googletest::assert_that;
use googletest::prelude::eq;

#[test]
fn given_home_when_new_then_well_known_files_live_in_home() {
    let paths = Paths::new("/var/lib/kolibri");

    assert_that!(paths.pid_file, eq(&PathBuf::from("/var/lib/kolibri/server.pid")));
    assert_that!(
        paths.startup_lock,
        eq(&PathBuf::from("/var/lib/kolibri/server.lock"))
    );
    assert_that!(
        paths.daemon_log,
        eq(&PathBuf::from("/var/lib/kolibri/server.log"))
    );
    assert_that!(
        paths.config_file,
        eq(&PathBuf::from("/var/lib/kolibri/config.toml"))
    );
}

#[test]
fn given_relative_log_dir_when_log_dir_then_resolved_under_home() {
    let paths = Paths::new("/var/lib/kolibri");
    let logging = LoggingConfig::default();

    assert_that!(
        paths.log_dir(&logging),
        eq(&PathBuf::from("/var/lib/kolibri/logs"))
    );
}

#[test]
fn given_absolute_path_when_resolve_then_unchanged() {
    let paths = Paths::new("/var/lib/kolibri");

    assert_that!(
        paths.resolve("/srv/content"),
        eq(&PathBuf::from("/srv/content"))
    );
}
