use std::fmt;

/// Outcome of a status query.
///
/// The numeric values are stable and double as process exit codes for the
/// `status` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Running,
    Stopped,
    StartingUp,
    NotResponding,
    FailedToStart,
    UncleanShutdown,
    UnknownInstance,
    ServerConfigurationError,
    PidFileReadError,
    PidFileInvalid,
    Unknown,
}

impl StatusCode {
    pub const ALL: [StatusCode; 11] = [
        StatusCode::Running,
        StatusCode::Stopped,
        StatusCode::StartingUp,
        StatusCode::NotResponding,
        StatusCode::FailedToStart,
        StatusCode::UncleanShutdown,
        StatusCode::UnknownInstance,
        StatusCode::ServerConfigurationError,
        StatusCode::PidFileReadError,
        StatusCode::PidFileInvalid,
        StatusCode::Unknown,
    ];

    pub const fn code(self) -> i32 {
        match self {
            StatusCode::Running => 0,
            StatusCode::Stopped => 1,
            StatusCode::StartingUp => 4,
            StatusCode::NotResponding => 5,
            StatusCode::FailedToStart => 6,
            StatusCode::UncleanShutdown => 7,
            StatusCode::UnknownInstance => 8,
            StatusCode::ServerConfigurationError => 9,
            StatusCode::PidFileReadError => 99,
            StatusCode::PidFileInvalid => 100,
            StatusCode::Unknown => 101,
        }
    }

    /// Map a numeric code back; anything unrecognised is `Unknown`.
    pub fn from_code(code: i32) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .unwrap_or(StatusCode::Unknown)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            StatusCode::Running => "running",
            StatusCode::Stopped => "stopped",
            StatusCode::StartingUp => "starting_up",
            StatusCode::NotResponding => "not_responding",
            StatusCode::FailedToStart => "failed_to_start",
            StatusCode::UncleanShutdown => "unclean_shutdown",
            StatusCode::UnknownInstance => "unknown_instance",
            StatusCode::ServerConfigurationError => "server_configuration_error",
            StatusCode::PidFileReadError => "pid_file_read_error",
            StatusCode::PidFileInvalid => "pid_file_invalid",
            StatusCode::Unknown => "unknown",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            StatusCode::Running => "OK, running",
            StatusCode::Stopped => "Stopped",
            StatusCode::StartingUp => "Starting up",
            StatusCode::NotResponding => "Not responding",
            StatusCode::FailedToStart => "Failed to start (check the server log)",
            StatusCode::UncleanShutdown => "Unclean shutdown",
            StatusCode::UnknownInstance => "Unknown server instance on the recorded port",
            StatusCode::ServerConfigurationError => "Server configuration error",
            StatusCode::PidFileReadError => "Could not read PID file",
            StatusCode::PidFileInvalid => "Invalid PID file",
            StatusCode::Unknown => "Could not determine status",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}
