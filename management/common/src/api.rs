//! The management API served under [PROCESSES_PATH].

pub mod processes;

/// Root of the process listing.
pub const PROCESSES_PATH: &str = "/management/processes";

/// Health check, answers [STATUS_UP].
pub const STATUS_PATH: &str = "/status";
pub const STATUS_UP: &str = "UP";

pub static APPLICATION_JSON: &str = "application/json";
