//! Tunable defaults shared across crates.
//!
//! Each constant documents the environment variable that overrides it.

/// Reminder scan tick interval in seconds (`REMINDER_SCAN_INTERVAL_SECS`).
pub const SCAN_INTERVAL_SECS: u64 = 10;

/// Forward horizon of the scan window in minutes (`REMINDER_HORIZON_MINS`).
///
/// A note whose reminder falls within `[now, now + horizon]` and has not
/// been emailed or read is a scan candidate.
pub const SCAN_HORIZON_MINS: i64 = 10;

/// Forward horizon of the API due-reminders query in minutes. Narrower than
/// the scan horizon: the UI polls for imminent reminders only.
pub const API_DUE_WINDOW_MINS: i64 = 5;

/// Default HTTP listen port (`PORT`).
pub const HTTP_PORT: u16 = 3000;

/// Default request body size limit in bytes.
pub const MAX_BODY_BYTES: usize = 256 * 1024;
