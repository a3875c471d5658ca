//! Error types.
//!
//! User-level failures (bad credentials, unknown test, invalid choice) are
//! reported on the console and never surface here. These types cover the
//! cases a caller has to act on.

use thiserror::Error;

/// A lookup by test name found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("test not found: {0}")]
pub struct TestNotFound(pub String);

/// Errors raised while turning configuration into a directory.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The role string is not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Only teachers own tests.
    #[error("account {username} has role {role} and cannot own tests")]
    TestsOnNonTeacher { username: String, role: String },
}

/// Errors that end a console session abnormally.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading from or writing to the console failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
