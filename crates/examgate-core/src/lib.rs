//! examgate-core — accounts, tests, and the console session loop.
//!
//! Administrators, teachers and students share one login prompt. Teachers
//! author tests, students attempt them and get a score. All state lives in
//! memory for a single process run.

pub mod account;
pub mod config;
pub mod console;
pub mod directory;
pub mod error;
pub mod model;
pub mod session;
