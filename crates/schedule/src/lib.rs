//! # Nexus Schedule
//!
//! Stateful layer over `nexus-core`: configuration, logging setup, session
//! storage and the service that materializes requests into it.
//!
//! ## Architecture
//!
//! - **Config**: environment-driven settings
//! - **Repository**: the session store contract and its in-memory implementation
//! - **Service**: submit / regenerate / read operations over a repository
//! - **Mock**: mockall doubles of the repository for tests

/// Configuration module for scheduling settings
pub mod config;
/// Mock repositories for testing
pub mod mock;
/// Session storage
pub mod repository;
/// Operations exposed to embedding applications
pub mod service;

use eyre::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub use config::SchedulingConfig;
pub use repository::{InMemorySessionRepository, ReplaceOutcome, SessionRepository};
pub use service::{Regeneration, ScheduleService};

/// Installs the global `tracing` subscriber at the given level.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
