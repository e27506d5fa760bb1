//! Core domain logic for NoteKeep.
//! This crate is the single source of truth for note ownership and
//! summary lifecycle rules.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod summary;

pub use auth::{RequestContext, UserIdentity};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::note::{Note, NoteId, UserId};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{
    NoteService, NoteServiceError, NoteServiceResult, OwnershipPolicy,
};
pub use summary::job::{NoopScheduler, ScheduleError, SummaryJob, SummaryScheduler};
pub use summary::summarizer::{ExtractiveSummarizer, SummarizeError, Summarizer};
pub use summary::worker::{SummaryWorker, WorkerReport, WorkerScheduler};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
