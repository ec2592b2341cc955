//! Core domain logic for the student portfolio tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod seed;
pub mod service;
pub mod store;

pub use ids::{IdGenerator, MonotonicIdGenerator, SequentialIdGenerator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::project::{
    Milestone, MilestoneId, NewProject, Project, ProjectId, ProjectStatus, ProjectValidationError,
};
pub use model::user::{Role, User, UserId, UserProfile};
pub use seed::{init_db, SeedReport};
pub use service::auth_service::AuthService;
pub use service::project_service::{
    ProjectService, ProjectServiceError, ProjectServiceResult, ReviewSummary,
};
pub use store::{
    Collection, MemoryRecordStore, RecordStore, SqliteRecordStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
