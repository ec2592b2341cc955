//! Domain model for portfolio users, projects and milestones.
//!
//! # Responsibility
//! - Define canonical records persisted in the `users` and `projects`
//!   collections.
//! - Keep serialized field names stable for stored payloads.
//!
//! # Invariants
//! - Every `Project::student_id` references a `User` with `Role::Student`.
//! - Milestone ids are unique within one project.

pub mod project;
pub mod user;
