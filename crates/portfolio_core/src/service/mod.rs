//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store reads/writes into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod auth_service;
pub mod project_service;
