//! Project and milestone domain model.
//!
//! # Responsibility
//! - Define the project record submitted by students and reviewed by admins.
//! - Provide in-place mutation helpers used by the project service.
//! - Validate creation input before anything is persisted.
//!
//! # Invariants
//! - New projects start as `Pending` with empty feedback and no milestones.
//! - `title` and `description` are never rewritten after creation.
//! - `student_name` is a cache of `User::name` taken at creation time.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProjectId = i64;
pub type MilestoneId = i64;

/// Review state set by admins.
///
/// Any state can move to any other state; there is no terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Parses a status label case-insensitively, ignoring surrounding space.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-task of a project with a binary completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub title: String,
    pub completed: bool,
}

impl Milestone {
    pub fn new(id: MilestoneId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }
}

/// Stored project record.
///
/// Serialized with camelCase keys (`studentId`, `studentName`) to keep the
/// persisted collection layout stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub student_id: UserId,
    /// Copy of the owner's name at creation; not refreshed afterwards.
    pub student_name: String,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub feedback: String,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Project {
    /// Builds a freshly submitted project from validated input.
    ///
    /// # Invariants
    /// - `status` is `Pending`, `feedback` is empty, `milestones` is empty.
    pub fn submit(id: ProjectId, input: &NewProject) -> Self {
        Self {
            id,
            student_id: input.student_id,
            student_name: input.student_name.trim().to_string(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            status: ProjectStatus::Pending,
            feedback: String::new(),
            milestones: Vec::new(),
        }
    }

    /// Overwrites review state. Backward moves to `Pending` are allowed.
    pub fn apply_review(&mut self, status: ProjectStatus, feedback: impl Into<String>) {
        self.status = status;
        self.feedback = feedback.into();
    }

    /// Flips completion of one milestone.
    ///
    /// Returns the new `completed` value, or `None` when the id is unknown.
    pub fn toggle_milestone(&mut self, id: MilestoneId) -> Option<bool> {
        let milestone = self
            .milestones
            .iter_mut()
            .find(|milestone| milestone.id == id)?;
        milestone.completed = !milestone.completed;
        Some(milestone.completed)
    }

    /// Returns `(completed, total)` milestone counts.
    pub fn milestone_progress(&self) -> (usize, usize) {
        let completed = self
            .milestones
            .iter()
            .filter(|milestone| milestone.completed)
            .count();
        (completed, self.milestones.len())
    }
}

/// Creation input for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub student_id: UserId,
    pub student_name: String,
}

impl NewProject {
    /// Checks required text fields.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.title.trim().is_empty() {
            return Err(ProjectValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(ProjectValidationError::EmptyDescription);
        }
        Ok(())
    }
}

/// Normalizes a milestone title, rejecting blank input.
pub fn normalize_milestone_title(title: &str) -> Result<String, ProjectValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ProjectValidationError::EmptyMilestoneTitle);
    }
    Ok(trimmed.to_string())
}

/// Checks review input: approving or rejecting requires feedback.
///
/// Moving back to `Pending` may clear feedback.
pub fn validate_review(
    status: ProjectStatus,
    feedback: &str,
) -> Result<(), ProjectValidationError> {
    if status != ProjectStatus::Pending && feedback.trim().is_empty() {
        return Err(ProjectValidationError::EmptyFeedback);
    }
    Ok(())
}

/// Input validation failures for project and milestone writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyTitle,
    EmptyDescription,
    EmptyMilestoneTitle,
    EmptyFeedback,
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "project title cannot be empty"),
            Self::EmptyDescription => write!(f, "project description cannot be empty"),
            Self::EmptyMilestoneTitle => write!(f, "milestone title cannot be empty"),
            Self::EmptyFeedback => write!(f, "review feedback cannot be empty"),
        }
    }
}

impl Error for ProjectValidationError {}
