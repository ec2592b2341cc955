//! Project and milestone use-case service.
//!
//! # Responsibility
//! - Provide list/create/review/milestone entry points for UI callers.
//! - Apply each mutation as read-modify-write of the whole `projects`
//!   collection.
//!
//! # Invariants
//! - Created projects start `Pending` with empty feedback and no milestones,
//!   whatever the caller supplied.
//! - Project owners must be existing users with the student role.
//! - Unknown project/milestone ids yield `Ok(None)` and leave storage untouched.
//! - New ids are greater than every project and milestone id already stored,
//!   so generators started independently (other processes, earlier runs)
//!   cannot reissue a stored id.
//! - Last writer wins; no merge is attempted.

use crate::ids::IdGenerator;
use crate::model::project::{
    normalize_milestone_title, validate_review, Milestone, MilestoneId, NewProject, Project,
    ProjectId, ProjectStatus, ProjectValidationError,
};
use crate::model::user::{Role, User, UserId};
use crate::store::{Collection, RecordStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// Caller input failed validation.
    Validation(ProjectValidationError),
    /// `student_id` does not reference a user with the student role.
    UnknownStudent(UserId),
    /// Every id up to `i64::MAX` is already stored.
    IdSpaceExhausted,
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnknownStudent(id) => write!(f, "student not found: {id}"),
            Self::IdSpaceExhausted => write!(f, "no record ids left to allocate"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::UnknownStudent(_) | Self::IdSpaceExhausted => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ProjectValidationError> for ProjectServiceError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ProjectServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Project counts by review status, for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

/// Project service facade over a record store and id source.
pub struct ProjectService<S: RecordStore, G: IdGenerator> {
    store: S,
    ids: G,
}

impl<S: RecordStore, G: IdGenerator> ProjectService<S, G> {
    pub fn new(store: S, ids: G) -> Self {
        Self { store, ids }
    }

    /// Lists every project in stored order (admin view).
    pub fn list_all_projects(&self) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.load_projects()?)
    }

    /// Lists projects owned by one student, in stored order.
    pub fn list_projects_by_student(
        &self,
        student_id: UserId,
    ) -> ProjectServiceResult<Vec<Project>> {
        let projects = self.load_projects()?;
        Ok(projects
            .into_iter()
            .filter(|project| project.student_id == student_id)
            .collect())
    }

    pub fn get_project(&self, project_id: ProjectId) -> ProjectServiceResult<Option<Project>> {
        let projects = self.load_projects()?;
        Ok(projects.into_iter().find(|project| project.id == project_id))
    }

    /// Submits a new project for review.
    ///
    /// # Contract
    /// - Blank `title`/`description` are rejected.
    /// - `student_id` must reference a student; a blank `student_name` falls
    ///   back to that user's name.
    /// - Returns the stored record with a fresh id.
    pub fn create_project(&self, input: &NewProject) -> ProjectServiceResult<Project> {
        input.validate()?;

        let users: Vec<User> = self.store.load(Collection::Users)?;
        let owner = users
            .iter()
            .find(|user| user.id == input.student_id && user.role == Role::Student)
            .ok_or(ProjectServiceError::UnknownStudent(input.student_id))?;

        let mut projects = self.load_projects()?;
        let mut project = Project::submit(self.allocate_id(&projects)?, input);
        if project.student_name.is_empty() {
            project.student_name = owner.name.clone();
        }
        projects.push(project.clone());
        self.store.save(Collection::Projects, &projects)?;

        info!(
            "event=project_create module=service status=ok project_id={} student_id={}",
            project.id, project.student_id
        );
        Ok(project)
    }

    /// Sets review status and feedback.
    ///
    /// Any status transition is accepted, including back to `Pending`.
    /// `Approved`/`Rejected` require non-blank feedback.
    pub fn update_project_review(
        &self,
        project_id: ProjectId,
        status: ProjectStatus,
        feedback: impl Into<String>,
    ) -> ProjectServiceResult<Option<Project>> {
        let feedback = feedback.into();
        validate_review(status, &feedback)?;
        let updated = self.mutate_project("project_review", project_id, |project| {
            project.apply_review(status, feedback);
            true
        })?;
        if updated.is_some() {
            info!(
                "event=project_review module=service status=ok project_id={} review_status={}",
                project_id, status
            );
        }
        Ok(updated)
    }

    /// Appends an incomplete milestone with a fresh id.
    pub fn add_milestone(
        &self,
        project_id: ProjectId,
        title: &str,
    ) -> ProjectServiceResult<Option<Project>> {
        let title = normalize_milestone_title(title)?;
        let mut projects = self.load_projects()?;
        let milestone_id = self.allocate_id(&projects)?;
        let Some(project) = projects.iter_mut().find(|project| project.id == project_id) else {
            warn!(
                "event=milestone_add module=service status=not_found project_id={}",
                project_id
            );
            return Ok(None);
        };

        project.milestones.push(Milestone::new(milestone_id, title));
        let updated = project.clone();
        self.store.save(Collection::Projects, &projects)?;

        info!(
            "event=milestone_add module=service status=ok project_id={} milestone_id={}",
            project_id, milestone_id
        );
        Ok(Some(updated))
    }

    /// Flips one milestone's completion flag.
    pub fn toggle_milestone_done(
        &self,
        project_id: ProjectId,
        milestone_id: MilestoneId,
    ) -> ProjectServiceResult<Option<Project>> {
        self.mutate_project("milestone_toggle", project_id, |project| {
            match project.toggle_milestone(milestone_id) {
                Some(completed) => {
                    info!(
                        "event=milestone_toggle module=service status=ok project_id={} milestone_id={} completed={}",
                        project_id, milestone_id, completed
                    );
                    true
                }
                None => {
                    warn!(
                        "event=milestone_toggle module=service status=not_found project_id={} milestone_id={}",
                        project_id, milestone_id
                    );
                    false
                }
            }
        })
    }

    /// Counts projects per review status.
    pub fn review_summary(&self) -> ProjectServiceResult<ReviewSummary> {
        let projects = self.load_projects()?;
        let mut summary = ReviewSummary {
            total: projects.len(),
            ..ReviewSummary::default()
        };
        for project in &projects {
            match project.status {
                ProjectStatus::Pending => summary.pending += 1,
                ProjectStatus::Approved => summary.approved += 1,
                ProjectStatus::Rejected => summary.rejected += 1,
            }
        }
        Ok(summary)
    }

    fn load_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.store.load(Collection::Projects)
    }

    /// Takes the generator's next id, bumped past every stored id.
    fn allocate_id(&self, projects: &[Project]) -> ProjectServiceResult<i64> {
        let candidate = self.ids.next_id();
        let Some(highest) = highest_stored_id(projects) else {
            return Ok(candidate);
        };
        if candidate > highest {
            return Ok(candidate);
        }
        let bumped = highest
            .checked_add(1)
            .ok_or(ProjectServiceError::IdSpaceExhausted)?;
        info!(
            "event=id_allocate module=service status=bumped generated={} assigned={}",
            candidate, bumped
        );
        Ok(bumped)
    }

    /// Applies `apply` to one project and persists the whole collection.
    ///
    /// Nothing is written when the project is missing or `apply` reports no
    /// change.
    fn mutate_project(
        &self,
        event: &'static str,
        project_id: ProjectId,
        apply: impl FnOnce(&mut Project) -> bool,
    ) -> ProjectServiceResult<Option<Project>> {
        let mut projects = self.load_projects()?;
        let Some(project) = projects.iter_mut().find(|project| project.id == project_id) else {
            warn!(
                "event={} module=service status=not_found project_id={}",
                event, project_id
            );
            return Ok(None);
        };

        if !apply(project) {
            return Ok(None);
        }
        let updated = project.clone();
        self.store.save(Collection::Projects, &projects)?;
        Ok(Some(updated))
    }
}

fn highest_stored_id(projects: &[Project]) -> Option<i64> {
    projects
        .iter()
        .flat_map(|project| {
            std::iter::once(project.id).chain(project.milestones.iter().map(|m| m.id))
        })
        .max()
}
