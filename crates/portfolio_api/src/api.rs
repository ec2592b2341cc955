//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose the portfolio use-cases to the UI layer via FRB sync calls.
//! - Map core records and errors to flat, UI-friendly envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - "Not found" is reported as `ok=true` with an absent payload; only real
//!   failures (validation, storage) set `ok=false`.
//! - Every call opens the configured database and runs migrations first.

use log::warn;
use portfolio_core::db::open_db;
use portfolio_core::{
    core_version as core_version_inner, init_db as init_db_inner,
    init_logging as init_logging_inner, ping as ping_inner, AuthService, Milestone,
    MonotonicIdGenerator, NewProject, Project, ProjectService, ProjectServiceError,
    ProjectStatus, SqliteRecordStore, UserProfile,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "portfolio.sqlite3";
const DB_PATH_ENV: &str = "PORTFOLIO_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static ID_GENERATOR: OnceLock<MonotonicIdGenerator> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
/// Repeating the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by all later calls.
///
/// Must run before the first DB-backed call. Returns an empty string on
/// success, or an error message when a different path is already active.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// User shape handed to the UI; never carries a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// `admin|student`.
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneView {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectView {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub title: String,
    pub description: String,
    /// `Pending|Approved|Rejected`.
    pub status: String,
    pub feedback: String,
    pub milestones: Vec<MilestoneView>,
    pub completed_milestones: u32,
}

/// Input for `create_project`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub student_id: i64,
    pub student_name: String,
}

/// Response envelope for `login_user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub ok: bool,
    /// `None` for unknown credentials.
    pub user: Option<UserView>,
    pub message: String,
}

/// Response envelope for project list calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListResponse {
    pub ok: bool,
    pub items: Vec<ProjectView>,
    pub message: String,
}

/// Response envelope for single-project mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectActionResponse {
    pub ok: bool,
    /// Updated record, `None` when the target id was not found.
    pub project: Option<ProjectView>,
    pub message: String,
}

impl ProjectActionResponse {
    fn from_result(
        operation: &str,
        result: Result<Option<Project>, String>,
        success: &str,
        not_found: &str,
    ) -> Self {
        match result {
            Ok(Some(project)) => Self {
                ok: true,
                project: Some(to_project_view(&project)),
                message: success.to_string(),
            },
            Ok(None) => Self {
                ok: true,
                project: None,
                message: not_found.to_string(),
            },
            Err(err) => Self {
                ok: false,
                project: None,
                message: format!("{operation} failed: {err}"),
            },
        }
    }
}

/// Seeds default users and projects when the store is empty.
///
/// Idempotent. Returns an empty string on success and an error message on
/// failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_db() -> String {
    let result = open_store_conn().and_then(|conn| {
        let store = SqliteRecordStore::new(&conn);
        let seeded = init_db_inner(&store);
        seeded.map(|_| ()).map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => String::new(),
        Err(err) => format!("init_db failed: {err}"),
    }
}

/// Checks plaintext demo credentials.
///
/// Both values must match exactly; no trimming or case folding is applied.
#[flutter_rust_bridge::frb(sync)]
pub fn login_user(email: String, password: String) -> LoginResponse {
    let result = open_store_conn().and_then(|conn| {
        let auth = AuthService::new(SqliteRecordStore::new(&conn));
        let profile = auth.authenticate(email.as_str(), password.as_str());
        profile.map_err(|err| err.to_string())
    });
    match result {
        Ok(Some(profile)) => LoginResponse {
            ok: true,
            user: Some(to_user_view(&profile)),
            message: "Signed in.".to_string(),
        },
        Ok(None) => LoginResponse {
            ok: true,
            user: None,
            message: "Invalid credentials".to_string(),
        },
        Err(err) => LoginResponse {
            ok: false,
            user: None,
            message: format!("login_user failed: {err}"),
        },
    }
}

/// Lists all projects (admin view).
#[flutter_rust_bridge::frb(sync)]
pub fn get_projects() -> ProjectListResponse {
    to_list_response(
        "get_projects",
        with_project_service(|service| service.list_all_projects()),
    )
}

/// Lists projects owned by `student_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn get_student_projects(student_id: i64) -> ProjectListResponse {
    to_list_response(
        "get_student_projects",
        with_project_service(|service| service.list_projects_by_student(student_id)),
    )
}

/// Submits a new project; it always starts `Pending` with empty feedback.
#[flutter_rust_bridge::frb(sync)]
pub fn create_project(project: ProjectDraft) -> ProjectActionResponse {
    let input = NewProject {
        title: project.title,
        description: project.description,
        student_id: project.student_id,
        student_name: project.student_name,
    };
    ProjectActionResponse::from_result(
        "create_project",
        with_project_service(|service| service.create_project(&input).map(Some)),
        "Project submitted.",
        "Project not found.",
    )
}

/// Sets review status (`Pending|Approved|Rejected`, any case) and feedback.
///
/// Approving or rejecting requires non-blank feedback.
#[flutter_rust_bridge::frb(sync)]
pub fn update_project_admin(id: i64, status: String, feedback: String) -> ProjectActionResponse {
    let Some(status) = ProjectStatus::parse(status.as_str()) else {
        return ProjectActionResponse {
            ok: false,
            project: None,
            message: format!(
                "update_project_admin failed: unknown status `{}`; expected Pending|Approved|Rejected",
                status.trim()
            ),
        };
    };
    ProjectActionResponse::from_result(
        "update_project_admin",
        with_project_service(|service| service.update_project_review(id, status, feedback)),
        "Review saved.",
        "Project not found.",
    )
}

/// Appends an incomplete milestone.
#[flutter_rust_bridge::frb(sync)]
pub fn add_milestone(project_id: i64, title: String) -> ProjectActionResponse {
    ProjectActionResponse::from_result(
        "add_milestone",
        with_project_service(|service| service.add_milestone(project_id, title.as_str())),
        "Milestone added.",
        "Project not found.",
    )
}

/// Flips a milestone's completion flag.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_milestone(project_id: i64, milestone_id: i64) -> ProjectActionResponse {
    ProjectActionResponse::from_result(
        "toggle_milestone",
        with_project_service(|service| service.toggle_milestone_done(project_id, milestone_id)),
        "Milestone updated.",
        "Project or milestone not found.",
    )
}

#[cfg(test)]
thread_local! {
    static THREAD_DB_PATH: std::cell::RefCell<Option<PathBuf>> =
        const { std::cell::RefCell::new(None) };
}

#[cfg(test)]
fn thread_db_path() -> Option<PathBuf> {
    THREAD_DB_PATH.with(|slot| slot.borrow().clone())
}

#[cfg(not(test))]
fn thread_db_path() -> Option<PathBuf> {
    None
}

fn resolve_db_path() -> PathBuf {
    if let Some(path) = thread_db_path() {
        return path;
    }
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn open_store_conn() -> Result<Connection, String> {
    open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))
}

fn with_project_service<T>(
    f: impl FnOnce(
        &ProjectService<SqliteRecordStore<'_>, &MonotonicIdGenerator>,
    ) -> Result<T, ProjectServiceError>,
) -> Result<T, String> {
    let conn = open_store_conn()?;
    let ids = ID_GENERATOR.get_or_init(MonotonicIdGenerator::new);
    let service = ProjectService::new(SqliteRecordStore::new(&conn), ids);
    let result = f(&service);
    result.map_err(|err| {
        warn!("event=api_call module=api status=error error={err}");
        err.to_string()
    })
}

fn to_list_response(
    operation: &str,
    result: Result<Vec<Project>, String>,
) -> ProjectListResponse {
    match result {
        Ok(projects) => {
            let items = projects.iter().map(to_project_view).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No projects submitted yet.".to_string()
            } else {
                format!("Found {} project(s).", items.len())
            };
            ProjectListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => ProjectListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn to_user_view(profile: &UserProfile) -> UserView {
    UserView {
        id: profile.id,
        name: profile.name.clone(),
        email: profile.email.clone(),
        role: profile.role.as_str().to_string(),
    }
}

fn to_milestone_view(milestone: &Milestone) -> MilestoneView {
    MilestoneView {
        id: milestone.id,
        title: milestone.title.clone(),
        completed: milestone.completed,
    }
}

fn to_project_view(project: &Project) -> ProjectView {
    let (completed, _) = project.milestone_progress();
    ProjectView {
        id: project.id,
        student_id: project.student_id,
        student_name: project.student_name.clone(),
        title: project.title.clone(),
        description: project.description.clone(),
        status: project.status.as_str().to_string(),
        feedback: project.feedback.clone(),
        milestones: project.milestones.iter().map(to_milestone_view).collect(),
        completed_milestones: u32::try_from(completed).unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_milestone, configure_db_path, core_version, create_project, get_projects,
        get_student_projects, init_db, init_logging, login_user, ping, toggle_milestone,
        update_project_admin, ProjectDraft,
    };
    use tempfile::TempDir;

    /// Points this test thread at a fresh, seeded database file.
    ///
    /// The file lives as long as the returned directory.
    fn setup() -> TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("portfolio.sqlite3");
        super::THREAD_DB_PATH.with(|slot| *slot.borrow_mut() = Some(path));
        let seeded = init_db();
        assert!(seeded.is_empty(), "{seeded}");
        dir
    }

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            description: "Built during the api tests".to_string(),
            student_id: 2,
            student_name: "Student One".to_string(),
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn configure_db_path_refuses_to_switch() {
        let dir = tempfile::tempdir().expect("temp dir");
        let first = dir.path().join("first.sqlite3").display().to_string();
        let second = dir.path().join("second.sqlite3").display().to_string();

        assert_eq!(configure_db_path(first.clone()), "");
        assert_eq!(configure_db_path(first), "");
        assert!(configure_db_path(second).contains("refusing to switch"));
        assert!(configure_db_path("  ".to_string()).contains("empty"));
    }

    #[test]
    fn login_user_requires_exact_credentials() {
        let _db = setup();

        let ok = login_user("admin@school.edu".to_string(), "password".to_string());
        assert!(ok.ok, "{}", ok.message);
        let user = ok.user.expect("seeded admin should sign in");
        assert_eq!(user.role, "admin");

        for (email, password) in [
            ("  admin@school.edu\t", "password"),
            ("admin@school.edu ", "password"),
            ("Admin@school.edu", "password"),
            ("admin@school.edu", " password"),
        ] {
            let padded = login_user(email.to_string(), password.to_string());
            assert!(padded.ok, "{}", padded.message);
            assert!(padded.user.is_none(), "{email:?}/{password:?} should not sign in");
        }

        let rejected = login_user("admin@school.edu".to_string(), "nope".to_string());
        assert!(rejected.ok);
        assert!(rejected.user.is_none());
        assert_eq!(rejected.message, "Invalid credentials");
    }

    #[test]
    fn project_flow_through_api() {
        let _db = setup();

        let created = create_project(draft("Portfolio A"));
        assert!(created.ok, "{}", created.message);
        let project = created.project.expect("created project");
        assert_eq!(project.status, "Pending");
        assert!(project.feedback.is_empty());

        let with_milestone = add_milestone(project.id, "Design".to_string());
        let milestone_id = with_milestone.project.expect("project exists").milestones[0].id;

        let toggled = toggle_milestone(project.id, milestone_id);
        let toggled = toggled.project.expect("project exists");
        assert!(toggled.milestones[0].completed);
        assert_eq!(toggled.completed_milestones, 1);

        let reviewed = update_project_admin(
            project.id,
            "approved".to_string(),
            "Great work".to_string(),
        );
        let reviewed = reviewed.project.expect("project exists");
        assert_eq!(reviewed.status, "Approved");
        assert_eq!(reviewed.feedback, "Great work");

        let listed = get_student_projects(2);
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.iter().any(|item| item.id == project.id));
        assert!(get_projects().items.len() >= listed.items.len());
    }

    #[test]
    fn missing_targets_are_reported_without_failure() {
        let _db = setup();

        let review = update_project_admin(-1, "Rejected".to_string(), "n/a".to_string());
        assert!(review.ok);
        assert!(review.project.is_none());

        let toggle = toggle_milestone(1, -1);
        assert!(toggle.ok);
        assert!(toggle.project.is_none());
    }

    #[test]
    fn invalid_input_sets_ok_false() {
        let _db = setup();

        let bad_status = update_project_admin(1, "Archived".to_string(), String::new());
        assert!(!bad_status.ok);
        assert!(bad_status.message.contains("unknown status"));

        let blank = create_project(draft("   "));
        assert!(!blank.ok);
        assert!(blank.message.contains("title"));

        let blank_milestone = add_milestone(1, " ".to_string());
        assert!(!blank_milestone.ok);

        let silent_approval = update_project_admin(1, "Approved".to_string(), "  ".to_string());
        assert!(!silent_approval.ok);
        assert!(silent_approval.message.contains("feedback"));
        let seeded = get_projects();
        let sample = seeded.items.iter().find(|item| item.id == 1).expect("seeded project");
        assert_eq!(sample.status, "Pending");
    }
}
