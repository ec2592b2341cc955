//! Command-line front end for the portfolio tracker.
//!
//! # Responsibility
//! - Drive the core login, listing, submission and review use-cases against
//!   a local SQLite file.
//! - Keep output line-oriented for shell use.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use portfolio_core::db::open_db;
use portfolio_core::{
    default_log_level, init_db, init_logging, AuthService, MonotonicIdGenerator, NewProject,
    Project, ProjectService, ProjectStatus, SqliteRecordStore,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Student portfolio tracker", version)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "PORTFOLIO_DB_PATH", default_value = "portfolio.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "PORTFOLIO_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "PORTFOLIO_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed default users and the sample project if missing
    Init,
    /// Check credentials and print the matching profile
    Login { email: String, password: String },
    /// List projects, optionally only those of one student
    Projects {
        #[arg(long)]
        student: Option<i64>,
    },
    /// Show one project with its milestones
    Show { project_id: i64 },
    /// Submit a new project for review
    Submit {
        #[arg(long)]
        student: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Owner display name; defaults to the student's account name
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Set review status and feedback
    Review {
        project_id: i64,
        #[arg(value_parser = parse_status)]
        status: ProjectStatus,
        /// Required for Approved and Rejected
        #[arg(long, default_value = "")]
        feedback: String,
    },
    /// Milestone commands
    Milestone {
        #[command(subcommand)]
        milestone_cmd: MilestoneCommand,
    },
    /// Count projects by review status
    Summary,
}

#[derive(Subcommand)]
enum MilestoneCommand {
    /// Append a milestone to a project
    Add { project_id: i64, title: String },
    /// Flip a milestone between done and not done
    Toggle { project_id: i64, milestone_id: i64 },
}

fn parse_status(value: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(value)
        .ok_or_else(|| format!("unknown status `{value}`; expected Pending|Approved|Rejected"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let store = SqliteRecordStore::new(&conn);
    let projects = ProjectService::new(&store, MonotonicIdGenerator::new());

    match cli.command {
        Command::Init => {
            let report = init_db(&store)?;
            println!(
                "users seeded: {}, projects seeded: {}",
                report.users_seeded, report.projects_seeded
            );
        }
        Command::Login { email, password } => {
            match AuthService::new(&store).authenticate(&email, &password)? {
                Some(profile) => println!(
                    "#{} {} <{}> ({})",
                    profile.id,
                    profile.name,
                    profile.email,
                    profile.role.as_str()
                ),
                None => bail!("Invalid credentials"),
            }
        }
        Command::Projects { student } => {
            let list = match student {
                Some(student_id) => projects.list_projects_by_student(student_id)?,
                None => projects.list_all_projects()?,
            };
            if list.is_empty() {
                println!("No projects submitted yet.");
            }
            for project in &list {
                print_project_line(project);
            }
        }
        Command::Show { project_id } => match projects.get_project(project_id)? {
            Some(project) => print_project_detail(&project),
            None => bail!("project not found: {project_id}"),
        },
        Command::Submit {
            student,
            title,
            description,
            name,
        } => {
            let project = projects.create_project(&NewProject {
                title,
                description,
                student_id: student,
                student_name: name,
            })?;
            print_project_line(&project);
        }
        Command::Review {
            project_id,
            status,
            feedback,
        } => match projects.update_project_review(project_id, status, feedback)? {
            Some(project) => print_project_detail(&project),
            None => bail!("project not found: {project_id}"),
        },
        Command::Milestone { milestone_cmd } => {
            let updated = match milestone_cmd {
                MilestoneCommand::Add { project_id, title } => {
                    projects.add_milestone(project_id, &title)?
                }
                MilestoneCommand::Toggle {
                    project_id,
                    milestone_id,
                } => projects.toggle_milestone_done(project_id, milestone_id)?,
            };
            match updated {
                Some(project) => print_project_detail(&project),
                None => bail!("project or milestone not found"),
            }
        }
        Command::Summary => {
            let summary = projects.review_summary()?;
            println!(
                "total: {}, pending: {}, approved: {}, rejected: {}",
                summary.total, summary.pending, summary.approved, summary.rejected
            );
        }
    }

    Ok(())
}

fn print_project_line(project: &Project) {
    let (done, total) = project.milestone_progress();
    println!(
        "#{} [{}] {} by {} ({}/{} milestones)",
        project.id, project.status, project.title, project.student_name, done, total
    );
}

fn print_project_detail(project: &Project) {
    print_project_line(project);
    println!("  {}", project.description);
    if !project.feedback.is_empty() {
        println!("  feedback: {}", project.feedback);
    }
    if project.milestones.is_empty() {
        println!("  No milestones recorded.");
    }
    for milestone in &project.milestones {
        let mark = if milestone.completed { 'x' } else { ' ' };
        println!("  [{mark}] #{} {}", milestone.id, milestone.title);
    }
}
