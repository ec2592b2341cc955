//! Default records inserted into an empty store.
//!
//! # Responsibility
//! - Provide the demo admin/student accounts and one sample project.
//! - Seed each collection only when it has never been written.
//!
//! # Invariants
//! - Seeding is idempotent: a second call never rewrites a collection.
//! - Seeded project owners reference the seeded student account.

use crate::model::project::{Milestone, Project, ProjectStatus};
use crate::model::user::{Role, User};
use crate::store::{Collection, RecordStore, StoreResult};
use log::info;

/// Collections written by one `init_db` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users_seeded: bool,
    pub projects_seeded: bool,
}

/// Seeds missing collections with default records.
pub fn init_db<S: RecordStore>(store: &S) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();

    if !store.contains(Collection::Users)? {
        store.save(Collection::Users, &default_users())?;
        report.users_seeded = true;
    }
    if !store.contains(Collection::Projects)? {
        store.save(Collection::Projects, &default_projects())?;
        report.projects_seeded = true;
    }

    info!(
        "event=db_seed module=seed status=ok users_seeded={} projects_seeded={}",
        report.users_seeded, report.projects_seeded
    );
    Ok(report)
}

/// Demo accounts. Passwords are plaintext and suitable for demos only.
pub fn default_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Admin User".to_string(),
            email: "admin@school.edu".to_string(),
            password: "password".to_string(),
            role: Role::Admin,
        },
        User {
            id: 2,
            name: "Student One".to_string(),
            email: "student1@school.edu".to_string(),
            password: "password".to_string(),
            role: Role::Student,
        },
    ]
}

pub fn default_projects() -> Vec<Project> {
    vec![Project {
        id: 1,
        student_id: 2,
        student_name: "Student One".to_string(),
        title: "E-Commerce Platform".to_string(),
        description: "A full-stack e-commerce project with cart and checkout functionalities \
                      built using React and Node.js."
            .to_string(),
        status: ProjectStatus::Pending,
        feedback: String::new(),
        milestones: vec![
            Milestone {
                id: 1,
                title: "Project Setup & Design".to_string(),
                completed: true,
            },
            Milestone {
                id: 2,
                title: "Backend CRUD API".to_string(),
                completed: true,
            },
            Milestone {
                id: 3,
                title: "Frontend Integration".to_string(),
                completed: false,
            },
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::{default_projects, default_users, init_db};
    use crate::model::user::Role;
    use crate::store::{Collection, MemoryRecordStore, RecordStore};

    #[test]
    fn seeded_projects_belong_to_seeded_students() {
        let users = default_users();
        for project in default_projects() {
            let owner = users
                .iter()
                .find(|user| user.id == project.student_id)
                .expect("owner should be seeded");
            assert_eq!(owner.role, Role::Student);
            assert_eq!(owner.name, project.student_name);
        }
    }

    #[test]
    fn init_db_only_fills_missing_collections() {
        let store = MemoryRecordStore::new();
        store.save::<u8>(Collection::Projects, &[]).unwrap();

        let report = init_db(&store).unwrap();
        assert!(report.users_seeded);
        assert!(!report.projects_seeded);

        let projects: Vec<u8> = store.load(Collection::Projects).unwrap();
        assert!(projects.is_empty());
    }
}
