//! User domain model.
//!
//! # Responsibility
//! - Define seeded user accounts and their role flag.
//! - Provide the password-free profile returned by authentication.
//!
//! # Invariants
//! - `email` is unique across the `users` collection.
//! - Users are created by seeding only and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Identifier shared by users and the `student_id` foreign key on projects.
pub type UserId = i64;

/// Role flag deciding which screens a user may drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Reviews projects and sets status/feedback.
    Admin,
    /// Owns projects and their milestones.
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }
}

/// Stored user record, including the plaintext demo password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl User {
    /// Returns whether `email` and `password` match this record exactly.
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }

    /// Strips the password, producing the shape safe to hand to callers.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// User record without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, User};

    fn sample() -> User {
        User {
            id: 7,
            name: "Sam".to_string(),
            email: "sam@school.edu".to_string(),
            password: "secret".to_string(),
            role: Role::Student,
        }
    }

    #[test]
    fn credentials_require_exact_match() {
        let user = sample();
        assert!(user.matches_credentials("sam@school.edu", "secret"));
        assert!(!user.matches_credentials("SAM@school.edu", "secret"));
        assert!(!user.matches_credentials("sam@school.edu", "secret "));
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains(r#""role":"student""#));
    }

    #[test]
    fn profile_serialization_has_no_password() {
        let json = serde_json::to_string(&sample().profile()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret"));
    }
}
