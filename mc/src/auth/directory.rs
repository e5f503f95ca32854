//! Mock user directory
//!
//! Credentials are matched on username and institution code only; the
//! password is accepted as-is.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Role, StudentProfile, User};

pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The seeded demo users: one admin, two counselors, one student
    pub fn seeded() -> Self {
        Self::new(seed_users())
    }

    /// Find the user matching the credentials
    pub fn authenticate(&self, username: &str, _password: &str, institution_code: &str) -> Option<User> {
        debug!(%username, %institution_code, "authenticate: called");
        let found = self
            .users
            .iter()
            .find(|u| u.username == username && u.institution_code == institution_code)
            .cloned();
        if found.is_none() {
            debug!(%username, "authenticate: no matching user");
        }
        found
    }

    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn all(&self) -> &[User] {
        &self.users
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &User> {
        self.users.iter().filter(move |u| u.role == role)
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

fn marks(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn seed_users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            username: "admin".to_string(),
            email: "admin@edumindcare.com".to_string(),
            role: Role::Admin,
            institution_code: "EDU001".to_string(),
            name: "Admin User".to_string(),
            usn: None,
            section: None,
            profile: None,
            specialization: None,
        },
        User {
            id: "counselor-1".to_string(),
            username: "counselor1".to_string(),
            email: "sarah.j@edumindcare.com".to_string(),
            role: Role::Counselor,
            institution_code: "EDU001".to_string(),
            name: "Dr. Sarah Johnson".to_string(),
            usn: None,
            section: None,
            profile: None,
            specialization: Some("Cognitive Behavioral Therapy".to_string()),
        },
        User {
            id: "counselor-2".to_string(),
            username: "counselor2".to_string(),
            email: "michael.c@edumindcare.com".to_string(),
            role: Role::Counselor,
            institution_code: "EDU001".to_string(),
            name: "Dr. Michael Chen".to_string(),
            usn: None,
            section: None,
            profile: None,
            specialization: Some("Stress Management".to_string()),
        },
        User {
            id: "3".to_string(),
            username: "student1".to_string(),
            email: "student1@edumindcare.com".to_string(),
            role: Role::Student,
            institution_code: "EDU001".to_string(),
            name: "John Doe".to_string(),
            usn: Some("CS001".to_string()),
            section: Some("A".to_string()),
            profile: Some(StudentProfile {
                internal_marks: marks(&[("Math", 85), ("Physics", 78), ("Chemistry", 92)]),
                quiz_marks: marks(&[("Math", 88), ("Physics", 82), ("Chemistry", 90)]),
                attendance: marks(&[("Math", 95), ("Physics", 88), ("Chemistry", 92)]),
                stress_level: 6,
            }),
            specialization: None,
        },
    ]
}
