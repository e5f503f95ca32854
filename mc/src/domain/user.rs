//! User reference data
//!
//! Users are read-only to the coordination core. Student and counselor
//! specific fields are optional.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Admin,
    Counselor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Admin => write!(f, "admin"),
            Self::Counselor => write!(f, "counselor"),
        }
    }
}

/// Academic snapshot shown on the student dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub internal_marks: BTreeMap<String, u32>,
    pub quiz_marks: BTreeMap<String, u32>,
    pub attendance: BTreeMap<String, u32>,
    pub stress_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub institution_code: String,
    pub name: String,

    // Student specific
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<StudentProfile>,

    // Counselor specific
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_counselor(&self) -> bool {
        self.role == Role::Counselor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_json_skips_absent_fields() {
        let user = User {
            id: "1".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
            institution_code: "EDU001".to_string(),
            name: "Admin User".to_string(),
            usn: None,
            section: None,
            profile: None,
            specialization: None,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"institutionCode\":\"EDU001\""));
        assert!(json.contains("\"role\":\"admin\""));
        assert!(!json.contains("usn"));

        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
