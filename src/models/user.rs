use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::format_rfc3339;

/// Fixed role enumeration shared with the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Operator,
    Manager,
    Inspector,
    ProgramManager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "OPERATOR",
            Role::Manager => "MANAGER",
            Role::Inspector => "INSPECTOR",
            Role::ProgramManager => "PROGRAM_MANAGER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "MANAGER" => Role::Manager,
            "INSPECTOR" => Role::Inspector,
            "PROGRAM_MANAGER" => Role::ProgramManager,
            "ADMIN" => Role::Admin,
            _ => Role::Operator, // Default fallback
        }
    }
}

/// User identity as this service sees it: stable id, a role from the fixed
/// enumeration, optional org-unit membership, active flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_unit_id: Option<String>,
    pub active: bool,
    pub created_at: String, // ISO 8601 timestamp
}

impl User {
    pub fn new(name: String, email: String, role: Role, org_unit_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            role,
            org_unit_id,
            active: true,
            created_at: format_rfc3339(OffsetDateTime::now_utc()),
        }
    }
}

/// Organizational scope (a mill or site) used to resolve locally-scoped
/// recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnit {
    pub id: String,
    pub name: String,
    pub created_at: String, // ISO 8601 timestamp
}

impl OrgUnit {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            created_at: format_rfc3339(OffsetDateTime::now_utc()),
        }
    }
}

/// A user selected to be informed of an alert. Deduplicated by id within one
/// resolution; ordering carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub id: String,
    pub role: Role,
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
        }
    }
}
