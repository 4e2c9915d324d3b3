use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Editor,
    Viewer,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Editor, UserRole::Viewer];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Editor => "editor",
            UserRole::Viewer => "viewer",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown user role: {s}"))
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console account. The password travels as an opaque record field; this
/// layer performs no authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub active: bool,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSystemUser {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub active: bool,
}

impl NewSystemUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        let username = self.username.trim();
        if username.is_empty() {
            issues.push("username", "must not be empty");
        } else if username.contains(char::is_whitespace) {
            issues.push("username", "must not contain whitespace");
        }
        if self.password.len() < 6 {
            issues.push("password", "must be at least 6 characters");
        }
        issues.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub actor: String,
    pub action: String,
    #[serde(default)]
    pub detail: Option<String>,
    pub at: String,
    #[serde(skip)]
    pub(super) _guard: (),
}

/// Every user-management mutation records an audit entry; the repository
/// implementation takes care of that so callers cannot forget it.
pub trait UserRepository {
    fn get_users(&self) -> impl Future<Output = anyhow::Result<Vec<SystemUser>>>;
    fn get_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = anyhow::Result<Option<SystemUser>>>;
    fn add_user(
        &self,
        user: &NewSystemUser,
        actor: &str,
    ) -> impl Future<Output = anyhow::Result<SystemUser>>;
    fn update_user(
        &self,
        user: &SystemUser,
        update: &SystemUserUpdate,
        actor: &str,
    ) -> impl Future<Output = anyhow::Result<SystemUser>>;
    fn delete_user(
        &self,
        user: SystemUser,
        actor: &str,
    ) -> impl Future<Output = anyhow::Result<()>>;
}

pub trait AuditRepository {
    fn record_action(
        &self,
        actor: &str,
        action: &str,
        detail: Option<String>,
    ) -> impl Future<Output = anyhow::Result<AuditEntry>>;
    /// Newest first; `limit` caps the result when set.
    fn get_audit_entries(
        &self,
        limit: Option<usize>,
    ) -> impl Future<Output = anyhow::Result<Vec<AuditEntry>>>;
}
