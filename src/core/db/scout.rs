use serde::{Deserialize, Serialize};

use crate::core::db::model::{MemberStatus, Section, parse_date};
use crate::core::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scout {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub birthdate: Option<String>,
    pub section: Section,
    pub status: MemberStatus,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewScout {
    pub name: String,
    pub birthdate: Option<String>,
    pub section: Section,
    pub status: MemberStatus,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub joined_at: Option<String>,
}

impl NewScout {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.name.trim().is_empty() {
            issues.push("name", "must not be empty");
        }
        if let Some(birthdate) = &self.birthdate {
            if parse_date(birthdate).is_err() {
                issues.push("birthdate", format!("not an ISO date: {birthdate}"));
            }
        }
        if let Some(joined_at) = &self.joined_at {
            if parse_date(joined_at).is_err() {
                issues.push("joined_at", format!("not an ISO date: {joined_at}"));
            }
        }
        if let Some(phone) = &self.guardian_phone {
            if phone.chars().filter(char::is_ascii_digit).count() < 8 {
                issues.push("guardian_phone", "expected at least 8 digits");
            }
        }
        issues.into_result()
    }
}

/// Partial update; `None` leaves a field untouched, the nested options
/// clear nullable columns when set to `Some(None)`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoutUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_phone: Option<Option<String>>,
}

impl ScoutUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                issues.push("name", "must not be empty");
            }
        }
        if let Some(Some(birthdate)) = &self.birthdate {
            if parse_date(birthdate).is_err() {
                issues.push("birthdate", format!("not an ISO date: {birthdate}"));
            }
        }
        issues.into_result()
    }
}

pub trait ScoutRepository {
    fn get_scouts(&self) -> impl Future<Output = anyhow::Result<Vec<Scout>>>;
    fn get_scouts_in_section(
        &self,
        section: Section,
    ) -> impl Future<Output = anyhow::Result<Vec<Scout>>>;
    fn get_scout_by_id(&self, id: i64) -> impl Future<Output = anyhow::Result<Option<Scout>>>;
    fn add_scout(&self, scout: &NewScout) -> impl Future<Output = anyhow::Result<Scout>>;
    fn update_scout(
        &self,
        scout: &Scout,
        update: &ScoutUpdate,
    ) -> impl Future<Output = anyhow::Result<Scout>>;
    fn delete_scout(&self, scout: Scout) -> impl Future<Output = anyhow::Result<()>>;
    /// Backed by the `inactive_members` view remotely; filtered locally.
    fn get_inactive_members(&self) -> impl Future<Output = anyhow::Result<Vec<Scout>>>;
}
