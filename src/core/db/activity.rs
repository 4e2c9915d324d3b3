use serde::{Deserialize, Serialize};

use crate::core::db::model::{Section, parse_date};
use crate::core::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub location: Option<String>,
    /// `None` means the whole group takes part.
    #[serde(default)]
    pub section: Option<Section>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    pub title: String,
    pub date: String,
    pub location: Option<String>,
    pub section: Option<Section>,
    pub description: Option<String>,
}

impl NewActivity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.title.trim().is_empty() {
            issues.push("title", "must not be empty");
        }
        if parse_date(&self.date).is_err() {
            issues.push("date", format!("not an ISO date: {}", self.date));
        }
        issues.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Option<Section>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl ActivityUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                issues.push("title", "must not be empty");
            }
        }
        if let Some(date) = &self.date {
            if parse_date(date).is_err() {
                issues.push("date", format!("not an ISO date: {date}"));
            }
        }
        issues.into_result()
    }
}

pub trait ActivityRepository {
    fn get_activities(&self) -> impl Future<Output = anyhow::Result<Vec<Activity>>>;
    fn get_activity_by_id(&self, id: i64) -> impl Future<Output = anyhow::Result<Option<Activity>>>;
    fn add_activity(&self, activity: &NewActivity) -> impl Future<Output = anyhow::Result<Activity>>;
    fn update_activity(
        &self,
        activity: &Activity,
        update: &ActivityUpdate,
    ) -> impl Future<Output = anyhow::Result<Activity>>;
    fn delete_activity(&self, activity: Activity) -> impl Future<Output = anyhow::Result<()>>;
}
