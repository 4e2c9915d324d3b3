use serde::{Deserialize, Serialize};

use crate::core::db::model::parse_date;
use crate::core::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNewsPost {
    pub title: String,
    pub body: String,
    pub published_at: Option<String>,
}

impl NewNewsPost {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.title.trim().is_empty() {
            issues.push("title", "must not be empty");
        }
        if self.body.trim().is_empty() {
            issues.push("body", "must not be empty");
        }
        if let Some(published_at) = &self.published_at {
            if parse_date(published_at).is_err() {
                issues.push("published_at", format!("not an ISO date: {published_at}"));
            }
        }
        issues.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsPostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Option<String>>,
}

pub trait NewsRepository {
    /// Newest first when a publication date is present.
    fn get_news(&self) -> impl Future<Output = anyhow::Result<Vec<NewsPost>>>;
    fn add_news(&self, post: &NewNewsPost) -> impl Future<Output = anyhow::Result<NewsPost>>;
    fn update_news(
        &self,
        post: &NewsPost,
        update: &NewsPostUpdate,
    ) -> impl Future<Output = anyhow::Result<NewsPost>>;
    fn delete_news(&self, post: NewsPost) -> impl Future<Output = anyhow::Result<()>>;
}
