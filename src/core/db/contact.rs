use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

/// Message submitted through the public site's contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub received_at: Option<String>,
    pub handled: bool,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub received_at: Option<String>,
    pub handled: bool,
}

impl NewContactMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.name.trim().is_empty() {
            issues.push("name", "must not be empty");
        }
        if !self.email.contains('@') {
            issues.push("email", format!("not an email address: {}", self.email));
        }
        if self.message.trim().is_empty() {
            issues.push("message", "must not be empty");
        }
        issues.into_result()
    }
}

pub trait ContactRepository {
    fn get_contact_messages(&self) -> impl Future<Output = anyhow::Result<Vec<ContactMessage>>>;
    fn add_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> impl Future<Output = anyhow::Result<ContactMessage>>;
    fn set_contact_handled(
        &self,
        message: &ContactMessage,
        handled: bool,
    ) -> impl Future<Output = anyhow::Result<ContactMessage>>;
    fn delete_contact_message(
        &self,
        message: ContactMessage,
    ) -> impl Future<Output = anyhow::Result<()>>;
}
