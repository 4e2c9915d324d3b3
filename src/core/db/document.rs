use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Formularios,
    Atas,
    Regulamentos,
    Outros,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 4] = [
        DocumentCategory::Formularios,
        DocumentCategory::Atas,
        DocumentCategory::Regulamentos,
        DocumentCategory::Outros,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentCategory::Formularios => "formularios",
            DocumentCategory::Atas => "atas",
            DocumentCategory::Regulamentos => "regulamentos",
            DocumentCategory::Outros => "outros",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentCategory::Formularios => "Formulários",
            DocumentCategory::Atas => "Atas",
            DocumentCategory::Regulamentos => "Regulamentos",
            DocumentCategory::Outros => "Outros",
        }
    }
}

impl std::str::FromStr for DocumentCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown document category: {s}"))
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Registry entry pointing at an externally hosted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: i64,
    pub title: String,
    pub category: DocumentCategory,
    pub url: String,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDocumentEntry {
    pub title: String,
    pub category: DocumentCategory,
    pub url: String,
}

impl NewDocumentEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.title.trim().is_empty() {
            issues.push("title", "must not be empty");
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            issues.push("url", format!("not an http(s) url: {}", self.url));
        }
        issues.into_result()
    }
}

pub trait DocumentRepository {
    fn get_documents(&self) -> impl Future<Output = anyhow::Result<Vec<DocumentEntry>>>;
    fn get_documents_in_category(
        &self,
        category: DocumentCategory,
    ) -> impl Future<Output = anyhow::Result<Vec<DocumentEntry>>>;
    fn add_document(
        &self,
        document: &NewDocumentEntry,
    ) -> impl Future<Output = anyhow::Result<DocumentEntry>>;
    fn delete_document(&self, document: DocumentEntry) -> impl Future<Output = anyhow::Result<()>>;
}
