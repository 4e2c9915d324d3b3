use serde::{Deserialize, Serialize};

use crate::core::db::model::parse_date;
use crate::core::error::ValidationError;

const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Health record kept per scout. Deleting a scout does not cascade here;
/// orphaned records are tolerated, as in the hosted schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub scout_id: i64,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMedicalRecord {
    pub scout_id: i64,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub notes: Option<String>,
}

impl NewMedicalRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.scout_id <= 0 {
            issues.push("scout_id", "must reference a scout");
        }
        if let Some(blood_type) = &self.blood_type {
            if !BLOOD_TYPES.contains(&blood_type.as_str()) {
                issues.push("blood_type", format!("unknown blood type: {blood_type}"));
            }
        }
        issues.into_result()
    }
}

/// Registration paperwork tracked per scout (health form, image consent,
/// annual registration and the like).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentationRecord {
    pub id: i64,
    pub scout_id: i64,
    pub document: String,
    pub delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<String>,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDocumentationRecord {
    pub scout_id: i64,
    pub document: String,
    pub delivered: bool,
    pub delivered_at: Option<String>,
}

impl NewDocumentationRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.scout_id <= 0 {
            issues.push("scout_id", "must reference a scout");
        }
        if self.document.trim().is_empty() {
            issues.push("document", "must not be empty");
        }
        if let Some(delivered_at) = &self.delivered_at {
            if parse_date(delivered_at).is_err() {
                issues.push("delivered_at", format!("not an ISO date: {delivered_at}"));
            }
        }
        issues.into_result()
    }
}

pub trait MedicalRepository {
    fn get_medical_records(
        &self,
        scout_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<MedicalRecord>>>;
    fn add_medical_record(
        &self,
        record: &NewMedicalRecord,
    ) -> impl Future<Output = anyhow::Result<MedicalRecord>>;
    fn delete_medical_record(
        &self,
        record: MedicalRecord,
    ) -> impl Future<Output = anyhow::Result<()>>;
}

pub trait DocumentationRepository {
    fn get_documentation_records(
        &self,
        scout_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<DocumentationRecord>>>;
    fn add_documentation_record(
        &self,
        record: &NewDocumentationRecord,
    ) -> impl Future<Output = anyhow::Result<DocumentationRecord>>;
    fn set_documentation_delivered(
        &self,
        record: &DocumentationRecord,
        delivered: bool,
        delivered_at: Option<String>,
    ) -> impl Future<Output = anyhow::Result<DocumentationRecord>>;
}
