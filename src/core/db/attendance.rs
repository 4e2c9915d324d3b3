use serde::{Deserialize, Serialize};

use crate::core::db::model::Section;
use crate::core::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub id: i64,
    pub scout_id: i64,
    pub activity_id: i64,
    pub present: bool,
    #[serde(default)]
    pub recorded_at: Option<String>,
    #[serde(skip)]
    pub(super) _guard: (),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAttendanceEntry {
    pub scout_id: i64,
    pub activity_id: i64,
    pub present: bool,
}

impl NewAttendanceEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = ValidationError::new();
        if self.scout_id <= 0 {
            issues.push("scout_id", "must reference a scout");
        }
        if self.activity_id <= 0 {
            issues.push("activity_id", "must reference an activity");
        }
        issues.into_result()
    }
}

/// One row per section from the `attendance_by_group` view; the local
/// backend computes the same aggregation from raw entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub section: Section,
    pub recorded: u64,
    pub present: u64,
    pub rate_percent: f64,
}

impl AttendanceSummary {
    pub fn rate(present: u64, recorded: u64) -> f64 {
        if recorded == 0 {
            return 0.0;
        }
        (present as f64 / recorded as f64 * 1000.0).round() / 10.0
    }
}

pub trait AttendanceRepository {
    fn get_attendance_for_activity(
        &self,
        activity_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<AttendanceEntry>>>;
    fn record_attendance(
        &self,
        entry: &NewAttendanceEntry,
    ) -> impl Future<Output = anyhow::Result<AttendanceEntry>>;
    /// Backed by the `attendance_by_group` view remotely; aggregated
    /// locally by joining entries to scouts through `scout_id`.
    fn get_attendance_by_group(
        &self,
    ) -> impl Future<Output = anyhow::Result<Vec<AttendanceSummary>>>;
}
