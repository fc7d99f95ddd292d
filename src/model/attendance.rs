use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::attendance::time::total_hours;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "0b6c1a52-5c1e-4a8e-9f2e-6f1f3d0e9a11",
        "employeeId": "EMP-001",
        "employeeName": "John Doe",
        "date": "2026-01-05",
        "checkIn": "09:00 AM",
        "checkOut": "05:30 PM",
        "totalHours": "8h 30m"
    })
)]
pub struct AttendanceRecord {
    pub id: String,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    /// Copied when the record is created, not kept in sync with renames
    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "09:00 AM", nullable = true)]
    pub check_in: Option<String>,

    #[schema(example = "05:30 PM", nullable = true)]
    pub check_out: Option<String>,

    #[schema(example = "8h 30m", nullable = true)]
    pub total_hours: Option<String>,
}

impl AttendanceRecord {
    /// New record for a punch-in
    pub fn open(employee_id: &str, employee_name: &str, date: NaiveDate, check_in: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            employee_name: employee_name.to_string(),
            date,
            check_in: Some(check_in),
            check_out: None,
            total_hours: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }

    /// Sets the check-out time and derives `total_hours` from both ends.
    pub fn close(&mut self, check_out: String) {
        self.total_hours = Some(total_hours(
            self.date,
            self.check_in.as_deref().unwrap_or_default(),
            &check_out,
        ));
        self.check_out = Some(check_out);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PunchAction {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2026-01-01", value_type = Option<String>, format = "date")]
    pub from: Option<NaiveDate>,

    #[schema(example = "2026-01-31", value_type = Option<String>, format = "date")]
    pub to: Option<NaiveDate>,

    /// Distinct dates with at least one check-in
    #[schema(example = 21)]
    pub days_present: usize,

    #[schema(example = 21)]
    pub completed_sessions: usize,

    #[schema(example = 0)]
    pub open_sessions: usize,

    #[schema(example = 10140)]
    pub total_minutes: i64,

    #[schema(example = "169h 0m")]
    pub total_hours: String,
}
