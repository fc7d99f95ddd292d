use crate::api::attendance::PunchRequest;
use crate::model::attendance::{AttendanceRecord, AttendanceSummary, PunchAction};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Punchclock Attendance API",
        version = "0.1.0",
        description = r#"
## Shop-floor attendance

Daily punch-in / punch-out tracking for print-shop staff.

### 🔹 Key Features
- **Punching**
  - One open record per employee per day; punch-out closes it and computes worked hours
- **Queries**
  - All records, one employee's records, today's record
- **Summaries**
  - Days present and hours worked over a date range

### 📦 Response Format
- JSON, camelCase fields
- Times are 12-hour `HH:MM AM/PM`, dates `YYYY-MM-DD` in server local time

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::punch,
        crate::api::attendance::list_attendance,
        crate::api::attendance::employee_attendance,
        crate::api::attendance::today_attendance,
        crate::api::attendance::attendance_summary
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceSummary,
            PunchAction,
            PunchRequest
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance punch and query APIs"),
    )
)]
pub struct ApiDoc;
