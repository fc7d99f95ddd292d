use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::attendance::AttendanceService;
use crate::model::attendance::{AttendanceRecord, AttendanceSummary, PunchAction};
use crate::store::StoreError;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PunchRequest {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "in")]
    pub action: PunchAction,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// First day to include (YYYY-MM-DD)
    #[param(value_type = Option<String>, example = "2026-01-01")]
    pub from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[param(value_type = Option<String>, example = "2026-01-31")]
    pub to: Option<NaiveDate>,
}

fn internal_error(e: StoreError) -> actix_web::Error {
    tracing::error!(error = %e, "Attendance store failure");
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// Punch in or out for today
#[utoipa::path(
    post,
    path = "/api/attendance/punch",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Punch recorded", body = AttendanceRecord),
        (status = 400, description = "Punch does not apply", body = Object, example = json!({
            "message": "Already punched in today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn punch(
    service: web::Data<AttendanceService>,
    payload: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id.trim();
    let employee_name = payload.employee_name.trim();

    if employee_id.is_empty() || employee_name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "employeeId and employeeName must not be empty"
        })));
    }

    let record = service
        .reconcile_punch(employee_id, employee_name, payload.action)
        .await
        .map_err(internal_error)?;

    match record {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => {
            let message = match payload.action {
                PunchAction::In => "Already punched in today",
                PunchAction::Out => "Not punched in yet",
            };
            Ok(HttpResponse::BadRequest().json(json!({ "message": message })))
        }
    }
}

/// All attendance records in insertion order
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, body = [AttendanceRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    service: web::Data<AttendanceService>,
) -> actix_web::Result<impl Responder> {
    let records = service.get_all().await.map_err(internal_error)?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, body = [AttendanceRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let records = service
        .get_for_employee(&employee_id)
        .await
        .map_err(internal_error)?;
    Ok(HttpResponse::Ok().json(records))
}

/// Today's record, open or closed
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}/today",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, body = AttendanceRecord),
        (status = 404, description = "No record today", body = Object, example = json!({
            "message": "No attendance record for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn today_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let record = service
        .get_today_for_employee(&employee_id)
        .await
        .map_err(internal_error)?;

    match record {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "No attendance record for today"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}/summary",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        SummaryQuery
    ),
    responses(
        (status = 200, body = AttendanceSummary),
        (status = 400, description = "from is after to"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let summary = service
        .summarize(&employee_id, query.from, query.to)
        .await
        .map_err(internal_error)?;

    match summary {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::BadRequest().json(json!({
            "message": "from must not be after to"
        }))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;

    use async_trait::async_trait;

    use super::*;
    use crate::attendance::time::ManualClock;
    use crate::routes;
    use crate::store::{AttendanceStore, MemoryAttendanceStore};

    /// Store whose every call fails like an unreachable database.
    struct UnavailableStore;

    #[async_trait]
    impl AttendanceStore for UnavailableStore {
        async fn get(&self, _id: &str) -> Result<Option<AttendanceRecord>, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn upsert(&self, _record: AttendanceRecord) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn query_by_employee_and_date(
            &self,
            _employee_id: &str,
            _date: NaiveDate,
        ) -> Result<Vec<AttendanceRecord>, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn for_employee(&self, _employee_id: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    fn service_at(instant: &str) -> (web::Data<AttendanceService>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at(instant));
        let service = AttendanceService::new(Arc::new(MemoryAttendanceStore::default()), clock.clone());
        (web::Data::new(service), clock)
    }

    fn punch_req(employee_id: &str, action: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/attendance/punch")
            .set_json(json!({
                "employeeId": employee_id,
                "employeeName": "Asha",
                "action": action
            }))
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data($service.clone())
                    .service(web::scope("/api").configure(routes::attendance_routes)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn punch_in_then_out_over_http() {
        let (service, clock) = service_at("2026-03-02 09:00");
        let app = app!(service);

        let resp = test::call_service(&app, punch_req("EMP-1", "in").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let opened: AttendanceRecord = test::read_body_json(resp).await;
        assert_eq!(opened.check_in.as_deref(), Some("09:00 AM"));

        clock.set("2026-03-02 17:30");
        let resp = test::call_service(&app, punch_req("EMP-1", "out").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], opened.id.as_str());
        assert_eq!(body["checkOut"], "05:30 PM");
        assert_eq!(body["totalHours"], "8h 30m");
    }

    #[actix_web::test]
    async fn double_punch_in_is_bad_request() {
        let (service, _) = service_at("2026-03-02 09:00");
        let app = app!(service);

        test::call_service(&app, punch_req("EMP-1", "in").to_request()).await;
        let resp = test::call_service(&app, punch_req("EMP-1", "in").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Already punched in today");
    }

    #[actix_web::test]
    async fn punch_out_first_is_bad_request() {
        let (service, _) = service_at("2026-03-02 09:00");
        let app = app!(service);

        let resp = test::call_service(&app, punch_req("EMP-1", "out").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Not punched in yet");
    }

    #[actix_web::test]
    async fn blank_employee_is_rejected() {
        let (service, _) = service_at("2026-03-02 09:00");
        let app = app!(service);

        let resp = test::call_service(&app, punch_req("  ", "in").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/attendance/punch")
            .set_json(json!({"employeeId": "EMP-1", "employeeName": "Asha", "action": "lunch"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn queries_list_and_filter_records() {
        let (service, _) = service_at("2026-03-02 09:00");
        let app = app!(service);
        test::call_service(&app, punch_req("EMP-1", "in").to_request()).await;
        test::call_service(&app, punch_req("EMP-2", "in").to_request()).await;

        let req = test::TestRequest::get().uri("/api/attendance").to_request();
        let all: Vec<AttendanceRecord> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].employee_id, "EMP-1");

        let req = test::TestRequest::get()
            .uri("/api/attendance/employee/EMP-2")
            .to_request();
        let mine: Vec<AttendanceRecord> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].employee_id, "EMP-2");
    }

    #[actix_web::test]
    async fn today_is_404_until_punched_in() {
        let (service, _) = service_at("2026-03-02 09:00");
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri("/api/attendance/employee/EMP-1/today")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        test::call_service(&app, punch_req("EMP-1", "in").to_request()).await;

        let req = test::TestRequest::get()
            .uri("/api/attendance/employee/EMP-1/today")
            .to_request();
        let record: AttendanceRecord = test::call_and_read_body_json(&app, req).await;
        assert!(record.is_open());
    }

    #[actix_web::test]
    async fn summary_rejects_inverted_range() {
        let (service, clock) = service_at("2026-03-02 09:00");
        let app = app!(service);
        test::call_service(&app, punch_req("EMP-1", "in").to_request()).await;
        clock.set("2026-03-02 10:15");
        test::call_service(&app, punch_req("EMP-1", "out").to_request()).await;

        let req = test::TestRequest::get()
            .uri("/api/attendance/employee/EMP-1/summary?from=2026-03-01&to=2026-03-31")
            .to_request();
        let summary: AttendanceSummary = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary.completed_sessions, 1);
        assert_eq!(summary.total_hours, "1h 15m");

        let req = test::TestRequest::get()
            .uri("/api/attendance/employee/EMP-1/summary?from=2026-03-31&to=2026-03-01")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    #[actix_web::test]
    async fn store_failure_is_internal_error() {
        let clock = Arc::new(ManualClock::at("2026-03-02 09:00"));
        let service = web::Data::new(AttendanceService::new(Arc::new(UnavailableStore), clock));
        let app = app!(service);

        let resp = test::call_service(&app, punch_req("EMP-1", "in").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let req = test::TestRequest::get().uri("/api/attendance").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
