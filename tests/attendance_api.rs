#[path = "common/mod.rs"]
mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, dec, error_kind};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

async fn record(app: &TestApp, employee_id: &str, date: &str, status: &str, times: Option<(&str, &str)>) -> (StatusCode, Value) {
    let mut payload = json!({
        "employeeId": employee_id,
        "date": date,
        "status": status,
    });
    if let Some((inn, out)) = times {
        payload["inTime"] = json!(inn);
        payload["outTime"] = json!(out);
    }
    app.admin(Method::POST, "/api/v1/attendance", Some(payload)).await
}

#[tokio::test]
async fn hours_and_overtime_are_derived_on_create() {
    let app = TestApp::new();
    let employee_id = app.create_employee("ATT-001", 26000).await;

    let (status, body) = record(&app, &employee_id, "2025-03-03", "Present", Some(("09:00", "18:30"))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(dec(&body["hours"]), dec!(9.5));
    assert_eq!(dec(&body["overtime"]), dec!(1.5));

    let (status, body) = record(&app, &employee_id, "2025-03-04", "Absent", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dec(&body["hours"]), dec!(0));
}

#[tokio::test]
async fn one_record_per_employee_and_day() {
    let app = TestApp::new();
    let employee_id = app.create_employee("ATT-002", 26000).await;

    let (status, _) = record(&app, &employee_id, "2025-03-03", "Present", Some(("09:00", "17:00"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = record(&app, &employee_id, "2025-03-03", "Half Day", Some(("09:00", "13:00"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "conflict");
}

#[tokio::test]
async fn malformed_times_are_rejected_not_zeroed() {
    let app = TestApp::new();
    let employee_id = app.create_employee("ATT-003", 26000).await;

    let (status, body) = record(&app, &employee_id, "2025-03-03", "Present", Some(("nine", "17:00"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&body), "validation_error");

    let (_, listed) = app
        .admin(Method::GET, &format!("/api/v1/attendance?employeeId={employee_id}"), None)
        .await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn updating_times_rederives_hours() {
    let app = TestApp::new();
    let employee_id = app.create_employee("ATT-004", 26000).await;
    let (_, created) = record(&app, &employee_id, "2025-03-05", "Present", Some(("09:00", "17:00"))).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .admin(
            Method::PUT,
            &format!("/api/v1/attendance/{id}"),
            Some(json!({ "outTime": "20:00" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(dec(&body["hours"]), dec!(11));
    assert_eq!(dec(&body["overtime"]), dec!(3));
}

#[tokio::test]
async fn generation_aggregates_attendance_and_is_idempotent() {
    let app = TestApp::new();
    let employee_id = app.create_employee("GEN-001", 26000).await;

    record(&app, &employee_id, "2025-03-03", "Present", Some(("09:00", "17:00"))).await;
    record(&app, &employee_id, "2025-03-04", "Present", Some(("09:00", "17:00"))).await;
    record(&app, &employee_id, "2025-03-05", "Present", Some(("09:00", "19:00"))).await;
    record(&app, &employee_id, "2025-03-06", "Half Day", Some(("09:00", "13:00"))).await;
    record(&app, &employee_id, "2025-03-07", "Absent", None).await;
    // outside the period
    record(&app, &employee_id, "2025-04-01", "Present", Some(("09:00", "17:00"))).await;

    let request = json!({ "month": 3, "year": 2025 });
    let (status, first) = app
        .admin(Method::POST, "/api/v1/payroll/generate-from-attendance", Some(request.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert!(first["failed"].as_array().unwrap().is_empty());
    let created = &first["created"][0];
    // 3.5 days * 1000 + 2h * 125 * 1.5
    assert_eq!(dec(&created["presentDays"]), dec!(3.5));
    assert_eq!(dec(&created["overtimeHours"]), dec!(2));
    assert_eq!(dec(&created["netSalary"]), dec!(3875));

    let (_, second) = app
        .admin(Method::POST, "/api/v1/payroll/generate-from-attendance", Some(request))
        .await;
    assert_eq!(second["created"][0]["id"], created["id"]);
    assert_eq!(dec(&second["created"][0]["netSalary"]), dec!(3875));

    let (_, listed) = app
        .admin(
            Method::GET,
            &format!("/api/v1/payroll?employeeId={employee_id}&month=3&year=2025"),
            None,
        )
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn regeneration_keeps_manual_bonus_and_deductions() {
    let app = TestApp::new();
    let employee_id = app.create_employee("GEN-002", 26000).await;
    record(&app, &employee_id, "2025-05-05", "Present", Some(("09:00", "17:00"))).await;

    let request = json!({ "month": 5, "year": 2025 });
    let (_, first) = app
        .admin(Method::POST, "/api/v1/payroll/generate-from-attendance", Some(request.clone()))
        .await;
    let id = first["created"][0]["id"].as_str().unwrap().to_string();

    app.admin(
        Method::PUT,
        &format!("/api/v1/payroll/{id}"),
        Some(json!({ "bonus": 500, "deductions": 100 })),
    )
    .await;

    let (_, second) = app
        .admin(Method::POST, "/api/v1/payroll/generate-from-attendance", Some(request))
        .await;
    assert_eq!(dec(&second["created"][0]["netSalary"]), dec!(1400));
}

#[tokio::test]
async fn generation_isolates_per_employee_failures() {
    let app = TestApp::new();
    let good = app.create_employee("GEN-003", 26000).await;
    let unpaid_salary = app.create_employee("GEN-004", 0).await;
    let already_paid = app.create_employee("GEN-005", 26000).await;

    for id in [&good, &unpaid_salary, &already_paid] {
        record(&app, id, "2025-06-02", "Present", Some(("09:00", "17:00"))).await;
    }

    let (_, paid) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({
                "employeeId": already_paid,
                "month": 6,
                "year": 2025,
                "presentDays": 1,
            })),
        )
        .await;
    let paid_id = paid["id"].as_str().unwrap();
    let (status, _) = app
        .admin(Method::PATCH, &format!("/api/v1/payroll/{paid_id}/mark-paid"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .admin(
            Method::POST,
            "/api/v1/payroll/generate-from-attendance",
            Some(json!({ "month": 6, "year": 2025 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let created = body["created"].as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["employeeId"], good.as_str());

    let failed = body["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 2);
    let failed_ids: Vec<&str> = failed
        .iter()
        .map(|f| f["employeeId"].as_str().unwrap())
        .collect();
    assert!(failed_ids.contains(&unpaid_salary.as_str()));
    assert!(failed_ids.contains(&already_paid.as_str()));

    let paid_failure = failed
        .iter()
        .find(|f| f["employeeId"] == already_paid.as_str())
        .unwrap();
    assert!(paid_failure["error"].as_str().unwrap().contains("already paid"));
}

#[tokio::test]
async fn generation_respects_branch_filter() {
    let app = TestApp::new();
    let employee_id = app.create_employee("GEN-006", 26000).await;
    record(&app, &employee_id, "2025-07-01", "Present", Some(("09:00", "17:00"))).await;

    let (status, body) = app
        .admin(
            Method::POST,
            "/api/v1/payroll/generate-from-attendance",
            Some(json!({ "month": 7, "year": 2025, "branchId": "elsewhere" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["created"].as_array().unwrap().is_empty());
    assert!(body["failed"].as_array().unwrap().is_empty());
}
