#[path = "common/mod.rs"]
mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, dec, error_kind};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/v1/payroll", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(&body), "unauthorized");

    let (status, _) = app
        .send(Method::GET, "/api/v1/payroll", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_attendance_pays_the_base_salary() {
    let app = TestApp::new();
    let employee_id = app.create_employee("EMP-001", 26000).await;

    let (status, body) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({
                "employeeId": employee_id,
                "month": 3,
                "year": 2025,
                "presentDays": 26,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(dec(&body["netSalary"]), dec!(26000));
    assert_eq!(body["totalWorkingDays"], 26);
    assert_eq!(dec(&body["overtimeRateMultiplier"]), dec!(1.5));
    assert_eq!(body["isPaid"], false);
}

#[tokio::test]
async fn net_salary_combines_overtime_bonus_and_deductions() {
    let app = TestApp::new();
    let employee_id = app.create_employee("EMP-002", 1).await;

    let (status, body) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({
                "employeeId": employee_id,
                "month": 4,
                "year": 2025,
                "baseSalary": 26000,
                "totalWorkingDays": 26,
                "presentDays": 20,
                "overtimeHours": 10,
                "overtimeRateMultiplier": 1.5,
                "bonus": 500,
                "deductions": 200,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(dec(&body["netSalary"]), dec!(22175));
}

#[tokio::test]
async fn duplicate_period_is_a_conflict() {
    let app = TestApp::new();
    let employee_id = app.create_employee("EMP-003", 26000).await;
    let payload = json!({
        "employeeId": employee_id,
        "month": 5,
        "year": 2025,
        "presentDays": 24,
    });

    let (status, _) = app
        .admin(Method::POST, "/api/v1/payroll", Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.admin(Method::POST, "/api/v1/payroll", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "conflict");
}

#[tokio::test]
async fn invalid_inputs_are_rejected_before_persisting() {
    let app = TestApp::new();
    let employee_id = app.create_employee("EMP-004", 26000).await;

    for payload in [
        json!({ "employeeId": employee_id, "month": 6, "year": 2025, "presentDays": 10, "baseSalary": 0 }),
        json!({ "employeeId": employee_id, "month": 6, "year": 2025, "presentDays": -1 }),
        json!({ "employeeId": employee_id, "month": 13, "year": 2025, "presentDays": 10 }),
    ] {
        let (status, body) = app.admin(Method::POST, "/api/v1/payroll", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error_kind(&body), "validation_error");
    }

    let (status, body) = app
        .admin(
            Method::GET,
            &format!("/api/v1/payroll?employeeId={employee_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_amounts_are_a_validation_error() {
    let app = TestApp::new();
    let employee_id = app.create_employee("EMP-009", 26000).await;

    let (status, body) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({
                "employeeId": employee_id,
                "month": 6,
                "year": 2025,
                "presentDays": 1000,
                "baseSalary": "79228162514264337593543950335",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(error_kind(&body), "validation_error");

    let (status, created) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({ "employeeId": employee_id, "month": 6, "year": 2025, "presentDays": 26 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let uri = format!("/api/v1/payroll/{}", created["id"].as_str().unwrap());

    for update in [
        json!({ "bonus": "1000000000000" }),
        json!({ "deductions": "12.345" }),
    ] {
        let (status, body) = app.admin(Method::PUT, &uri, Some(update)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error_kind(&body), "validation_error");
    }

    let (_, fetched) = app.admin(Method::GET, &uri, None).await;
    assert_eq!(dec(&fetched["netSalary"]), dec!(26000));
    assert_eq!(dec(&fetched["bonus"]), dec!(0));
}

#[tokio::test]
async fn unknown_employee_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({
                "employeeId": Uuid::new_v4(),
                "month": 1,
                "year": 2025,
                "presentDays": 10,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&body), "not_found");
}

#[tokio::test]
async fn editing_inputs_recomputes_net_salary() {
    let app = TestApp::new();
    let employee_id = app.create_employee("EMP-005", 26000).await;
    let (_, created) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({
                "employeeId": employee_id,
                "month": 7,
                "year": 2025,
                "presentDays": 26,
            })),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .admin(
            Method::PUT,
            &format!("/api/v1/payroll/{id}"),
            Some(json!({ "presentDays": 20, "bonus": 1000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(dec(&body["netSalary"]), dec!(21000));

    let (_, fetched) = app
        .admin(Method::GET, &format!("/api/v1/payroll/{id}"), None)
        .await;
    assert_eq!(dec(&fetched["netSalary"]), dec!(21000));
}

#[tokio::test]
async fn mark_paid_is_one_way_and_locks_the_record() {
    let app = TestApp::new();
    let employee_id = app.create_employee("EMP-006", 26000).await;
    let (_, created) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({
                "employeeId": employee_id,
                "month": 8,
                "year": 2025,
                "presentDays": 26,
            })),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, paid) = app
        .admin(Method::PATCH, &format!("/api/v1/payroll/{id}/mark-paid"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["isPaid"], true);
    assert!(paid["paidDate"].is_string());

    let (status, body) = app
        .admin(Method::PATCH, &format!("/api/v1/payroll/{id}/mark-paid"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "conflict");

    let (status, _) = app
        .admin(
            Method::PUT,
            &format!("/api/v1/payroll/{id}"),
            Some(json!({ "bonus": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .admin(Method::DELETE, &format!("/api/v1/payroll/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unpaid_records_can_be_deleted() {
    let app = TestApp::new();
    let employee_id = app.create_employee("EMP-007", 26000).await;
    let (_, created) = app
        .admin(
            Method::POST,
            "/api/v1/payroll",
            Some(json!({
                "employeeId": employee_id,
                "month": 9,
                "year": 2025,
                "presentDays": 26,
            })),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = app
        .admin(Method::DELETE, &format!("/api/v1/payroll/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .admin(Method::GET, &format!("/api/v1/payroll/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_expose_payroll_defaults() {
    let app = TestApp::new();
    let (status, body) = app.clerk(Method::GET, "/api/v1/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payroll"]["totalWorkingDays"], 26);
    assert_eq!(dec(&body["procurement"]["valueThreshold"]), dec!(100000));
}
