#[path = "common/mod.rs"]
mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, error_kind};
use serde_json::{Value, json};
use uuid::Uuid;

fn quotation(grand_total: i64) -> Value {
    json!({
        "quotationId": Uuid::new_v4(),
        "vendorId": Uuid::new_v4(),
        "vendorName": format!("Vendor {grand_total}"),
        "ratePerUnit": grand_total / 100,
        "totalAmount": grand_total,
        "grandTotal": grand_total,
        "deliveryTime": "7 days",
        "paymentTerms": "Net 30",
    })
}

async fn create_comparison(app: &TestApp, totals: &[i64]) -> Value {
    let quotations: Vec<Value> = totals.iter().copied().map(quotation).collect();
    let (status, body) = app
        .clerk(
            Method::POST,
            "/api/v1/quotations/comparison",
            Some(json!({
                "purchaseRequestId": Uuid::new_v4(),
                "materialName": "Portland cement",
                "quantity": 100,
                "unit": "bags",
                "quotations": quotations,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn quotation_id(comparison: &Value, index: usize) -> String {
    comparison["quotations"][index]["quotationId"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn new_comparison_is_an_unselected_draft() {
    let app = TestApp::new();
    let comparison = create_comparison(&app, &[50000, 120000]).await;

    assert_eq!(comparison["status"], "Draft");
    assert_eq!(comparison["requiresAdminApproval"], false);
    assert_eq!(comparison["comparedBy"], "Carl Clerk");
    assert!(
        comparison["quotations"]
            .as_array()
            .unwrap()
            .iter()
            .all(|q| q["isSelected"] == false)
    );
}

#[tokio::test]
async fn selection_recomputes_admin_approval_and_keeps_one_selected() {
    let app = TestApp::new();
    let comparison = create_comparison(&app, &[50000, 120000]).await;
    let id = comparison["id"].as_str().unwrap();
    let uri = format!("/api/v1/quotations/comparison/{id}/select");

    let (status, body) = app
        .clerk(
            Method::PUT,
            &uri,
            Some(json!({ "quotationId": quotation_id(&comparison, 1), "reason": "fastest delivery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["requiresAdminApproval"], true);
    assert_eq!(body["status"], "Under Review");
    assert_eq!(body["selectedVendorId"], comparison["quotations"][1]["vendorId"]);

    let (status, body) = app
        .clerk(
            Method::PUT,
            &uri,
            Some(json!({ "quotationId": quotation_id(&comparison, 0), "reason": "cheapest" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requiresAdminApproval"], false);
    let selected: Vec<&Value> = body["quotations"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|q| q["isSelected"] == true)
        .collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["quotationId"], comparison["quotations"][0]["quotationId"]);
}

#[tokio::test]
async fn threshold_equality_does_not_need_admin() {
    let app = TestApp::new();
    let comparison = create_comparison(&app, &[100000]).await;
    let id = comparison["id"].as_str().unwrap();

    let (_, body) = app
        .clerk(
            Method::PUT,
            &format!("/api/v1/quotations/comparison/{id}/select"),
            Some(json!({ "quotationId": quotation_id(&comparison, 0) })),
        )
        .await;
    assert_eq!(body["requiresAdminApproval"], false);
}

#[tokio::test]
async fn selecting_an_unknown_quotation_is_not_found() {
    let app = TestApp::new();
    let comparison = create_comparison(&app, &[50000]).await;
    let id = comparison["id"].as_str().unwrap();

    let (status, body) = app
        .clerk(
            Method::PUT,
            &format!("/api/v1/quotations/comparison/{id}/select"),
            Some(json!({ "quotationId": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_kind(&body), "not_found");
}

#[tokio::test]
async fn deciding_before_selection_is_invalid_state() {
    let app = TestApp::new();
    let comparison = create_comparison(&app, &[50000]).await;
    let id = comparison["id"].as_str().unwrap();

    let (status, body) = app
        .admin(
            Method::PUT,
            &format!("/api/v1/quotations/comparison/{id}/approve-reject"),
            Some(json!({ "decision": "Approved" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "invalid_state");
}

#[tokio::test]
async fn high_value_selection_needs_an_admin_decision() {
    let app = TestApp::new();
    let comparison = create_comparison(&app, &[120000]).await;
    let id = comparison["id"].as_str().unwrap();
    app.clerk(
        Method::PUT,
        &format!("/api/v1/quotations/comparison/{id}/select"),
        Some(json!({ "quotationId": quotation_id(&comparison, 0) })),
    )
    .await;

    let decide = format!("/api/v1/quotations/comparison/{id}/approve-reject");
    let (status, body) = app
        .clerk(Method::PUT, &decide, Some(json!({ "decision": "Approved" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_kind(&body), "forbidden");

    let (status, body) = app
        .admin(
            Method::PUT,
            &decide,
            Some(json!({ "decision": "Approved", "remarks": "within budget" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "Approved");
    assert_eq!(body["approvedBy"], "Asha Admin");
    assert_eq!(body["approvalRemarks"], "within budget");
    assert!(body["approvalDate"].is_string());

    // terminal
    let (status, body) = app
        .admin(Method::PUT, &decide, Some(json!({ "decision": "Rejected" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "invalid_state");

    let (status, _) = app
        .admin(
            Method::PUT,
            &format!("/api/v1/quotations/comparison/{id}/select"),
            Some(json!({ "quotationId": quotation_id(&comparison, 0) })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn low_value_decision_records_an_audit_trail_for_anyone() {
    let app = TestApp::new();
    let comparison = create_comparison(&app, &[20000]).await;
    let id = comparison["id"].as_str().unwrap();
    app.clerk(
        Method::PUT,
        &format!("/api/v1/quotations/comparison/{id}/select"),
        Some(json!({ "quotationId": quotation_id(&comparison, 0) })),
    )
    .await;

    let (status, body) = app
        .clerk(
            Method::PUT,
            &format!("/api/v1/quotations/comparison/{id}/approve-reject"),
            Some(json!({ "decision": "Rejected", "approver": "Site Manager", "remarks": "re-quote" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "Rejected");
    assert_eq!(body["approvedBy"], "Site Manager");
}

#[tokio::test]
async fn quotations_can_be_appended_only_while_draft() {
    let app = TestApp::new();
    let comparison = create_comparison(&app, &[]).await;
    let id = comparison["id"].as_str().unwrap();
    let append = format!("/api/v1/quotations/comparison/{id}/quotations");

    let (status, body) = app.clerk(Method::POST, &append, Some(quotation(40000))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["quotations"].as_array().unwrap().len(), 1);

    app.clerk(
        Method::PUT,
        &format!("/api/v1/quotations/comparison/{id}/select"),
        Some(json!({ "quotationId": quotation_id(&body, 0) })),
    )
    .await;

    let (status, body) = app.clerk(Method::POST, &append, Some(quotation(30000))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "invalid_state");
}

#[tokio::test]
async fn comparisons_can_be_listed_by_status() {
    let app = TestApp::new();
    let draft = create_comparison(&app, &[10000]).await;
    let reviewed = create_comparison(&app, &[15000]).await;
    let reviewed_id = reviewed["id"].as_str().unwrap();
    app.clerk(
        Method::PUT,
        &format!("/api/v1/quotations/comparison/{reviewed_id}/select"),
        Some(json!({ "quotationId": quotation_id(&reviewed, 0) })),
    )
    .await;

    let (status, body) = app
        .clerk(Method::GET, "/api/v1/quotations/comparison?status=Draft", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], draft["id"]);

    let (_, body) = app
        .clerk(Method::GET, "/api/v1/quotations/comparison?status=Under%20Review", None)
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_comparison_number_conflicts() {
    let app = TestApp::new();
    let payload = json!({
        "comparisonNumber": "QC-CEMENT-001",
        "purchaseRequestId": Uuid::new_v4(),
        "materialName": "Portland cement",
        "quantity": 50,
        "unit": "bags",
    });

    let (status, _) = app
        .clerk(Method::POST, "/api/v1/quotations/comparison", Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .clerk(Method::POST, "/api/v1/quotations/comparison", Some(payload))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_kind(&body), "conflict");
}

#[tokio::test]
async fn comparisons_require_a_token() {
    let app = TestApp::new();
    let (status, _) = app
        .send(Method::GET, "/api/v1/quotations/comparison", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
