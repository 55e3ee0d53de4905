use crate::{auth::AuthUser, config::Settings, state::AppState};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// HTML landing page with the route map
pub async fn root_handler() -> impl IntoResponse {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>Back-office API</title>
  <style>
    body { font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; padding: 40px 20px; }
    .container { max-width: 760px; margin: 0 auto; }
    h1 { color: #38bdf8; }
    h4 { color: #64748b; text-transform: uppercase; letter-spacing: 0.1em; margin: 24px 0 8px; }
    code { display: block; padding: 4px 0; color: #e2e8f0; }
    a { color: #38bdf8; }
  </style>
</head>
<body>
<div class="container">
  <h1>Back-office API</h1>
  <p>Payroll, attendance and procurement approvals. <a href="/docs">Swagger UI</a> · <a href="/health">Health</a></p>

  <h4>Employees</h4>
  <code>GET | POST /api/v1/employees</code>
  <code>GET | PUT | DELETE /api/v1/employees/:id</code>

  <h4>Attendance</h4>
  <code>GET | POST /api/v1/attendance</code>
  <code>GET | PUT | DELETE /api/v1/attendance/:id</code>

  <h4>Payroll</h4>
  <code>GET | POST /api/v1/payroll</code>
  <code>GET | PUT | DELETE /api/v1/payroll/:id</code>
  <code>PATCH /api/v1/payroll/:id/mark-paid</code>
  <code>POST /api/v1/payroll/generate-from-attendance</code>

  <h4>Procurement</h4>
  <code>GET | POST /api/v1/quotations/comparison</code>
  <code>GET /api/v1/quotations/comparison/:id</code>
  <code>POST /api/v1/quotations/comparison/:id/quotations</code>
  <code>PUT /api/v1/quotations/comparison/:id/select</code>
  <code>PUT /api/v1/quotations/comparison/:id/approve-reject</code>

  <h4>Settings</h4>
  <code>GET /api/v1/settings</code>
</div>
</body>
</html>"#)
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "store": "connected",
                "service": "backoffice-api",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "store": "disconnected",
                "error": e.to_string()
            })),
        ),
    }
}

/// Payroll defaults, procurement threshold and expense/claim types in effect
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses((status = 200, description = "Loaded settings", body = Settings)),
    security(("bearer_auth" = [])),
    tag = "Settings"
)]
pub async fn get_settings(_auth: AuthUser, State(state): State<AppState>) -> Json<Settings> {
    Json(state.config.settings.clone())
}
