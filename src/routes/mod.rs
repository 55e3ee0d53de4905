// src/routes/mod.rs

use crate::{
    handlers::{
        attendance::{
            create_attendance, delete_attendance, get_attendance, list_attendance,
            update_attendance,
        },
        employee::{
            create_employee, deactivate_employee, get_employee, list_employees, update_employee,
        },
        general::get_settings,
        payroll::{
            create_payroll, delete_payroll, generate_payroll, get_payroll, list_payroll,
            mark_paid, update_payroll,
        },
        quotation::{
            add_quotation, approve_reject_comparison, create_comparison, get_comparison,
            list_comparisons, select_quotation,
        },
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, patch, post, put},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Employees ────────────────────────────────────────
        .route("/employees", post(create_employee).get(list_employees))
        .route(
            "/employees/{employee_id}",
            get(get_employee)
                .put(update_employee)
                .delete(deactivate_employee),
        )
        // ─── Attendance ───────────────────────────────────────
        .route("/attendance", post(create_attendance).get(list_attendance))
        .route(
            "/attendance/{attendance_id}",
            get(get_attendance)
                .put(update_attendance)
                .delete(delete_attendance),
        )
        // ─── Payroll ──────────────────────────────────────────
        .route("/payroll", post(create_payroll).get(list_payroll))
        .route(
            "/payroll/generate-from-attendance",
            post(generate_payroll),
        )
        .route(
            "/payroll/{payroll_id}",
            get(get_payroll).put(update_payroll).delete(delete_payroll),
        )
        .route("/payroll/{payroll_id}/mark-paid", patch(mark_paid))
        // ─── Procurement ──────────────────────────────────────
        .route(
            "/quotations/comparison",
            post(create_comparison).get(list_comparisons),
        )
        .route("/quotations/comparison/{comparison_id}", get(get_comparison))
        .route(
            "/quotations/comparison/{comparison_id}/quotations",
            post(add_quotation),
        )
        .route(
            "/quotations/comparison/{comparison_id}/select",
            put(select_quotation),
        )
        .route(
            "/quotations/comparison/{comparison_id}/approve-reject",
            put(approve_reject_comparison),
        )
        // ─── Settings ─────────────────────────────────────────
        .route("/settings", get(get_settings))
}
