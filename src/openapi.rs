// src/openapi.rs

use crate::{
    config::{PayrollSettings, ProcurementSettings, Settings},
    models::{
        ApproveRejectRequest, AttendanceRecord, AttendanceStatus, ComparisonStatus,
        CreateAttendanceRequest, CreateComparisonRequest, CreateEmployeeRequest,
        CreatePayrollRequest, Decision, Employee, GeneratePayrollRequest,
        GeneratePayrollResponse, GenerationFailure, PayrollRecord, QuotationComparison,
        QuotationInput, SelectQuotationRequest, UpdateAttendanceRequest, UpdateEmployeeRequest,
        UpdatePayrollRequest, VendorQuotation,
    },
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Back-office API",
        version = "0.1.0",
        description = "Payroll, attendance and procurement approval API for restaurant and \
            construction back offices. Net salaries are derived from attendance; vendor \
            quotations are compared, selected and approved above a value threshold.",
        license(name = "MIT")
    ),
    paths(
        // Employees
        crate::handlers::employee::create_employee,
        crate::handlers::employee::list_employees,
        crate::handlers::employee::get_employee,
        crate::handlers::employee::update_employee,
        crate::handlers::employee::deactivate_employee,
        // Attendance
        crate::handlers::attendance::create_attendance,
        crate::handlers::attendance::list_attendance,
        crate::handlers::attendance::get_attendance,
        crate::handlers::attendance::update_attendance,
        crate::handlers::attendance::delete_attendance,
        // Payroll
        crate::handlers::payroll::create_payroll,
        crate::handlers::payroll::list_payroll,
        crate::handlers::payroll::get_payroll,
        crate::handlers::payroll::update_payroll,
        crate::handlers::payroll::delete_payroll,
        crate::handlers::payroll::mark_paid,
        crate::handlers::payroll::generate_payroll,
        // Procurement
        crate::handlers::quotation::create_comparison,
        crate::handlers::quotation::list_comparisons,
        crate::handlers::quotation::get_comparison,
        crate::handlers::quotation::add_quotation,
        crate::handlers::quotation::select_quotation,
        crate::handlers::quotation::approve_reject_comparison,
        // Settings
        crate::handlers::general::get_settings,
    ),
    components(
        schemas(
            CreateEmployeeRequest, UpdateEmployeeRequest, Employee,
            AttendanceStatus, CreateAttendanceRequest, UpdateAttendanceRequest, AttendanceRecord,
            CreatePayrollRequest, UpdatePayrollRequest, PayrollRecord,
            GeneratePayrollRequest, GeneratePayrollResponse, GenerationFailure,
            ComparisonStatus, Decision, VendorQuotation, QuotationInput,
            CreateComparisonRequest, SelectQuotationRequest, ApproveRejectRequest,
            QuotationComparison,
            Settings, PayrollSettings, ProcurementSettings,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Employees", description = "Employee master data"),
        (name = "Attendance", description = "Daily attendance with derived hours and overtime"),
        (name = "Payroll", description = "Net-salary computation, generation and payment status"),
        (name = "Procurement", description = "Vendor quotation comparison and approval"),
        (name = "Settings", description = "Loaded business settings"),
    )
)]
pub struct ApiDoc;
