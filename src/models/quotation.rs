use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "comparison_status", rename_all = "snake_case")]
pub enum ComparisonStatus {
    Draft,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
    Rejected,
}

impl ComparisonStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ComparisonStatus::Approved | ComparisonStatus::Rejected)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum Decision {
    #[serde(alias = "approve", alias = "approved")]
    Approved,
    #[serde(alias = "reject", alias = "rejected")]
    Rejected,
}

impl From<Decision> for ComparisonStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => ComparisonStatus::Approved,
            Decision::Rejected => ComparisonStatus::Rejected,
        }
    }
}

/// One vendor's offer inside a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorQuotation {
    pub quotation_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_name: Option<String>,
    pub rate_per_unit: Decimal,
    pub total_amount: Decimal,
    pub grand_total: Decimal,
    pub delivery_time: Option<String>,
    pub payment_terms: Option<String>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationComparison {
    pub id: Uuid,
    pub comparison_number: String,
    pub purchase_request_id: Uuid,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub quotations: Vec<VendorQuotation>,
    pub selected_quotation_id: Option<Uuid>,
    pub selected_vendor_id: Option<Uuid>,
    pub selection_reason: Option<String>,
    pub status: ComparisonStatus,
    pub compared_by: Option<String>,
    pub approved_by: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
    pub approval_remarks: Option<String>,
    pub requires_admin_approval: bool,
    pub value_threshold: Decimal,
    /// Incremented on every write; stale writers get a conflict.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuotationComparison {
    pub fn selected(&self) -> Option<&VendorQuotation> {
        self.quotations.iter().find(|q| q.is_selected)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationInput {
    /// Generated when omitted
    pub quotation_id: Option<Uuid>,
    pub vendor_id: Uuid,
    pub vendor_name: Option<String>,
    pub rate_per_unit: Decimal,
    pub total_amount: Decimal,
    pub grand_total: Decimal,
    pub delivery_time: Option<String>,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComparisonRequest {
    pub comparison_number: Option<String>,
    pub purchase_request_id: Uuid,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: String,
    #[serde(default)]
    pub quotations: Vec<QuotationInput>,
    /// Defaults to the procurement setting
    pub value_threshold: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectQuotationRequest {
    pub quotation_id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRejectRequest {
    pub decision: Decision,
    /// Defaults to the authenticated user's name
    pub approver: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ComparisonQuery {
    pub status: Option<ComparisonStatus>,
    pub purchase_request_id: Option<Uuid>,
}
