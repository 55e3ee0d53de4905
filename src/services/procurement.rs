// src/services/procurement.rs

use crate::{
    errors::{AppError, AppResult},
    models::{
        ComparisonStatus, CreateComparisonRequest, Decision, QuotationComparison, QuotationInput,
        VendorQuotation,
    },
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

pub struct ProcurementService;

impl ProcurementService {
    /// Strictly above the threshold needs an admin; equal does not.
    pub fn requires_admin_approval(grand_total: Decimal, threshold: Decimal) -> bool {
        grand_total > threshold
    }

    pub fn new_comparison(
        request: CreateComparisonRequest,
        default_threshold: Decimal,
        compared_by: &str,
    ) -> AppResult<QuotationComparison> {
        if request.material_name.trim().is_empty() {
            return Err(AppError::Validation("materialName is required".to_string()));
        }
        if request.unit.trim().is_empty() {
            return Err(AppError::Validation("unit is required".to_string()));
        }
        if request.quantity <= Decimal::ZERO {
            return Err(AppError::Validation(
                "quantity must be greater than 0".to_string(),
            ));
        }
        let value_threshold = request.value_threshold.unwrap_or(default_threshold);
        if value_threshold <= Decimal::ZERO {
            return Err(AppError::Validation(
                "valueThreshold must be greater than 0".to_string(),
            ));
        }

        let quotations = request
            .quotations
            .into_iter()
            .map(vendor_quotation)
            .collect::<AppResult<Vec<_>>>()?;

        let mut seen = HashSet::new();
        if let Some(dup) = quotations.iter().find(|q| !seen.insert(q.quotation_id)) {
            return Err(AppError::Validation(format!(
                "quotation {} appears more than once",
                dup.quotation_id
            )));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let comparison_number = match request.comparison_number {
            Some(number) if !number.trim().is_empty() => number.trim().to_string(),
            _ => generate_comparison_number(id),
        };

        Ok(QuotationComparison {
            id,
            comparison_number,
            purchase_request_id: request.purchase_request_id,
            material_name: request.material_name.trim().to_string(),
            quantity: request.quantity,
            unit: request.unit.trim().to_string(),
            quotations,
            selected_quotation_id: None,
            selected_vendor_id: None,
            selection_reason: None,
            status: ComparisonStatus::Draft,
            compared_by: Some(compared_by.to_string()),
            approved_by: None,
            approval_date: None,
            approval_remarks: None,
            requires_admin_approval: false,
            value_threshold,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Append a vendor quotation; only drafts accept new offers.
    pub fn add_quotation(
        comparison: &mut QuotationComparison,
        input: QuotationInput,
    ) -> AppResult<()> {
        if comparison.status != ComparisonStatus::Draft {
            return Err(AppError::InvalidState(format!(
                "quotations can only be added to a Draft comparison, current status is {:?}",
                comparison.status
            )));
        }
        let quotation = vendor_quotation(input)?;
        if comparison
            .quotations
            .iter()
            .any(|q| q.quotation_id == quotation.quotation_id)
        {
            return Err(AppError::Conflict(format!(
                "quotation {} is already part of this comparison",
                quotation.quotation_id
            )));
        }
        comparison.quotations.push(quotation);
        comparison.updated_at = Utc::now();
        Ok(())
    }

    /// Select the winning quotation, clearing any earlier choice, and move the
    /// comparison to Under Review.
    pub fn select_quotation(
        comparison: &mut QuotationComparison,
        quotation_id: Uuid,
        reason: Option<String>,
    ) -> AppResult<()> {
        if comparison.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "comparison {} is already {:?}",
                comparison.comparison_number, comparison.status
            )));
        }

        let (vendor_id, grand_total) = comparison
            .quotations
            .iter()
            .find(|q| q.quotation_id == quotation_id)
            .map(|q| (q.vendor_id, q.grand_total))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "quotation {} is not part of comparison {}",
                    quotation_id, comparison.comparison_number
                ))
            })?;

        for quotation in &mut comparison.quotations {
            quotation.is_selected = quotation.quotation_id == quotation_id;
        }

        comparison.selected_quotation_id = Some(quotation_id);
        comparison.selected_vendor_id = Some(vendor_id);
        comparison.selection_reason = reason;
        comparison.requires_admin_approval =
            Self::requires_admin_approval(grand_total, comparison.value_threshold);
        comparison.status = ComparisonStatus::UnderReview;
        comparison.updated_at = Utc::now();
        Ok(())
    }

    /// Record an approval decision. Only Under Review comparisons can be
    /// decided, and a comparison over the value threshold needs an admin.
    pub fn decide(
        comparison: &mut QuotationComparison,
        decision: Decision,
        approver: String,
        remarks: Option<String>,
        actor_is_admin: bool,
    ) -> AppResult<()> {
        if comparison.status != ComparisonStatus::UnderReview {
            return Err(AppError::InvalidState(format!(
                "comparison must be Under Review to be approved or rejected, current status is {:?}",
                comparison.status
            )));
        }
        if comparison.selected().is_none() {
            return Err(AppError::InvalidState(
                "no quotation has been selected".to_string(),
            ));
        }
        if comparison.requires_admin_approval && !actor_is_admin {
            return Err(AppError::Forbidden(format!(
                "selected quotation exceeds the approval threshold of {}; an admin must decide",
                comparison.value_threshold
            )));
        }

        let now = Utc::now();
        comparison.status = decision.into();
        comparison.approved_by = Some(approver);
        comparison.approval_date = Some(now);
        comparison.approval_remarks = remarks;
        comparison.updated_at = now;
        Ok(())
    }
}

fn vendor_quotation(input: QuotationInput) -> AppResult<VendorQuotation> {
    let amounts = [
        ("ratePerUnit", input.rate_per_unit),
        ("totalAmount", input.total_amount),
        ("grandTotal", input.grand_total),
    ];
    for (field, value) in amounts {
        if value < Decimal::ZERO {
            return Err(AppError::Validation(format!("{field} cannot be negative")));
        }
    }

    Ok(VendorQuotation {
        quotation_id: input.quotation_id.unwrap_or_else(Uuid::new_v4),
        vendor_id: input.vendor_id,
        vendor_name: input.vendor_name,
        rate_per_unit: input.rate_per_unit,
        total_amount: input.total_amount,
        grand_total: input.grand_total,
        delivery_time: input.delivery_time,
        payment_terms: input.payment_terms,
        is_selected: false,
    })
}

fn generate_comparison_number(id: Uuid) -> String {
    let suffix: String = id.simple().to_string().chars().take(8).collect();
    format!(
        "QC-{}-{}",
        Utc::now().format("%Y%m"),
        suffix.to_uppercase()
    )
}
