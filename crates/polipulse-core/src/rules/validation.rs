use serde::Serialize;
use thiserror::Error;

use crate::model::Policy;

/// Why a row was rejected by the validator
///
/// The display strings are shown to operators verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowRejection {
    #[error("Client name required")]
    ClientNameMissing,
    #[error("Policy number required")]
    PolicyNumberMissing,
    #[error("Company name required")]
    CompanyNameMissing,
    #[error("Business type required")]
    BusinessTypeMissing,
    #[error("Policy type required")]
    PolicyTypeMissing,
    #[error("Purchase date required")]
    PurchaseDateMissing,
    #[error("Renewal date required")]
    RenewalDateMissing,
    #[error("Premium must be > 0")]
    PremiumNotPositive,
}

/// Validate a single policy
///
/// Checks run in a fixed order and the first failure wins:
///
/// 1. client name
/// 2. policy number
/// 3. company name
/// 4. business type
/// 5. policy type
/// 6. purchase date
/// 7. renewal date
/// 8. premium is finite and strictly positive
///
/// Text checks look at the trimmed value. Dates are not format-checked.
///
/// # Returns
/// * `None` - the policy is valid
/// * `Some(rejection)` - the first failing check
pub fn validate(policy: &Policy) -> Option<RowRejection> {
    let required = [
        (&policy.client_name, RowRejection::ClientNameMissing),
        (&policy.policy_no, RowRejection::PolicyNumberMissing),
        (&policy.company_name, RowRejection::CompanyNameMissing),
        (&policy.business_type, RowRejection::BusinessTypeMissing),
        (&policy.policy_type, RowRejection::PolicyTypeMissing),
        (&policy.purchase_date, RowRejection::PurchaseDateMissing),
        (&policy.renewal_date, RowRejection::RenewalDateMissing),
    ];

    if let Some((_, rejection)) = required.iter().find(|(value, _)| value.trim().is_empty()) {
        return Some(*rejection);
    }

    if !(policy.premium.is_finite() && policy.premium > 0.0) {
        return Some(RowRejection::PremiumNotPositive);
    }

    None
}

/// Pass/fail verdict for one candidate row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ValidationVerdict {
    Valid,
    Invalid(RowRejection),
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationVerdict::Valid)
    }

    /// Human-readable reason for an invalid verdict
    pub fn reason(&self) -> Option<String> {
        match self {
            ValidationVerdict::Valid => None,
            ValidationVerdict::Invalid(rejection) => Some(rejection.to_string()),
        }
    }
}

/// `validate` wrapped as a verdict
pub fn verdict_for(policy: &Policy) -> ValidationVerdict {
    match validate(policy) {
        None => ValidationVerdict::Valid,
        Some(rejection) => ValidationVerdict::Invalid(rejection),
    }
}
