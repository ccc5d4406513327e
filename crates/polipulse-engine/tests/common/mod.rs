use polipulse_core::ingest::TEMPLATE_HEADER;
use polipulse_core::{CandidateRow, Policy};

/// A policy that passes every validation check
#[allow(dead_code)]
pub fn valid_policy(policy_no: &str) -> Policy {
    Policy {
        client_name: "Asha Rao".to_string(),
        policy_no: policy_no.to_string(),
        company_name: "Acme Insurers".to_string(),
        business_type: "Life Insurance".to_string(),
        policy_type: "Term".to_string(),
        purchase_date: "2025-01-01".to_string(),
        renewal_date: "2026-01-01".to_string(),
        premium: 500.0,
        ..Policy::default()
    }
}

#[allow(dead_code)]
pub fn valid_rows(keys: &[&str]) -> Vec<CandidateRow> {
    keys.iter()
        .enumerate()
        .map(|(i, k)| CandidateRow::new(i, valid_policy(k)))
        .collect()
}

/// CSV body with the full header and one valid line per policy number
#[allow(dead_code)]
pub fn csv_for(keys: &[&str]) -> String {
    let mut out = format!("{}\n", TEMPLATE_HEADER);
    for key in keys {
        out.push_str(&format!(
            "Asha Rao,,,,,,,Life Insurance,2025-01-01,{},Acme Insurers,Term,500,2026-01-01,\n",
            key
        ));
    }
    out
}
