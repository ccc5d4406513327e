use polipulse_core::{CandidateRow, Policy};

/// A policy that passes every validation check
#[allow(dead_code)]
pub fn valid_policy(policy_no: &str) -> Policy {
    Policy {
        client_name: "Asha Rao".to_string(),
        nominee_name: "Ravi Rao".to_string(),
        policy_no: policy_no.to_string(),
        company_name: "Acme Insurers".to_string(),
        business_type: "Life Insurance".to_string(),
        policy_type: "Term".to_string(),
        purchase_date: "2025-01-01".to_string(),
        renewal_date: "2026-01-01".to_string(),
        premium: 12000.0,
        ..Policy::default()
    }
}

#[allow(dead_code)]
pub fn valid_row(origin_index: usize, policy_no: &str) -> CandidateRow {
    CandidateRow::new(origin_index, valid_policy(policy_no))
}

/// CSV body with the full header and one line per policy number
#[allow(dead_code)]
pub fn csv_for(policy_numbers: &[&str]) -> String {
    let mut out = String::from(polipulse_core::ingest::TEMPLATE_HEADER);
    out.push('\n');
    for key in policy_numbers {
        out.push_str(&format!(
            "Asha Rao,,,,,,,Life Insurance,2025-01-01,{},Acme Insurers,Term,500,2026-01-01,\n",
            key
        ));
    }
    out
}
