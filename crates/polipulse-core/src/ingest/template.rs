//! Downloadable CSV template

/// Header line of the template, identical to the parser's column set
pub const TEMPLATE_HEADER: &str = "client_name,nominee_name,dob,phone_no,email,address,client_type,business_type,purchase_date,policy_no,company_name,policy_type,premium,renewal_date,remarks";

/// Sample data row shipped with the template
pub const TEMPLATE_SAMPLE_ROW: &str = "John Doe,Jane Doe,1980-07-01,9876543210,john@example.com,Mumbai,Individual,Life Insurance,2025-01-01,POL12345,Acme Insurers,Term,12000,2026-01-01,N/A";

pub const TEMPLATE_FILE_NAME: &str = "policies_template.csv";

/// Full template document: header, sample row, trailing newline
pub fn template_csv() -> String {
    format!("{}\n{}\n", TEMPLATE_HEADER, TEMPLATE_SAMPLE_ROW)
}
