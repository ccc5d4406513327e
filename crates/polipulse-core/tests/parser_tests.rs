#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use polipulse_core::ingest::{
    parse_csv, template_csv, CsvDocument, TEMPLATE_HEADER, TEMPLATE_SAMPLE_ROW,
};
use polipulse_core::{verdict_for, ImportError, RowRejection, ValidationVerdict};

#[test]
fn test_template_parses_to_one_valid_row() {
    let rows = parse_csv(template_csv()).unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.origin_index, 0);
    assert_eq!(row.policy.policy_no, "POL12345");
    assert_eq!(row.policy.premium, 12000.0);
    assert_eq!(row.policy.client_name, "John Doe");
    assert_eq!(row.policy.remarks, "N/A");
    assert_eq!(verdict_for(&row.policy), ValidationVerdict::Valid);
}

#[test]
fn test_row_count_matches_data_lines_in_order() {
    let csv = common::csv_for(&["A", "B", "C", "D"]);
    let doc = CsvDocument::parse(csv).unwrap();

    assert_eq!(doc.row_count(), 4);
    let keys: Vec<String> = doc.rows().map(|r| r.policy.policy_no).collect();
    assert_eq!(keys, vec!["A", "B", "C", "D"]);
    let indices: Vec<usize> = doc.rows().map(|r| r.origin_index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn test_cells_and_headers_are_trimmed() {
    let csv = " policy_no , client_name ,premium\n  POL9  ,  Meera  , 250 \n";
    let rows = parse_csv(csv).unwrap();
    assert_eq!(rows[0].policy.policy_no, "POL9");
    assert_eq!(rows[0].policy.client_name, "Meera");
    assert_eq!(rows[0].policy.premium, 250.0);
}

#[test]
fn test_non_numeric_premium_is_validation_not_parse_failure() {
    let csv = common::csv_for(&["POL1"]).replace(",500,", ",twelve,");
    let rows = parse_csv(csv).unwrap();

    assert_eq!(rows[0].policy.premium, 0.0);
    assert_eq!(
        verdict_for(&rows[0].policy),
        ValidationVerdict::Invalid(RowRejection::PremiumNotPositive)
    );
}

#[test]
fn test_missing_company_name_is_reported() {
    let csv = common::csv_for(&["POL1"]).replace("Acme Insurers", "");
    let rows = parse_csv(csv).unwrap();

    assert_eq!(
        verdict_for(&rows[0].policy).reason().as_deref(),
        Some("Company name required")
    );
}

#[test]
fn test_invalid_utf8_fails_whole_parse() {
    let mut bytes = common::csv_for(&["POL1", "POL2"]).into_bytes();
    let last = bytes.len() - 2;
    bytes[last] = 0xff;

    let err = parse_csv(bytes).unwrap_err();
    assert!(matches!(err, ImportError::Parse { .. }), "got {:?}", err);
}

#[test]
fn test_unterminated_quote_runs_to_end_of_input() {
    let rows = parse_csv("policy_no,client_name\n\"POL1,Asha\n").unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].policy.policy_no, "POL1,Asha");
    assert_eq!(rows[0].policy.client_name, "");
}

#[test]
fn test_header_of_empty_names_is_parse_error() {
    for csv in [",,,\nA,B,C,D\n", "   \nPOL1\n"] {
        let err = parse_csv(csv).unwrap_err();
        assert_eq!(
            err,
            ImportError::Parse {
                reason: "missing header row".to_string()
            }
        );
    }
}

#[test]
fn test_comma_only_and_whitespace_rows_keep_their_index() {
    let csv = format!(
        "{}\n,,,,,,,,,,,,,,\n   \n{}\n",
        TEMPLATE_HEADER, TEMPLATE_SAMPLE_ROW
    );
    let rows = parse_csv(csv).unwrap();

    assert_eq!(rows.len(), 3);
    let indices: Vec<usize> = rows.iter().map(|r| r.origin_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);

    for row in &rows[..2] {
        assert_eq!(
            verdict_for(&row.policy).reason().as_deref(),
            Some("Client name required")
        );
    }
    assert_eq!(rows[2].policy.policy_no, "POL12345");
    assert_eq!(verdict_for(&rows[2].policy), ValidationVerdict::Valid);
}
