//! CSV parser and normalizer
//!
//! The whole document is checked once when it is opened; after that the row
//! sequence can be walked any number of times without failing.

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::errors::{ImportError, Result};
use crate::model::{CandidateRow, Policy, POLICY_COLUMNS};

/// A checked CSV document
#[derive(Debug, Clone)]
pub struct CsvDocument {
    bytes: Vec<u8>,
    /// For each header position, the known column it maps to
    columns: Vec<Option<&'static str>>,
    row_count: usize,
}

impl CsvDocument {
    /// Check `bytes` as a CSV table with a header row
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Parse` when there is no header row, the input is
    /// not valid UTF-8, or any record cannot be read.
    pub fn parse(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        let mut reader = reader_for(&bytes);

        let headers = reader.headers()?.clone();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::Parse {
                reason: "missing header row".to_string(),
            });
        }

        let columns: Vec<Option<&'static str>> = headers
            .iter()
            .map(|name| {
                let known = POLICY_COLUMNS.iter().copied().find(|c| *c == name);
                if known.is_none() && !name.is_empty() {
                    debug!(column = name, "ignoring unknown CSV column");
                }
                known
            })
            .collect();

        let mut row_count = 0;
        for record in reader.records() {
            record?;
            row_count += 1;
        }

        Ok(Self {
            bytes,
            columns,
            row_count,
        })
    }

    /// Number of data rows; empty lines are not counted
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Header positions that matched a known column
    pub fn recognized_columns(&self) -> Vec<&'static str> {
        self.columns.iter().flatten().copied().collect()
    }

    /// Fresh iterator over the data rows, in file order
    ///
    /// The reader consumes the header row itself before the first record.
    pub fn rows(&self) -> CandidateRows<'_> {
        CandidateRows {
            columns: &self.columns,
            records: reader_for(&self.bytes).into_records(),
            next_index: 0,
        }
    }
}

/// Lazy sequence of candidate rows produced by `CsvDocument::rows`
pub struct CandidateRows<'a> {
    columns: &'a [Option<&'static str>],
    records: csv::StringRecordsIntoIter<&'a [u8]>,
    next_index: usize,
}

impl Iterator for CandidateRows<'_> {
    type Item = CandidateRow;

    fn next(&mut self) -> Option<CandidateRow> {
        let record = self.records.next()?.ok()?;

        let mut policy = Policy::default();
        for (position, column) in self.columns.iter().enumerate() {
            if let Some(column) = column {
                policy.set_field(column, record.get(position).unwrap_or(""));
            }
        }

        let row = CandidateRow::new(self.next_index, policy);
        self.next_index += 1;
        Some(row)
    }
}

/// Parse `bytes` straight into an owned row list
///
/// # Errors
///
/// See [`CsvDocument::parse`].
pub fn parse_csv(bytes: impl Into<Vec<u8>>) -> Result<Vec<CandidateRow>> {
    Ok(CsvDocument::parse(bytes)?.rows().collect())
}

fn reader_for(bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_yields_no_rows() {
        let doc = CsvDocument::parse("client_name,policy_no\n").unwrap();
        assert_eq!(doc.row_count(), 0);
        assert_eq!(doc.rows().count(), 0);
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = CsvDocument::parse(Vec::new()).unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
    }

    #[test]
    fn test_empty_lines_do_not_consume_index() {
        let csv = "policy_no,premium\nA,1\n\nB,2\n";
        let doc = CsvDocument::parse(csv).unwrap();
        let rows: Vec<_> = doc.rows().collect();
        assert_eq!(doc.row_count(), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].origin_index, 1);
        assert_eq!(rows[1].policy.policy_no, "B");
    }

    #[test]
    fn test_comma_only_and_whitespace_lines_are_rows() {
        let csv = "policy_no,premium\nA,1\n,\n   \nB,2\n";
        let doc = CsvDocument::parse(csv).unwrap();
        let rows: Vec<_> = doc.rows().collect();
        assert_eq!(doc.row_count(), 4);
        let indices: Vec<usize> = rows.iter().map(|r| r.origin_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(rows[1].policy.policy_no, "");
        assert_eq!(rows[2].policy.policy_no, "");
        assert_eq!(rows[3].policy.policy_no, "B");
    }

    #[test]
    fn test_rows_is_restartable() {
        let doc = CsvDocument::parse("policy_no\nA\nB\n").unwrap();
        let first: Vec<_> = doc.rows().collect();
        let second: Vec<_> = doc.rows().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_and_missing_columns() {
        let doc = CsvDocument::parse("agent,policy_no\nX,P9\n").unwrap();
        assert_eq!(doc.recognized_columns(), vec!["policy_no"]);

        let row = doc.rows().next().unwrap();
        assert_eq!(row.policy.policy_no, "P9");
        assert_eq!(row.policy.client_name, "");
        assert_eq!(row.policy.premium, 0.0);
    }

    #[test]
    fn test_short_row_fills_defaults() {
        let rows = parse_csv("policy_no,company_name,premium\nP1\n").unwrap();
        assert_eq!(rows[0].policy.policy_no, "P1");
        assert_eq!(rows[0].policy.company_name, "");
        assert_eq!(rows[0].policy.premium, 0.0);
    }

    #[test]
    fn test_quoted_fields_are_honoured() {
        let rows = parse_csv("address,policy_no\n\"12, Main Road\",P1\n").unwrap();
        assert_eq!(rows[0].policy.address, "12, Main Road");
    }
}
