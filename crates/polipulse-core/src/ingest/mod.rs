//! CSV ingestion: parsing uploaded files into candidate rows and producing
//! the downloadable template.

pub mod parser;
pub mod template;

pub use parser::{parse_csv, CandidateRows, CsvDocument};
pub use template::{template_csv, TEMPLATE_FILE_NAME, TEMPLATE_HEADER, TEMPLATE_SAMPLE_ROW};
