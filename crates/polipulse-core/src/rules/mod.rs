pub mod validation;

pub use validation::{validate, verdict_for, RowRejection, ValidationVerdict};
