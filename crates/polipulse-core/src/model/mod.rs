pub mod candidate;
pub mod policy;

pub use candidate::CandidateRow;
pub use policy::{Policy, PolicyRecord, POLICY_COLUMNS};
