//! Operator-chosen strategy for rows whose policy number already exists

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ImportError;

/// Resolution policy
///
/// `InsertOnly` and `SkipDuplicates` have the same effect on the store:
/// existing rows are never touched. They differ only in how the choice is
/// reported to the operator.
///
/// ```
/// use polipulse_core::resolution::ResolutionPolicy;
///
/// let policy: ResolutionPolicy = "update-existing".parse().unwrap();
/// assert!(policy.updates_existing());
/// assert_eq!(policy.to_string(), "update-existing");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionPolicy {
    #[default]
    InsertOnly,
    UpdateExisting,
    SkipDuplicates,
}

impl ResolutionPolicy {
    pub const ALL: [ResolutionPolicy; 3] = [
        ResolutionPolicy::InsertOnly,
        ResolutionPolicy::UpdateExisting,
        ResolutionPolicy::SkipDuplicates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPolicy::InsertOnly => "insert-only",
            ResolutionPolicy::UpdateExisting => "update-existing",
            ResolutionPolicy::SkipDuplicates => "skip-duplicates",
        }
    }

    /// Whether rows matching an existing record become update tasks
    pub fn updates_existing(&self) -> bool {
        matches!(self, ResolutionPolicy::UpdateExisting)
    }
}

impl fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionPolicy {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ImportError::InvalidPolicy {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_forms_round_trip() {
        for policy in ResolutionPolicy::ALL {
            assert_eq!(policy.as_str().parse::<ResolutionPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert_eq!(
            "overwrite".parse::<ResolutionPolicy>(),
            Err(ImportError::InvalidPolicy {
                value: "overwrite".to_string()
            })
        );
    }

    #[test]
    fn test_default_is_insert_only() {
        assert_eq!(ResolutionPolicy::default(), ResolutionPolicy::InsertOnly);
        assert!(!ResolutionPolicy::SkipDuplicates.updates_existing());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&ResolutionPolicy::SkipDuplicates).unwrap();
        assert_eq!(json, "\"skip-duplicates\"");
    }
}
