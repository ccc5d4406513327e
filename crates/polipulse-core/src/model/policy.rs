use serde::{Deserialize, Serialize};

/// Fixed CSV column set, in template order
pub const POLICY_COLUMNS: [&str; 15] = [
    "client_name",
    "nominee_name",
    "dob",
    "phone_no",
    "email",
    "address",
    "client_type",
    "business_type",
    "purchase_date",
    "policy_no",
    "company_name",
    "policy_type",
    "premium",
    "renewal_date",
    "remarks",
];

/// Policy - the persisted attributes of one insurance policy
///
/// `policy_no` is the natural key. Dates are opaque strings; no format is
/// enforced anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Policy {
    pub client_name: String,
    pub nominee_name: String,
    pub dob: String,
    pub phone_no: String,
    pub email: String,
    pub address: String,
    pub client_type: String,
    pub business_type: String,
    pub purchase_date: String,
    pub policy_no: String,
    pub company_name: String,
    pub policy_type: String,
    pub premium: f64,
    pub renewal_date: String,
    pub remarks: String,
}

impl Policy {
    /// Natural key, trimmed
    pub fn key(&self) -> &str {
        self.policy_no.trim()
    }

    /// Copy with every text field trimmed and a non-finite premium forced to 0
    pub fn normalized(&self) -> Policy {
        let mut out = self.clone();
        for (_, value) in out.text_fields_mut() {
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }
        if !out.premium.is_finite() {
            out.premium = 0.0;
        }
        out
    }

    /// Set a field by CSV column name
    ///
    /// Returns `false` for a name outside `POLICY_COLUMNS`. A premium that
    /// does not parse as a finite number becomes 0.
    pub fn set_field(&mut self, column: &str, value: &str) -> bool {
        if column == "premium" {
            self.premium = parse_premium(value);
            return true;
        }
        match self.text_fields_mut().into_iter().find(|(name, _)| *name == column) {
            Some((_, slot)) => {
                *slot = value.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Text fields paired with their column names, in column order
    pub fn text_fields(&self) -> [(&'static str, &str); 14] {
        [
            ("client_name", self.client_name.as_str()),
            ("nominee_name", self.nominee_name.as_str()),
            ("dob", self.dob.as_str()),
            ("phone_no", self.phone_no.as_str()),
            ("email", self.email.as_str()),
            ("address", self.address.as_str()),
            ("client_type", self.client_type.as_str()),
            ("business_type", self.business_type.as_str()),
            ("purchase_date", self.purchase_date.as_str()),
            ("policy_no", self.policy_no.as_str()),
            ("company_name", self.company_name.as_str()),
            ("policy_type", self.policy_type.as_str()),
            ("renewal_date", self.renewal_date.as_str()),
            ("remarks", self.remarks.as_str()),
        ]
    }

    fn text_fields_mut(&mut self) -> [(&'static str, &mut String); 14] {
        [
            ("client_name", &mut self.client_name),
            ("nominee_name", &mut self.nominee_name),
            ("dob", &mut self.dob),
            ("phone_no", &mut self.phone_no),
            ("email", &mut self.email),
            ("address", &mut self.address),
            ("client_type", &mut self.client_type),
            ("business_type", &mut self.business_type),
            ("purchase_date", &mut self.purchase_date),
            ("policy_no", &mut self.policy_no),
            ("company_name", &mut self.company_name),
            ("policy_type", &mut self.policy_type),
            ("renewal_date", &mut self.renewal_date),
            ("remarks", &mut self.remarks),
        ]
    }
}

/// Premium coercion: empty, non-numeric and non-finite all become 0
pub fn parse_premium(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// A policy as held by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    /// Store-assigned identifier (UUID v7)
    pub id: String,

    #[serde(flatten)]
    pub policy: Policy,
}

impl PolicyRecord {
    pub fn new(id: impl Into<String>, policy: Policy) -> Self {
        Self {
            id: id.into(),
            policy,
        }
    }

    pub fn key(&self) -> &str {
        self.policy.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field_known_and_unknown_columns() {
        let mut policy = Policy::default();
        assert!(policy.set_field("client_name", "  Asha  "));
        assert!(policy.set_field("premium", "1500.50"));
        assert!(!policy.set_field("agent_code", "A1"));

        assert_eq!(policy.client_name, "Asha");
        assert_eq!(policy.premium, 1500.5);
    }

    #[test]
    fn test_premium_coercion() {
        assert_eq!(parse_premium(""), 0.0);
        assert_eq!(parse_premium("abc"), 0.0);
        assert_eq!(parse_premium("NaN"), 0.0);
        assert_eq!(parse_premium("inf"), 0.0);
        assert_eq!(parse_premium(" 12000 "), 12000.0);
        assert_eq!(parse_premium("-5"), -5.0);
    }

    #[test]
    fn test_normalized_trims_text_and_clears_non_finite_premium() {
        let policy = Policy {
            policy_no: " POL1 ".to_string(),
            remarks: "\tnone\n".to_string(),
            premium: f64::NAN,
            ..Policy::default()
        };
        let normalized = policy.normalized();
        assert_eq!(normalized.policy_no, "POL1");
        assert_eq!(normalized.remarks, "none");
        assert_eq!(normalized.premium, 0.0);
    }

    #[test]
    fn test_columns_match_text_fields_plus_premium() {
        let policy = Policy::default();
        let text: Vec<&str> = policy.text_fields().iter().map(|(n, _)| *n).collect();
        let expected: Vec<&str> = POLICY_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != "premium")
            .collect();
        assert_eq!(text, expected);
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = PolicyRecord::new("id-1", Policy::default());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "id-1");
        assert!(json.get("policy_no").is_some());
    }
}
