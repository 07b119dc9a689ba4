//! Customer policy store.
//!
//! Immutable reference data loaded once at startup from a JSON array.
//! Customers are matched against utterances by case-insensitive name
//! substring; a failed match is a retry, not an error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DuecallError, Result};

/// Placeholder rendered for absent policy fields.
const NOT_AVAILABLE: &str = "N/A";

/// A single customer policy record.
///
/// Only `name` is required; every other field defaults to "N/A" when
/// rendered. The JSON keys follow the store's flat naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(rename = "policynumber", default)]
    pub policy_number: Option<String>,
    #[serde(rename = "purchasedate", default)]
    pub purchase_date: Option<String>,
    #[serde(rename = "duedate", default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub premium: Option<String>,
}

impl Customer {
    pub fn policy_number_or_na(&self) -> &str {
        self.policy_number.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn purchase_date_or_na(&self) -> &str {
        self.purchase_date.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn due_date_or_na(&self) -> &str {
        self.due_date.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn premium_or_na(&self) -> &str {
        self.premium.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Ordered collection of customer records.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    customers: Vec<Customer>,
}

impl CustomerStore {
    /// Build a store from an in-memory list (used by tests and fixtures).
    pub fn new(customers: Vec<Customer>) -> Self {
        Self { customers }
    }

    /// Load the store from a JSON file.
    ///
    /// A missing or malformed file is fatal: no call can be served without
    /// customer records.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DuecallError::CustomerStore(format!(
                "cannot read customer store {}: {}",
                path.display(),
                e
            ))
        })?;
        let customers: Vec<Customer> = serde_json::from_str(&content).map_err(|e| {
            DuecallError::CustomerStore(format!(
                "invalid customer store {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(count = customers.len(), "Customer store loaded");
        Ok(Self { customers })
    }

    /// Find the first customer whose name occurs (case-insensitively) in the
    /// utterance.
    pub fn match_name(&self, utterance: &str) -> Option<&Customer> {
        let lower = utterance.to_lowercase();
        self.customers
            .iter()
            .find(|c| lower.contains(&c.name.to_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CustomerStore {
        CustomerStore::new(vec![
            Customer {
                name: "John".to_string(),
                policy_number: Some("LP-1001".to_string()),
                purchase_date: Some("2021-04-12".to_string()),
                due_date: Some("2025-04-12".to_string()),
                premium: Some("12000".to_string()),
            },
            Customer {
                name: "Priya".to_string(),
                policy_number: None,
                purchase_date: None,
                due_date: None,
                premium: None,
            },
        ])
    }

    #[test]
    fn test_match_name_case_insensitive() {
        let store = store();
        let matched = store.match_name("hi, this is JOHN speaking").unwrap();
        assert_eq!(matched.name, "John");
    }

    #[test]
    fn test_match_name_substring() {
        let store = store();
        assert!(store.match_name("priya here, returning your call").is_some());
    }

    #[test]
    fn test_match_name_no_match() {
        let store = store();
        assert!(store.match_name("this is somebody else").is_none());
    }

    #[test]
    fn test_match_name_first_wins() {
        let store = store();
        let matched = store.match_name("john and priya are both here").unwrap();
        assert_eq!(matched.name, "John");
    }

    #[test]
    fn test_missing_fields_render_na() {
        let store = store();
        let priya = store.match_name("priya").unwrap();
        assert_eq!(priya.policy_number_or_na(), "N/A");
        assert_eq!(priya.purchase_date_or_na(), "N/A");
        assert_eq!(priya.due_date_or_na(), "N/A");
        assert_eq!(priya.premium_or_na(), "N/A");
    }

    #[test]
    fn test_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        std::fs::write(
            &path,
            r#"[{"name": "Asha", "policynumber": "LP-7", "premium": "9000"}]"#,
        )
        .unwrap();

        let store = CustomerStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        let asha = store.match_name("asha calling").unwrap();
        assert_eq!(asha.policy_number_or_na(), "LP-7");
        assert_eq!(asha.purchase_date_or_na(), "N/A");
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let result = CustomerStore::load(Path::new("/nonexistent/customers.json"));
        assert!(matches!(result, Err(DuecallError::CustomerStore(_))));
    }

    #[test]
    fn test_load_invalid_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.json");
        std::fs::write(&path, "{ not an array }").unwrap();
        let result = CustomerStore::load(&path);
        assert!(matches!(result, Err(DuecallError::CustomerStore(_))));
    }
}
