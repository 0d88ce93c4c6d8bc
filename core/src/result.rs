use std::collections::BTreeMap;

use serde::Serialize;

/// Offending value mapped to a human-readable reason.
///
/// Empty means the submission is valid. Inserting a key that is already present
/// replaces its reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, reason: impl Into<String>) {
        self.0.insert(key.into(), reason.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Outcome of a raffle submission.
///
/// On success `errors` is empty and `approved` is true:
///
/// ```json
/// { "approved": true, "errors": {} }
/// ```
///
/// On failure every offending value is listed with its reason:
///
/// ```json
/// {
///   "approved": false,
///   "errors": { "123$": "Code should be 5 digits long and contain only unique digits" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitResult {
    approved: bool,
    errors: ValidationErrors,
}

impl SubmitResult {
    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

impl From<ValidationErrors> for SubmitResult {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            approved: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_approval_follows_errors() {
        let ok = SubmitResult::from(ValidationErrors::new());
        assert!(ok.approved());
        assert!(ok.errors().is_empty());

        let mut errors = ValidationErrors::new();
        errors.insert("123$", "bad code");
        let rejected = SubmitResult::from(errors);
        assert!(!rejected.approved());
        assert_eq!(rejected.errors().get("123$"), Some("bad code"));
    }

    #[test]
    fn test_insert_replaces_reason() {
        let mut errors = ValidationErrors::new();
        errors.insert("x", "first");
        errors.insert("x", "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("x"), Some("second"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut errors = ValidationErrors::new();
        errors.insert("11234", "bad code");
        let value = serde_json::to_value(SubmitResult::from(errors)).unwrap();
        assert_eq!(
            value,
            json!({ "approved": false, "errors": { "11234": "bad code" } })
        );

        let value = serde_json::to_value(SubmitResult::from(ValidationErrors::new())).unwrap();
        assert_eq!(value, json!({ "approved": true, "errors": {} }));
    }
}
