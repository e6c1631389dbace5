//! Field-level validation errors reported back to API clients.
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Error messages keyed by the name of the field they belong to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_collects_multiple_messages_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("password", "This field is required.");
        errors.add("password", "Ensure this value has at least 8 characters.");

        assert_eq!(errors.get("password").map(<[String]>::len), Some(2));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn serializes_as_a_plain_map() {
        let mut errors = FieldErrors::new();
        errors.add("confirm_password", "Passwords don't match.");

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "confirm_password": ["Passwords don't match."] })
        );
    }
}
