//! Item name: the unique key of an inventory record.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Longest key the document store accepts, in bytes.
pub const MAX_NAME_BYTES: usize = 1500;

/// Unique, case-sensitive key of an inventory item.
///
/// Names double as document keys in the backing store, so the rules here
/// follow the store's key rules: not blank, no `/`, not `.` or `..`, and at
/// most [`MAX_NAME_BYTES`] bytes. Surrounding whitespace is trimmed when
/// parsing; the inner text (including case) is kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Validate and wrap a raw name.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_input("item name cannot be empty"));
        }
        if name.contains('/') {
            return Err(DomainError::invalid_input("item name cannot contain '/'"));
        }
        if name == "." || name == ".." {
            return Err(DomainError::invalid_input(format!("'{name}' is not a valid item name")));
        }
        if name.len() > MAX_NAME_BYTES {
            return Err(DomainError::invalid_input(format!(
                "item name exceeds {MAX_NAME_BYTES} bytes"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name as shown in listings: first character upper-cased, rest untouched.
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl core::fmt::Display for ItemName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace_but_keeps_case() {
        let name = ItemName::parse("  Green Apple ").unwrap();
        assert_eq!(name.as_str(), "Green Apple");
    }

    #[test]
    fn names_are_case_sensitive_keys() {
        assert_ne!(ItemName::parse("apple").unwrap(), ItemName::parse("Apple").unwrap());
    }

    #[test]
    fn rejects_names_the_store_cannot_key() {
        for raw in ["", "   ", "a/b", ".", ".."] {
            assert!(
                matches!(ItemName::parse(raw), Err(DomainError::InvalidInput(_))),
                "expected {raw:?} to be rejected"
            );
        }
        let long = "x".repeat(MAX_NAME_BYTES + 1);
        assert!(ItemName::parse(&long).is_err());
        assert!(ItemName::parse(&"x".repeat(MAX_NAME_BYTES)).is_ok());
    }

    #[test]
    fn display_name_capitalizes_first_character() {
        assert_eq!(ItemName::parse("apple").unwrap().display_name(), "Apple");
        assert_eq!(ItemName::parse("éclair").unwrap().display_name(), "Éclair");
        assert_eq!(ItemName::parse("iPhone case").unwrap().display_name(), "IPhone case");
        assert_eq!(ItemName::parse("42 nails").unwrap().display_name(), "42 nails");
    }

    #[test]
    fn deserialization_validates() {
        let ok: ItemName = serde_json::from_str("\"banana\"").unwrap();
        assert_eq!(ok.as_str(), "banana");
        assert!(serde_json::from_str::<ItemName>("\"a/b\"").is_err());
    }
}
