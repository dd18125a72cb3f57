//! Field-level error messages

use crate::guest::Field;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Key of an [`ErrorMap`] entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    Field(Field),
    /// Failure not attributable to one field
    General,
}

impl ErrorKey {
    pub const GENERAL: &'static str = "general";

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKey::Field(field) => field.as_str(),
            ErrorKey::General => Self::GENERAL,
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Field> for ErrorKey {
    fn from(field: Field) -> Self {
        ErrorKey::Field(field)
    }
}

impl Serialize for ErrorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Messages describing the current failures of a form, one per key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    entries: BTreeMap<ErrorKey, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map holding only a general message
    pub fn general(message: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.insert(ErrorKey::General, message);
        map
    }

    pub fn insert(&mut self, key: impl Into<ErrorKey>, message: impl Into<String>) {
        self.entries.insert(key.into(), message.into());
    }

    pub fn get(&self, key: impl Into<ErrorKey>) -> Option<&str> {
        self.entries.get(&key.into()).map(String::as_str)
    }

    pub fn general_message(&self) -> Option<&str> {
        self.get(ErrorKey::General)
    }

    pub fn contains(&self, key: impl Into<ErrorKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = ErrorKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_key() {
        let map = ErrorMap::general("boom");
        assert_eq!(map.general_message(), Some("boom"));
        assert!(!map.contains(Field::Name));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"general":"boom"}"#);
    }

    #[test]
    fn test_one_message_per_field() {
        let mut map = ErrorMap::new();
        map.insert(Field::Email, "first");
        map.insert(Field::Email, "second");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(Field::Email), Some("second"));
    }
}
