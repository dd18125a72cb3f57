//! In-progress form input

use crate::guest::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw, unvalidated values typed into the form.
///
/// A field that was never touched is absent, which is different from a
/// field that was cleared to an empty string. The schema treats both the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftState {
    values: BTreeMap<Field, String>,
}

impl DraftState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`DraftState::set`]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Value as the form shows it: absent reads as empty
    pub fn value_or_empty(&self, field: Field) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.values.remove(&field)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }
}
