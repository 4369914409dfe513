//! Flat resource state records and their persistence.
//!
//! A [`StateRecord`] holds the desired and last observed fields of a single
//! managed resource together with its identifier. Every field is optional
//! on read: absent or non-string values read back as the empty string.

mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use store::{StateFile, StateStore, StateStoreError};

/// State of a single managed resource.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StateRecord {
    /// Resource identifier; empty while the resource does not exist.
    #[serde(default)]
    id: String,
    /// Field values keyed by name.
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

impl StateRecord {
    /// Creates an empty record without identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identifier, empty when unset.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true when the record carries an identifier.
    #[must_use]
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Replaces the identifier.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Clears the identifier, marking the resource as absent.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    /// Returns the raw value stored for a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns a field as a string slice, or `""` when the field is absent
    /// or holds a non-string value.
    #[must_use]
    pub fn get_str(&self, name: &str) -> &str {
        self.attributes
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Stores a raw value.
    pub fn set(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_owned(), value);
    }

    /// Stores a string value.
    pub fn set_str(&mut self, name: &str, value: &str) {
        self.set(name, Value::String(value.to_owned()));
    }

    /// Removes a field, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }
}
