use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::Field;

/// Validation failures keyed by field, at most one message per field.
///
/// Iterates in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", describe(.0))]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`, replacing any earlier message.
    pub fn insert(
        &mut self,
        field: Field,
        message: &'static str,
    ) {
        self.0.insert(field, message);
    }

    /// Drops the message for `field`, if any.
    pub fn remove(
        &mut self,
        field: Field,
    ) {
        self.0.remove(&field);
    }

    /// Sets or clears the message for `field` from a per-field result.
    pub fn update(
        &mut self,
        field: Field,
        message: Option<&'static str>,
    ) {
        match message {
            Some(message) => self.insert(field, message),
            None => self.remove(field),
        }
    }

    pub fn get(
        &self,
        field: Field,
    ) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(
        &self,
        field: Field,
    ) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

/// `field: message` pairs joined with `; `.
fn describe(errors: &BTreeMap<Field, &'static str>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}
