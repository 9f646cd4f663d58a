//! # Constraint Set
//!
//! Ordered mapping of field name to the predicates registered on it.
//! At most one predicate per (field, operator); re-registering replaces.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::operator::Operator;
use super::predicate::Predicate;

/// Predicates registered on a single field, in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConstraints {
    predicates: Vec<Predicate>,
}

impl FieldConstraints {
    /// Insert a predicate, replacing any with the same operator in place
    fn set(&mut self, predicate: Predicate) {
        let op = predicate.operator();
        match self.predicates.iter_mut().find(|p| p.operator() == op) {
            Some(slot) => *slot = predicate,
            None => self.predicates.push(predicate),
        }
    }

    /// Get the predicate for an operator
    pub fn get(&self, op: Operator) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.operator() == op)
    }

    /// Operators present on this field, in registration order
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.predicates.iter().map(Predicate::operator)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Serialize for FieldConstraints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.predicates.len()))?;
        for predicate in &self.predicates {
            map.serialize_entry(predicate.operator().as_str(), predicate)?;
        }
        map.end()
    }
}

/// All constraints of one query, keyed by field in first-registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    fields: Vec<(String, FieldConstraints)>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate on a field
    pub fn insert(&mut self, field: impl Into<String>, predicate: Predicate) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, constraints)) => constraints.set(predicate),
            None => {
                let mut constraints = FieldConstraints::default();
                constraints.set(predicate);
                self.fields.push((field, constraints));
            }
        }
    }

    /// Get the constraints on a field
    pub fn field(&self, field: &str) -> Option<&FieldConstraints> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, constraints)| constraints)
    }

    /// Get one predicate
    pub fn get(&self, field: &str, op: Operator) -> Option<&Predicate> {
        self.field(field).and_then(|c| c.get(op))
    }

    /// Field names in registration order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldConstraints)> {
        self.fields.iter().map(|(name, c)| (name.as_str(), c))
    }

    /// Number of constrained fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode as the wire `where` object
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for ConstraintSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, constraints) in &self.fields {
            map.serialize_entry(field, constraints)?;
        }
        map.end()
    }
}
