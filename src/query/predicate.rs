//! # Predicates
//!
//! Typed operator/value pairs. Each variant corresponds to exactly one
//! wire operator code.

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use super::operator::Operator;
use super::subquery::SubQueryDescriptor;

/// Separator between a JSON field's root key and its inner path
pub const JSON_PATH_SEPARATOR: char = '.';

/// A JSON-path predicate payload
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JsonPredicate {
    /// Path inside the root field, `$`-rooted
    pub path: String,
    /// Value to compare against
    pub value: Value,
}

/// Splits `root.a.b` into the root key and the `$`-rooted inner path.
///
/// A key without a separator targets the whole field (`$`).
pub fn split_json_key(key: &str) -> (String, String) {
    match key.split_once(JSON_PATH_SEPARATOR) {
        Some((root, rest)) => (root.to_string(), format!("$.{}", rest)),
        None => (key.to_string(), "$".to_string()),
    }
}

/// One operator applied to one field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Value),
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Exists(bool),
    In(Vec<Value>),
    InOrMissing(Vec<Value>),
    NotIn(Vec<Value>),
    StartsWith(String),
    EndsWith(String),
    Contains(Value),
    ContainsEither(Vec<Value>),
    ContainsAll(Vec<Value>),
    FoundIn(SubQueryDescriptor),
    FoundInEither(Vec<SubQueryDescriptor>),
    FoundInAll(Vec<SubQueryDescriptor>),
    NotFoundIn(SubQueryDescriptor),
    NotFoundInEither(Vec<SubQueryDescriptor>),
    JsonEq(JsonPredicate),
    JsonNeq(JsonPredicate),
    JsonGt(JsonPredicate),
    JsonGte(JsonPredicate),
    JsonLt(JsonPredicate),
    JsonLte(JsonPredicate),
    JsonMatches(JsonPredicate),
    JsonNotMatches(JsonPredicate),
    JsonIn(JsonPredicate),
    JsonStartsWith(JsonPredicate),
    JsonEndsWith(JsonPredicate),
    JsonContains(JsonPredicate),
}

impl Predicate {
    /// The operator code this predicate registers under
    pub fn operator(&self) -> Operator {
        match self {
            Predicate::Eq(_) => Operator::Eq,
            Predicate::Neq(_) => Operator::Neq,
            Predicate::Gt(_) => Operator::Gt,
            Predicate::Gte(_) => Operator::Gte,
            Predicate::Lt(_) => Operator::Lt,
            Predicate::Lte(_) => Operator::Lte,
            Predicate::Exists(_) => Operator::Exists,
            Predicate::In(_) => Operator::In,
            Predicate::InOrMissing(_) => Operator::InOrMissing,
            Predicate::NotIn(_) => Operator::NotIn,
            Predicate::StartsWith(_) => Operator::StartsWith,
            Predicate::EndsWith(_) => Operator::EndsWith,
            Predicate::Contains(_) => Operator::Contains,
            Predicate::ContainsEither(_) => Operator::ContainsEither,
            Predicate::ContainsAll(_) => Operator::ContainsAll,
            Predicate::FoundIn(_) => Operator::FoundIn,
            Predicate::FoundInEither(_) => Operator::FoundInEither,
            Predicate::FoundInAll(_) => Operator::FoundInAll,
            Predicate::NotFoundIn(_) => Operator::NotFoundIn,
            Predicate::NotFoundInEither(_) => Operator::NotFoundInEither,
            Predicate::JsonEq(_) => Operator::JsonEq,
            Predicate::JsonNeq(_) => Operator::JsonNeq,
            Predicate::JsonGt(_) => Operator::JsonGt,
            Predicate::JsonGte(_) => Operator::JsonGte,
            Predicate::JsonLt(_) => Operator::JsonLt,
            Predicate::JsonLte(_) => Operator::JsonLte,
            Predicate::JsonMatches(_) => Operator::JsonMatches,
            Predicate::JsonNotMatches(_) => Operator::JsonNotMatches,
            Predicate::JsonIn(_) => Operator::JsonIn,
            Predicate::JsonStartsWith(_) => Operator::JsonStartsWith,
            Predicate::JsonEndsWith(_) => Operator::JsonEndsWith,
            Predicate::JsonContains(_) => Operator::JsonContains,
        }
    }

    /// Encode the payload as its wire value
    pub fn to_value(&self) -> Value {
        // Serializing these payloads cannot fail: all map keys are strings.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Predicate::Eq(v)
            | Predicate::Neq(v)
            | Predicate::Gt(v)
            | Predicate::Gte(v)
            | Predicate::Lt(v)
            | Predicate::Lte(v)
            | Predicate::Contains(v) => v.serialize(serializer),
            Predicate::Exists(flag) => serializer.serialize_bool(*flag),
            Predicate::In(values)
            | Predicate::InOrMissing(values)
            | Predicate::NotIn(values)
            | Predicate::ContainsEither(values)
            | Predicate::ContainsAll(values) => values.serialize(serializer),
            Predicate::StartsWith(s) | Predicate::EndsWith(s) => serializer.serialize_str(s),
            Predicate::FoundIn(sub) | Predicate::NotFoundIn(sub) => sub.serialize(serializer),
            Predicate::FoundInEither(subs)
            | Predicate::FoundInAll(subs)
            | Predicate::NotFoundInEither(subs) => subs.serialize(serializer),
            Predicate::JsonEq(p)
            | Predicate::JsonNeq(p)
            | Predicate::JsonGt(p)
            | Predicate::JsonGte(p)
            | Predicate::JsonLt(p)
            | Predicate::JsonLte(p)
            | Predicate::JsonMatches(p)
            | Predicate::JsonNotMatches(p)
            | Predicate::JsonIn(p)
            | Predicate::JsonStartsWith(p)
            | Predicate::JsonEndsWith(p)
            | Predicate::JsonContains(p) => p.serialize(serializer),
        }
    }
}
