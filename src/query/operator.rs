//! # Operator Codes
//!
//! The closed vocabulary of wire operator codes a constraint may carry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Constraint operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equals
    #[serde(rename = "eq")]
    Eq,

    /// Not equals
    #[serde(rename = "neq")]
    Neq,

    /// Greater than
    #[serde(rename = "gt")]
    Gt,

    /// Greater than or equal
    #[serde(rename = "gte")]
    Gte,

    /// Less than
    #[serde(rename = "lt")]
    Lt,

    /// Less than or equal
    #[serde(rename = "lte")]
    Lte,

    /// Field exists (`true`) or does not exist (`false`)
    #[serde(rename = "ex")]
    Exists,

    /// Value in list
    #[serde(rename = "in")]
    In,

    /// Value in list, or field absent
    #[serde(rename = "inx")]
    InOrMissing,

    /// Value not in list
    #[serde(rename = "nin")]
    NotIn,

    /// String prefix
    #[serde(rename = "str")]
    StartsWith,

    /// String suffix
    #[serde(rename = "end")]
    EndsWith,

    /// Contains value
    #[serde(rename = "has")]
    Contains,

    /// Contains any of the values
    #[serde(rename = "hasi")]
    ContainsEither,

    /// Contains all of the values
    #[serde(rename = "hasa")]
    ContainsAll,

    /// Found in sub-query
    #[serde(rename = "fi")]
    FoundIn,

    /// Found in any of the sub-queries
    #[serde(rename = "fie")]
    FoundInEither,

    /// Found in all of the sub-queries
    #[serde(rename = "fia")]
    FoundInAll,

    /// Not found in sub-query
    #[serde(rename = "nfi")]
    NotFoundIn,

    /// Not found in any of the sub-queries
    #[serde(rename = "nfe")]
    NotFoundInEither,

    #[serde(rename = "jeq")]
    JsonEq,

    #[serde(rename = "jneq")]
    JsonNeq,

    #[serde(rename = "jgt")]
    JsonGt,

    #[serde(rename = "jgte")]
    JsonGte,

    #[serde(rename = "jlt")]
    JsonLt,

    #[serde(rename = "jlte")]
    JsonLte,

    #[serde(rename = "jmt")]
    JsonMatches,

    #[serde(rename = "jnmt")]
    JsonNotMatches,

    #[serde(rename = "jin")]
    JsonIn,

    #[serde(rename = "jstr")]
    JsonStartsWith,

    #[serde(rename = "jend")]
    JsonEndsWith,

    #[serde(rename = "jhas")]
    JsonContains,
}

impl Operator {
    /// Every operator, in wire-vocabulary order
    pub const ALL: [Operator; 32] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Exists,
        Operator::In,
        Operator::InOrMissing,
        Operator::NotIn,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Contains,
        Operator::ContainsEither,
        Operator::ContainsAll,
        Operator::FoundIn,
        Operator::FoundInEither,
        Operator::FoundInAll,
        Operator::NotFoundIn,
        Operator::NotFoundInEither,
        Operator::JsonEq,
        Operator::JsonNeq,
        Operator::JsonGt,
        Operator::JsonGte,
        Operator::JsonLt,
        Operator::JsonLte,
        Operator::JsonMatches,
        Operator::JsonNotMatches,
        Operator::JsonIn,
        Operator::JsonStartsWith,
        Operator::JsonEndsWith,
        Operator::JsonContains,
    ];

    /// Get the operator code
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Exists => "ex",
            Operator::In => "in",
            Operator::InOrMissing => "inx",
            Operator::NotIn => "nin",
            Operator::StartsWith => "str",
            Operator::EndsWith => "end",
            Operator::Contains => "has",
            Operator::ContainsEither => "hasi",
            Operator::ContainsAll => "hasa",
            Operator::FoundIn => "fi",
            Operator::FoundInEither => "fie",
            Operator::FoundInAll => "fia",
            Operator::NotFoundIn => "nfi",
            Operator::NotFoundInEither => "nfe",
            Operator::JsonEq => "jeq",
            Operator::JsonNeq => "jneq",
            Operator::JsonGt => "jgt",
            Operator::JsonGte => "jgte",
            Operator::JsonLt => "jlt",
            Operator::JsonLte => "jlte",
            Operator::JsonMatches => "jmt",
            Operator::JsonNotMatches => "jnmt",
            Operator::JsonIn => "jin",
            Operator::JsonStartsWith => "jstr",
            Operator::JsonEndsWith => "jend",
            Operator::JsonContains => "jhas",
        }
    }

    /// Returns true for the JSON-path family
    pub fn is_json_path(&self) -> bool {
        self.as_str().starts_with('j')
    }

    /// Returns true for the found-in family
    pub fn is_sub_query(&self) -> bool {
        matches!(
            self,
            Operator::FoundIn
                | Operator::FoundInEither
                | Operator::FoundInAll
                | Operator::NotFoundIn
                | Operator::NotFoundInEither
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<&str> = Operator::ALL.iter().map(|op| op.as_str()).collect();
        assert_eq!(codes.len(), Operator::ALL.len());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for op in Operator::ALL {
            let encoded = serde_json::to_value(op).unwrap();
            assert_eq!(encoded, serde_json::Value::String(op.as_str().to_string()));

            let decoded: Operator = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, op);
        }
    }

    #[test]
    fn test_families() {
        assert!(Operator::JsonContains.is_json_path());
        assert!(!Operator::Contains.is_json_path());
        assert!(Operator::NotFoundInEither.is_sub_query());
        assert!(!Operator::In.is_sub_query());
    }
}
