//! # Query Descriptor
//!
//! The canonical, transport-ready payload built from a query at
//! execution time, and the class-to-route mapping.

use serde::Serialize;

use super::constraint::ConstraintSet;
use super::sort::SortDirective;

/// Class name served from the dedicated users route
pub const USER_CLASS: &str = "user";

/// Map a class name to its route segment.
///
/// `user` is served from `users`; every other class from `classes/<name>`.
pub fn class_route(class_name: &str) -> String {
    if class_name == USER_CLASS {
        "users".to_string()
    } else {
        format!("classes/{}", class_name)
    }
}

/// Transport-ready query payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryDescriptor {
    pub include: Vec<String>,
    #[serde(rename = "where")]
    pub constraints: ConstraintSet,
    pub sort: Vec<SortDirective>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
}

impl QueryDescriptor {
    /// Encode as a JSON value
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
