//! # Sub-Query Compilation
//!
//! Snapshots a query's filter state into a descriptor that a parent query
//! embeds as a found-in predicate value. The server evaluates it; the
//! client never does.

use std::collections::BTreeMap;

use serde::Serialize;

use super::builder::Query;
use super::constraint::ConstraintSet;
use super::operator::Operator;
use crate::error::{QueryError, QueryResult};

/// One `{selectedKey: query}` entry of a found-in query list
pub type QueryListEntry<'q> = BTreeMap<&'q str, &'q Query>;

/// Build a single-key query-list entry
pub fn entry<'q>(selected_key: &'q str, query: &'q Query) -> QueryListEntry<'q> {
    BTreeMap::from([(selected_key, query)])
}

/// Immutable snapshot of another query's filter state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubQueryDescriptor {
    pub class_name: String,
    /// Key selected from each matching record
    #[serde(rename = "select")]
    pub selected_key: String,
    #[serde(rename = "where")]
    pub constraints: ConstraintSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
}

impl SubQueryDescriptor {
    /// Snapshot `query` as it is right now
    pub fn compile(selected_key: impl Into<String>, query: &Query) -> Self {
        Self {
            class_name: query.class_name().to_string(),
            selected_key: selected_key.into(),
            constraints: query.constraints().clone(),
            limit: query.limit,
            skip: query.skip,
        }
    }

    /// Compile every entry of a query list, in order.
    ///
    /// Each entry must hold exactly one selected key.
    pub fn compile_list(
        operator: Operator,
        query_list: &[QueryListEntry<'_>],
    ) -> QueryResult<Vec<Self>> {
        query_list
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let mut pairs = entry.iter();
                match (pairs.next(), pairs.next()) {
                    (Some((selected_key, query)), None) => {
                        Ok(Self::compile(*selected_key, query))
                    }
                    _ => Err(QueryError::MalformedQueryList {
                        operator: operator.as_str(),
                        index,
                        keys: entry.len(),
                    }),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_snapshot() {
        let mut query = Query::new("post");
        query.equal_to("status", "published").limit(10);

        let descriptor = SubQueryDescriptor::compile("author", &query);
        query.equal_to("status", "draft").skip(5);

        assert_eq!(descriptor.class_name, "post");
        assert_eq!(descriptor.limit, Some(10));
        assert_eq!(descriptor.skip, None);
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({
                "className": "post",
                "select": "author",
                "where": {"status": {"eq": "published"}},
                "limit": 10
            })
        );
    }

    #[test]
    fn test_compile_list_in_order() {
        let a = Query::new("team");
        let b = Query::new("league");

        let list = SubQueryDescriptor::compile_list(
            Operator::FoundInEither,
            &[entry("captain", &a), entry("owner", &b)],
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].selected_key, "captain");
        assert_eq!(list[1].class_name, "league");
    }

    #[test]
    fn test_empty_entry_rejected() {
        let result = SubQueryDescriptor::compile_list(Operator::FoundInAll, &[BTreeMap::new()]);

        assert!(matches!(
            result,
            Err(QueryError::MalformedQueryList {
                operator: "fia",
                index: 0,
                keys: 0
            })
        ));
    }

    #[test]
    fn test_multi_key_entry_rejected() {
        let a = Query::new("team");
        let b = Query::new("league");
        let mut bad = entry("captain", &a);
        bad.insert("owner", &b);

        let result = SubQueryDescriptor::compile_list(
            Operator::NotFoundInEither,
            &[entry("id", &a), bad],
        );

        assert!(matches!(
            result,
            Err(QueryError::MalformedQueryList {
                operator: "nfe",
                index: 1,
                keys: 2
            })
        ));
    }
}
