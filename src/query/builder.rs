//! # Query Builder
//!
//! Fluent, mutable accumulator of constraints, sort directives,
//! inclusions and pagination for one class.
//!
//! Predicate methods mutate the builder and return it for chaining.
//! Nothing is validated against a schema; the server owns evaluation.

use serde_json::Value;

use super::constraint::ConstraintSet;
use super::descriptor::QueryDescriptor;
use super::operator::Operator;
use super::predicate::{split_json_key, JsonPredicate, Predicate};
use super::sort::{FieldList, SortDirection, SortDirective};
use super::subquery::{QueryListEntry, SubQueryDescriptor};
use crate::error::QueryResult;

/// A query against one server-side class
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    class_name: String,
    include: Vec<String>,
    constraints: ConstraintSet,
    sort: Vec<SortDirective>,
    pub(crate) limit: Option<u64>,
    pub(crate) skip: Option<u64>,
}

fn values<I, V>(items: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    items.into_iter().map(Into::into).collect()
}

impl Query {
    /// Create an empty query for `class_name`
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            include: Vec::new(),
            constraints: ConstraintSet::new(),
            sort: Vec::new(),
            limit: None,
            skip: None,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn includes(&self) -> &[String] {
        &self.include
    }

    pub fn sort_directives(&self) -> &[SortDirective] {
        &self.sort
    }

    /// Snapshot the current state as a transport-ready descriptor
    pub fn descriptor(&self) -> QueryDescriptor {
        QueryDescriptor {
            include: self.include.clone(),
            constraints: self.constraints.clone(),
            sort: self.sort.clone(),
            limit: self.limit,
            skip: self.skip,
        }
    }

    fn add_where(&mut self, field: impl Into<String>, predicate: Predicate) -> &mut Self {
        self.constraints.insert(field, predicate);
        self
    }

    fn add_json_where(
        &mut self,
        key: impl Into<String>,
        wrap: fn(JsonPredicate) -> Predicate,
        value: Value,
    ) -> &mut Self {
        let (root, path) = split_json_key(&key.into());
        self.add_where(root, wrap(JsonPredicate { path, value }))
    }

    fn add_sort(&mut self, fields: FieldList, direction: SortDirection) -> &mut Self {
        self.sort.extend(
            fields
                .into_vec()
                .into_iter()
                .map(|field| SortDirective { field, direction }),
        );
        self
    }

    // ==================
    // Inclusion
    // ==================

    /// Ask the server to expand a pointer field. Duplicates are kept.
    pub fn include(&mut self, field: impl Into<String>) -> &mut Self {
        self.include.push(field.into());
        self
    }

    // ==================
    // Comparison
    // ==================

    pub fn equal_to(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add_where(field, Predicate::Eq(value.into()))
    }

    pub fn not_equal_to(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add_where(field, Predicate::Neq(value.into()))
    }

    pub fn greater_than(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add_where(field, Predicate::Gt(value.into()))
    }

    pub fn greater_than_or_equal_to(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_where(field, Predicate::Gte(value.into()))
    }

    pub fn less_than(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add_where(field, Predicate::Lt(value.into()))
    }

    pub fn less_than_or_equal_to(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_where(field, Predicate::Lte(value.into()))
    }

    // ==================
    // Existence
    // ==================

    pub fn exists(&mut self, field: impl Into<String>) -> &mut Self {
        self.add_where(field, Predicate::Exists(true))
    }

    /// Shares the `ex` code with [`Query::exists`]; the later call wins.
    pub fn does_not_exist(&mut self, field: impl Into<String>) -> &mut Self {
        self.add_where(field, Predicate::Exists(false))
    }

    // ==================
    // Membership
    // ==================

    pub fn contained_in<I, V>(&mut self, field: impl Into<String>, items: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where(field, Predicate::In(values(items)))
    }

    /// Matches when the value is in `items` or the field is absent
    pub fn contained_in_or_does_not_exist<I, V>(
        &mut self,
        field: impl Into<String>,
        items: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where(field, Predicate::InOrMissing(values(items)))
    }

    pub fn not_contained_in<I, V>(&mut self, field: impl Into<String>, items: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where(field, Predicate::NotIn(values(items)))
    }

    // ==================
    // Strings
    // ==================

    pub fn starts_with(&mut self, field: impl Into<String>, prefix: impl Into<String>) -> &mut Self {
        self.add_where(field, Predicate::StartsWith(prefix.into()))
    }

    pub fn ends_with(&mut self, field: impl Into<String>, suffix: impl Into<String>) -> &mut Self {
        self.add_where(field, Predicate::EndsWith(suffix.into()))
    }

    // ==================
    // Containment
    // ==================

    /// Containment probe. Several fields are joined into one `a|b` key.
    pub fn contains(&mut self, fields: impl Into<FieldList>, value: impl Into<Value>) -> &mut Self {
        let key = fields.into().composite_key();
        self.add_where(key, Predicate::Contains(value.into()))
    }

    pub fn contains_either<I, V>(&mut self, field: impl Into<String>, items: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where(field, Predicate::ContainsEither(values(items)))
    }

    pub fn contains_all<I, V>(&mut self, field: impl Into<String>, items: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_where(field, Predicate::ContainsAll(values(items)))
    }

    // ==================
    // Sub-queries
    // ==================

    /// `field` must appear among `selected_key` values of `query`'s matches.
    ///
    /// `query` is snapshotted now; later changes to it are not seen.
    pub fn found_in(
        &mut self,
        field: impl Into<String>,
        selected_key: impl Into<String>,
        query: &Query,
    ) -> &mut Self {
        let sub = SubQueryDescriptor::compile(selected_key, query);
        self.add_where(field, Predicate::FoundIn(sub))
    }

    pub fn found_in_either(
        &mut self,
        field: impl Into<String>,
        query_list: &[QueryListEntry<'_>],
    ) -> QueryResult<&mut Self> {
        let subs = SubQueryDescriptor::compile_list(Operator::FoundInEither, query_list)?;
        Ok(self.add_where(field, Predicate::FoundInEither(subs)))
    }

    pub fn found_in_all(
        &mut self,
        field: impl Into<String>,
        query_list: &[QueryListEntry<'_>],
    ) -> QueryResult<&mut Self> {
        let subs = SubQueryDescriptor::compile_list(Operator::FoundInAll, query_list)?;
        Ok(self.add_where(field, Predicate::FoundInAll(subs)))
    }

    pub fn not_found_in(
        &mut self,
        field: impl Into<String>,
        selected_key: impl Into<String>,
        query: &Query,
    ) -> &mut Self {
        let sub = SubQueryDescriptor::compile(selected_key, query);
        self.add_where(field, Predicate::NotFoundIn(sub))
    }

    pub fn not_found_in_either(
        &mut self,
        field: impl Into<String>,
        query_list: &[QueryListEntry<'_>],
    ) -> QueryResult<&mut Self> {
        let subs = SubQueryDescriptor::compile_list(Operator::NotFoundInEither, query_list)?;
        Ok(self.add_where(field, Predicate::NotFoundInEither(subs)))
    }

    // ==================
    // JSON paths
    // ==================
    //
    // Keys take the form `root.inner.path`; the predicate is registered on
    // `root` with payload `{path: "$.inner.path", value}`.

    pub fn json_equal_to(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonEq, value.into())
    }

    pub fn json_not_equal_to(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonNeq, value.into())
    }

    pub fn json_greater_than(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonGt, value.into())
    }

    pub fn json_greater_than_or_equal_to(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonGte, value.into())
    }

    pub fn json_less_than(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonLt, value.into())
    }

    pub fn json_less_than_or_equal_to(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonLte, value.into())
    }

    pub fn json_matches(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonMatches, value.into())
    }

    pub fn json_does_not_match(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonNotMatches, value.into())
    }

    pub fn json_contained_in(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonIn, value.into())
    }

    /// Registers under `jin`, the same code as [`Query::json_contained_in`].
    ///
    /// The vocabulary has no negated JSON membership code; servers
    /// currently receive this as a positive membership test.
    pub fn json_not_contained_in(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonIn, value.into())
    }

    pub fn json_starts_with(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonStartsWith, value.into())
    }

    pub fn json_ends_with(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonEndsWith, value.into())
    }

    pub fn json_contains(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_json_where(key, Predicate::JsonContains, value.into())
    }

    // ==================
    // Sort & pagination
    // ==================

    /// Append ascending directives, one per field, in order
    pub fn sort_by(&mut self, fields: impl Into<FieldList>) -> &mut Self {
        self.add_sort(fields.into(), SortDirection::Ascending)
    }

    /// Append descending directives, one per field, in order
    pub fn sort_by_descending(&mut self, fields: impl Into<FieldList>) -> &mut Self {
        self.add_sort(fields.into(), SortDirection::Descending)
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(&mut self, skip: u64) -> &mut Self {
        self.skip = Some(skip);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::subquery::entry;
    use serde_json::json;

    type Apply<'a> = Box<dyn Fn(&mut Query) + 'a>;

    fn case<'a>(
        code: &'static str,
        apply: impl Fn(&mut Query) + 'a,
        payload: Value,
    ) -> (&'static str, Apply<'a>, Value) {
        (code, Box::new(apply), payload)
    }

    fn at_path(value: Value) -> Value {
        json!({"path": "$.a.b", "value": value})
    }

    #[test]
    fn test_every_predicate_method_wire_code() {
        let mut team = Query::new("team");
        team.equal_to("active", true);
        let sub = json!({"className": "team", "select": "id", "where": {"active": {"eq": true}}});

        let plain = vec![
            case("eq", |q| { q.equal_to("f", 1); }, json!(1)),
            case("neq", |q| { q.not_equal_to("f", 2); }, json!(2)),
            case("gt", |q| { q.greater_than("f", 3); }, json!(3)),
            case("gte", |q| { q.greater_than_or_equal_to("f", 4); }, json!(4)),
            case("lt", |q| { q.less_than("f", 5); }, json!(5)),
            case("lte", |q| { q.less_than_or_equal_to("f", 6); }, json!(6)),
            case("ex", |q| { q.exists("f"); }, json!(true)),
            case("ex", |q| { q.does_not_exist("f"); }, json!(false)),
            case("in", |q| { q.contained_in("f", [1, 2]); }, json!([1, 2])),
            case("inx", |q| { q.contained_in_or_does_not_exist("f", [3]); }, json!([3])),
            case("nin", |q| { q.not_contained_in("f", ["x"]); }, json!(["x"])),
            case("str", |q| { q.starts_with("f", "ab"); }, json!("ab")),
            case("end", |q| { q.ends_with("f", "yz"); }, json!("yz")),
            case("has", |q| { q.contains("f", "needle"); }, json!("needle")),
            case("hasi", |q| { q.contains_either("f", ["a", "b"]); }, json!(["a", "b"])),
            case("hasa", |q| { q.contains_all("f", ["c"]); }, json!(["c"])),
            case("fi", |q| { q.found_in("f", "id", &team); }, sub.clone()),
            case(
                "fie",
                |q| { q.found_in_either("f", &[entry("id", &team)]).unwrap(); },
                json!([sub.clone()]),
            ),
            case(
                "fia",
                |q| { q.found_in_all("f", &[entry("id", &team)]).unwrap(); },
                json!([sub.clone()]),
            ),
            case("nfi", |q| { q.not_found_in("f", "id", &team); }, sub.clone()),
            case(
                "nfe",
                |q| { q.not_found_in_either("f", &[entry("id", &team)]).unwrap(); },
                json!([sub.clone()]),
            ),
            case("jeq", |q| { q.json_equal_to("f.a.b", 1); }, at_path(json!(1))),
            case("jneq", |q| { q.json_not_equal_to("f.a.b", 2); }, at_path(json!(2))),
            case("jgt", |q| { q.json_greater_than("f.a.b", 3); }, at_path(json!(3))),
            case("jgte", |q| { q.json_greater_than_or_equal_to("f.a.b", 4); }, at_path(json!(4))),
            case("jlt", |q| { q.json_less_than("f.a.b", 5); }, at_path(json!(5))),
            case("jlte", |q| { q.json_less_than_or_equal_to("f.a.b", 6); }, at_path(json!(6))),
            case("jmt", |q| { q.json_matches("f.a.b", "^a"); }, at_path(json!("^a"))),
            case("jnmt", |q| { q.json_does_not_match("f.a.b", "^b"); }, at_path(json!("^b"))),
            case("jin", |q| { q.json_contained_in("f.a.b", json!([1])); }, at_path(json!([1]))),
            case("jin", |q| { q.json_not_contained_in("f.a.b", json!([2])); }, at_path(json!([2]))),
            case("jstr", |q| { q.json_starts_with("f.a.b", "pre"); }, at_path(json!("pre"))),
            case("jend", |q| { q.json_ends_with("f.a.b", "suf"); }, at_path(json!("suf"))),
            case("jhas", |q| { q.json_contains("f.a.b", "mid"); }, at_path(json!("mid"))),
        ];

        let mut seen = Vec::new();
        for (code, apply, payload) in &plain {
            let mut query = Query::new("post");
            apply(&mut query);

            let mut expected = serde_json::Map::new();
            expected.insert(code.to_string(), payload.clone());
            assert_eq!(
                query.constraints().to_value(),
                json!({ "f": expected }),
                "operator {}",
                code
            );
            seen.push(*code);
        }

        for op in Operator::ALL {
            assert!(seen.contains(&op.as_str()), "no method covers {}", op);
        }
    }

    #[test]
    fn test_json_keys_accept_owned_strings() {
        let root = String::from("meta");
        let mut query = Query::new("post");
        query.json_equal_to(format!("{}.lang", root), "en");

        assert_eq!(
            query.constraints().to_value(),
            json!({"meta": {"jeq": {"path": "$.lang", "value": "en"}}})
        );
    }

    #[test]
    fn test_chaining_distinct_fields() {
        let mut query = Query::new("post");
        query
            .equal_to("status", "published")
            .greater_than("views", 100)
            .exists("cover")
            .starts_with("title", "How");

        let where_ = query.constraints();
        assert_eq!(where_.len(), 4);
        assert_eq!(where_.get("views", Operator::Gt), Some(&Predicate::Gt(json!(100))));
        assert_eq!(where_.get("cover", Operator::Exists), Some(&Predicate::Exists(true)));
    }

    #[test]
    fn test_overwrite_not_accumulate() {
        let mut query = Query::new("post");
        query.less_than("views", 10).less_than("views", 20);

        assert_eq!(
            query.constraints().to_value(),
            json!({"views": {"lt": 20}})
        );
    }

    #[test]
    fn test_contains_composite_key() {
        let mut query = Query::new("post");
        query.contains(["title", "body"], "rust");

        assert_eq!(
            query.constraints().to_value(),
            json!({"title|body": {"has": "rust"}})
        );
    }

    #[test]
    fn test_membership_payloads() {
        let mut query = Query::new("post");
        query
            .contained_in("status", ["draft", "review"])
            .contained_in_or_does_not_exist("tag", vec![1, 2])
            .not_contained_in("owner", Vec::<Value>::new())
            .contains_either("labels", ["a", "b"])
            .contains_all("flags", ["x"]);

        assert_eq!(
            query.constraints().to_value(),
            json!({
                "status": {"in": ["draft", "review"]},
                "tag": {"inx": [1, 2]},
                "owner": {"nin": []},
                "labels": {"hasi": ["a", "b"]},
                "flags": {"hasa": ["x"]}
            })
        );
    }

    #[test]
    fn test_json_path_predicates() {
        let mut query = Query::new("player");
        query
            .json_greater_than("stats.level", 10)
            .json_starts_with("stats.guild.name", "Red");

        assert_eq!(
            query.constraints().to_value(),
            json!({
                "stats": {
                    "jgt": {"path": "$.level", "value": 10},
                    "jstr": {"path": "$.guild.name", "value": "Red"}
                }
            })
        );
    }

    #[test]
    fn test_json_not_contained_in_shares_code() {
        let mut query = Query::new("player");
        query.json_contained_in("stats.class", json!(["mage"]));
        query.json_not_contained_in("stats.class", json!(["rogue"]));

        let field = query.constraints().field("stats").unwrap();
        assert_eq!(field.len(), 1);
        assert_eq!(
            query.constraints().to_value(),
            json!({"stats": {"jin": {"path": "$.class", "value": ["rogue"]}}})
        );
    }

    #[test]
    fn test_sort_single_and_many() {
        let mut query = Query::new("post");
        query.sort_by("title").sort_by_descending(["createdAt", "views"]);

        assert_eq!(
            query.sort_directives(),
            &[
                SortDirective::asc("title"),
                SortDirective::desc("createdAt"),
                SortDirective::desc("views"),
            ]
        );
    }

    #[test]
    fn test_include_keeps_duplicates() {
        let mut query = Query::new("post");
        query.include("author").include("author");

        assert_eq!(query.includes(), &["author".to_string(), "author".to_string()]);
    }

    #[test]
    fn test_pagination_last_write_wins() {
        let mut query = Query::new("post");
        query.limit(10).skip(5).limit(25);

        let descriptor = query.descriptor();
        assert_eq!(descriptor.limit, Some(25));
        assert_eq!(descriptor.skip, Some(5));
    }

    #[test]
    fn test_found_in_snapshot() {
        let mut owners = Query::new("user");
        owners.equal_to("active", true);

        let mut query = Query::new("post");
        query.found_in("owner", "id", &owners);
        owners.equal_to("active", false).limit(3);

        assert_eq!(
            query.constraints().to_value(),
            json!({
                "owner": {"fi": {
                    "className": "user",
                    "select": "id",
                    "where": {"active": {"eq": true}}
                }}
            })
        );
    }
}
