//! Query executor
//!
//! Every execution method fails synchronously with `MissingConfiguration`
//! when no transport is bound. Otherwise the query is snapshotted before
//! the returned future is created, so later builder mutation has no effect
//! on a request in flight.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::TryFutureExt;
use serde_json::Value;

use crate::collection::ResultCollection;
use crate::error::{QueryError, QueryResult};
use crate::object::{ClassRegistry, DomainObject, Hydratable};
use crate::observability::{Logger, QueryScope, Severity};
use crate::query::{class_route, Query};
use crate::transport::Transport;

/// Future returned by the execution methods
pub type QueryFuture<'a, T> = Pin<Box<dyn Future<Output = QueryResult<T>> + Send + 'a>>;

/// Executes queries through an injected transport
pub struct QueryExecutor<T = DomainObject> {
    transport: Option<Arc<dyn Transport>>,
    registry: ClassRegistry<T>,
    log_level: Severity,
}

impl<T> QueryExecutor<T>
where
    T: Hydratable + Send + 'static,
{
    /// Creates an executor with no transport bound.
    ///
    /// Query events are filtered at the process default level until
    /// [`QueryExecutor::with_log_level`] sets one for this executor.
    pub fn new() -> Self {
        Self {
            transport: None,
            registry: ClassRegistry::new(),
            log_level: Logger::min_severity(),
        }
    }

    /// Creates an executor bound to `transport`
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let mut executor = Self::new();
        executor.bind(transport);
        executor
    }

    pub fn with_log_level(mut self, level: Severity) -> Self {
        self.log_level = level;
        self
    }

    pub fn log_level(&self) -> Severity {
        self.log_level
    }

    pub fn with_registry(mut self, registry: ClassRegistry<T>) -> Self {
        self.registry = registry;
        self
    }

    /// Bind or replace the transport
    pub fn bind(&mut self, transport: Arc<dyn Transport>) {
        self.transport = Some(transport);
    }

    pub fn is_bound(&self) -> bool {
        self.transport.is_some()
    }

    pub fn registry(&self) -> &ClassRegistry<T> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ClassRegistry<T> {
        &mut self.registry
    }

    fn transport(&self) -> QueryResult<Arc<dyn Transport>> {
        self.transport
            .clone()
            .ok_or_else(|| QueryError::missing_configuration("Missing transport for query"))
    }

    /// Run `query` and rehydrate every returned record.
    pub fn find<'a>(&'a self, query: &Query) -> QueryResult<QueryFuture<'a, ResultCollection<T>>> {
        let transport = self.transport()?;
        let descriptor = query.descriptor();
        let class_name = query.class_name().to_string();
        let route = class_route(&class_name);
        let log_level = self.log_level;

        Ok(Box::pin(async move {
            let scope = QueryScope::dispatch(route.as_str(), log_level);

            let records = match transport.find(&route, &descriptor).await {
                Ok(records) => records,
                Err(e) => {
                    scope.fail("TRANSPORT_FAILURE", &e.message);
                    return Err(QueryError::Transport(e));
                }
            };

            let objects = records
                .into_iter()
                .map(|record| self.registry.rehydrate(&class_name, record))
                .collect::<QueryResult<Vec<T>>>();

            match objects {
                Ok(objects) => {
                    scope.complete(objects.len());
                    Ok(ResultCollection::new(objects))
                }
                Err(e) => {
                    scope.fail(e.code(), &e.to_string());
                    Err(e)
                }
            }
        }))
    }

    /// Run `query` and settle into `next` on success or `fail` on failure.
    ///
    /// A missing transport is still reported synchronously.
    pub fn find_then<'a, U, N, F>(
        &'a self,
        query: &Query,
        next: N,
        fail: F,
    ) -> QueryResult<Pin<Box<dyn Future<Output = U> + Send + 'a>>>
    where
        U: 'a,
        N: FnOnce(ResultCollection<T>) -> U + Send + 'a,
        F: FnOnce(QueryError) -> U + Send + 'a,
    {
        let pending = self.find(query)?;
        Ok(Box::pin(async move {
            match pending.await {
                Ok(collection) => next(collection),
                Err(e) => fail(e),
            }
        }))
    }

    /// Fetch the first matching object.
    ///
    /// Forces `limit = 1` and `skip = 0` on `query` before executing. An
    /// unbound executor fails without touching `query`.
    pub fn first<'a>(&'a self, query: &mut Query) -> QueryResult<QueryFuture<'a, Option<T>>> {
        self.transport()?;
        query.limit(1).skip(0);
        let pending = self.find(query)?;
        Ok(Box::pin(pending.map_ok(ResultCollection::into_first)))
    }

    /// Fetch the object with `id`.
    ///
    /// Adds an `id` equality constraint to `query`, then behaves as
    /// [`QueryExecutor::first`].
    pub fn get<'a>(
        &'a self,
        query: &mut Query,
        id: impl Into<Value>,
    ) -> QueryResult<QueryFuture<'a, Option<T>>> {
        self.transport()?;
        query.equal_to("id", id);
        self.first(query)
    }
}

impl<T> Default for QueryExecutor<T>
where
    T: Hydratable + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for QueryExecutor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("bound", &self.transport.is_some())
            .field("registry", &self.registry)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::object::HasClassName;
    use crate::transport::MemoryTransport;
    use serde_json::json;

    fn bound() -> (Arc<MemoryTransport>, QueryExecutor) {
        let transport = Arc::new(MemoryTransport::new());
        let executor = QueryExecutor::with_transport(transport.clone());
        (transport, executor)
    }

    #[test]
    fn test_unbound_fails_synchronously() {
        let executor = QueryExecutor::<DomainObject>::new();
        let mut query = Query::new("post");

        assert!(matches!(
            executor.find(&query),
            Err(QueryError::MissingConfiguration(_))
        ));
        assert!(matches!(
            executor.first(&mut query),
            Err(QueryError::MissingConfiguration(_))
        ));
        assert!(matches!(
            executor.get(&mut query, "x1"),
            Err(QueryError::MissingConfiguration(_))
        ));
    }

    #[tokio::test]
    async fn test_find_routes_and_rehydrates() {
        let (transport, executor) = bound();
        transport.respond_with(vec![
            json!({"id": "p1", "title": "One"}),
            json!({"id": "p2", "title": "Two"}),
        ]);

        let mut query = Query::new("post");
        query.equal_to("published", true);

        let posts = executor.find(&query).unwrap().await.unwrap();

        assert_eq!(posts.count(), 2);
        assert_eq!(posts.first().unwrap().class_name(), Some("post"));
        assert_eq!(posts.first().unwrap().id(), "p1");

        let request = transport.last_request().unwrap();
        assert_eq!(request.route, "classes/post");
        assert_eq!(request.params, query.descriptor());
    }

    #[tokio::test]
    async fn test_user_class_route() {
        let (transport, executor) = bound();

        executor.find(&Query::new("user")).unwrap().await.unwrap();

        assert_eq!(transport.last_request().unwrap().route, "users");
    }

    #[tokio::test]
    async fn test_snapshot_before_await() {
        let (transport, executor) = bound();
        let mut query = Query::new("post");
        query.limit(5);

        let pending = executor.find(&query).unwrap();
        query.limit(50).equal_to("late", true);
        pending.await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.params.limit, Some(5));
        assert!(request.params.constraints.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_passes_through() {
        let (transport, executor) = bound();
        transport.fail_with(TransportError::status(503, "unavailable"));

        let err = executor.find(&Query::new("post")).unwrap().await.unwrap_err();

        assert_eq!(
            err.as_transport(),
            Some(&TransportError::status(503, "unavailable"))
        );
    }

    #[tokio::test]
    async fn test_irregular_rows_still_rehydrate() {
        let (transport, executor) = bound();
        transport.respond_with(vec![
            json!({"id": "a"}),
            json!({"id": "b", "created_at": "2024-03-01 12:00:00"}),
            json!({"id": null, "x": 1}),
        ]);

        let posts = executor.find(&Query::new("post")).unwrap().await.unwrap();

        assert_eq!(posts.count(), 3);
        let ids: Vec<String> = posts.map(|p| p.id().to_string());
        assert_eq!(ids, vec!["a", "b", ""]);
        let second = posts.iter().nth(1).unwrap();
        assert!(second.created_at().is_none());
        assert_eq!(second.get("created_at"), Some(&json!("2024-03-01 12:00:00")));
    }

    #[tokio::test]
    async fn test_non_object_row_fails_query() {
        let (transport, executor) = bound();
        transport.respond_with(vec![json!({"id": "ok"}), json!("not a record")]);

        let err = executor.find(&Query::new("post")).unwrap().await.unwrap_err();
        assert_eq!(err.code(), "INVALID_RECORD");
    }

    #[tokio::test]
    async fn test_first_forces_pagination() {
        let (transport, executor) = bound();
        transport.respond_with(vec![json!({"id": "p1"})]);

        let mut query = Query::new("post");
        query.limit(20).skip(40);

        let first = executor.first(&mut query).unwrap().await.unwrap();

        assert_eq!(first.map(|p| p.id().to_string()), Some("p1".to_string()));
        let params = transport.last_request().unwrap().params;
        assert_eq!((params.limit, params.skip), (Some(1), Some(0)));
    }

    #[tokio::test]
    async fn test_first_on_empty_result() {
        let (_transport, executor) = bound();

        let first = executor.first(&mut Query::new("post")).unwrap().await.unwrap();
        assert!(first.is_none());
    }

    #[tokio::test]
    async fn test_find_then_continuations() {
        let (transport, executor) = bound();
        transport
            .respond_with(vec![json!({"id": "a"}), json!({"id": "b"})])
            .fail_with(TransportError::network("reset"));
        let query = Query::new("post");

        let ok = executor
            .find_then(&query, |c| Ok(c.count()), |e| Err(e.code()))
            .unwrap()
            .await;
        let failed = executor
            .find_then(&query, |c| Ok(c.count()), |e| Err(e.code()))
            .unwrap()
            .await;

        assert_eq!(ok, Ok(2));
        assert_eq!(failed, Err("TRANSPORT_FAILURE"));
    }
}
