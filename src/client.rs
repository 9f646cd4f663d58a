//! Client facade
//!
//! Owns the configuration and one executor. The transport is injected
//! explicitly and the log level belongs to the client; nothing is bound
//! globally.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::collection::ResultCollection;
use crate::config::ClientConfig;
use crate::error::{QueryError, QueryResult};
use crate::executor::{QueryExecutor, QueryFuture};
use crate::object::{DomainObject, Hydratable};
use crate::observability::{Event, Logger};
use crate::query::Query;
use crate::transport::Transport;

/// Entry point for building and running queries
#[derive(Debug)]
pub struct Client<T = DomainObject> {
    config: ClientConfig,
    executor: QueryExecutor<T>,
}

impl<T> Client<T>
where
    T: Hydratable + Send + 'static,
{
    /// Validate `config` and create a client with no transport bound
    pub fn new(config: ClientConfig) -> QueryResult<Self> {
        config.validate()?;

        let timeout = config
            .timeout_ms
            .map(|ms| ms.to_string())
            .unwrap_or_else(|| "default".to_string());
        Logger::event_at(
            config.log_level,
            Event::ClientInitialized,
            &[("base_url", config.base_url.as_str()), ("timeout_ms", timeout.as_str())],
        );

        let executor = QueryExecutor::new().with_log_level(config.log_level);
        Ok(Self { config, executor })
    }

    /// Bind the transport used by every execution method
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.executor.bind(transport);
        self
    }

    /// Build the transport from this client's configuration, then bind it
    pub fn with_transport_from<F>(self, connect: F) -> Self
    where
        F: FnOnce(&ClientConfig) -> Arc<dyn Transport>,
    {
        let transport = connect(&self.config);
        self.with_transport(transport)
    }

    /// Install the hydration factory for `class_name`
    pub fn register<F>(&mut self, class_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(String, Map<String, Value>) -> QueryResult<T> + Send + Sync + 'static,
    {
        self.executor.registry_mut().register(class_name, factory);
        self
    }

    /// Start a fresh query against `class_name`
    pub fn query(&self, class_name: impl Into<String>) -> Query {
        Query::new(class_name)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn executor(&self) -> &QueryExecutor<T> {
        &self.executor
    }

    pub fn find<'a>(&'a self, query: &Query) -> QueryResult<QueryFuture<'a, ResultCollection<T>>> {
        self.executor.find(query)
    }

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
        self.executor.find_then(query, next, fail)
    }

    pub fn first<'a>(&'a self, query: &mut Query) -> QueryResult<QueryFuture<'a, Option<T>>> {
        self.executor.first(query)
    }

    pub fn get<'a>(
        &'a self,
        query: &mut Query,
        id: impl Into<Value>,
    ) -> QueryResult<QueryFuture<'a, Option<T>>> {
        self.executor.get(query, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::HasClassName;
    use crate::observability::Severity;
    use crate::transport::MemoryTransport;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::new("test-key").with_log_level(Severity::Error)
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = Client::<DomainObject>::new(ClientConfig::new("")).unwrap_err();
        assert_eq!(err.code(), "MISSING_CONFIGURATION");
    }

    #[test]
    fn test_unbound_client_fails_synchronously() {
        let client: Client = Client::new(config()).unwrap();
        let query = client.query("post");

        assert!(!client.executor().is_bound());
        assert!(matches!(
            client.find(&query),
            Err(QueryError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn test_log_level_is_per_client() {
        let before = Logger::min_severity();
        let quiet: Client = Client::new(config()).unwrap();
        let chatty: Client =
            Client::new(ClientConfig::new("other-key").with_log_level(Severity::Trace)).unwrap();

        assert_eq!(quiet.executor().log_level(), Severity::Error);
        assert_eq!(chatty.executor().log_level(), Severity::Trace);
        assert_eq!(Logger::min_severity(), before);
    }

    #[tokio::test]
    async fn test_transport_built_from_config() {
        let config = config()
            .with_base_url("https://api.test")
            .with_timeout_ms(800);
        let seen = Arc::new(MemoryTransport::from_config(&config));
        let transport = seen.clone();

        let client: Client = Client::new(config).unwrap().with_transport_from(move |config| {
            assert_eq!(config.base_url, "https://api.test");
            transport as Arc<dyn Transport>
        });
        client.find(&client.query("post")).unwrap().await.unwrap();

        assert_eq!(seen.timeout_ms(), Some(800));
        assert_eq!(seen.last_request().unwrap().url, "https://api.test/classes/post");
    }

    #[tokio::test]
    async fn test_registered_factory_is_used() {
        let transport = Arc::new(MemoryTransport::new());
        transport.respond_with(vec![json!({"id": "u1", "name": "Ann"})]);

        let mut client: Client = Client::new(config()).unwrap().with_transport(transport.clone());
        client.register("user", |id, attributes| {
            let mut object = DomainObject::hydrate(id, attributes)?;
            object.set_class_name("member");
            Ok(object)
        });

        let mut query = client.query("user");
        let user = client.get(&mut query, "u1").unwrap().await.unwrap().unwrap();

        assert_eq!(user.class_name(), Some("member"));
        assert_eq!(user.get("name"), Some(&json!("Ann")));
        assert_eq!(transport.last_request().unwrap().route, "users");
    }
}
