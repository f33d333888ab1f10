//! Provider - trait abstracting resource operations
//!
//! A provider owns the SDK clients for one cloud and translates host records
//! into API calls. Every operation is a single request/response exchange;
//! retries and transport concerns live inside the SDK, not here.

use std::future::Future;
use std::pin::Pin;

use crate::registry::Registry;
use crate::resource::{Resource, ResourceId, State};

/// Error surfaced to the host's diagnostics channel
///
/// SDK errors are wrapped with a contextual message and the originating
/// resource; there is no local recovery or retry policy.
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    pub resource_id: Option<ResourceId>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.resource_id {
            Some(id) => write!(f, "{}: {}", id, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource_id: None,
            cause: None,
        }
    }

    /// Wrap an underlying error with a contextual message
    pub fn wrap(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            resource_id: None,
            cause: Some(Box::new(cause)),
        }
    }

    pub fn for_resource(mut self, id: ResourceId) -> Self {
        self.resource_id = Some(id);
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async trait operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Main provider trait
///
/// Implementations are synchronous in structure: one operation, one or two
/// SDK calls, no background work or shared mutable state. Cancellation is
/// dropping the returned future.
pub trait Provider: Send + Sync {
    /// Name of this provider (e.g., "aws")
    fn name(&self) -> &'static str;

    /// Registration tables for every service package this provider carries
    fn registry(&self) -> Registry;

    /// Read a managed resource by its provider-side identifier
    ///
    /// Returns `State::not_found()` if the remote resource no longer exists,
    /// so the host can drop the record.
    fn read(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<State>>;

    /// Resolve a data source from its configured filters
    ///
    /// A data source that matches nothing is an error, never an empty state.
    fn read_data_source(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Create a resource; the returned state carries the new identifier
    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Update a resource in place
    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Delete a resource
    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>>;
}

impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn registry(&self) -> Registry {
        (**self).registry()
    }

    fn read(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).read(id, identifier)
    }

    fn read_data_source(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).read_data_source(resource)
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).create(resource)
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).update(id, identifier, from, to)
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        (**self).delete(id, identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Registry, ServicePackage};

    struct EmptyService;

    impl ServicePackage for EmptyService {
        fn service_name(&self) -> &'static str {
            "empty"
        }
    }

    struct MockProvider;

    impl Provider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn registry(&self) -> Registry {
            let packages: Vec<Box<dyn ServicePackage>> = vec![Box::new(EmptyService)];
            Registry::new(&packages).unwrap()
        }

        fn read(
            &self,
            id: &ResourceId,
            _identifier: &str,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            let id = id.clone();
            Box::pin(async move { Ok(State::not_found(id)) })
        }

        fn read_data_source(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            let id = resource.id.clone();
            Box::pin(async move {
                Err(ProviderError::new("no matching resource").for_resource(id))
            })
        }

        fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            let id = resource.id.clone();
            let attrs = resource.attributes.clone();
            Box::pin(async move { Ok(State::existing(id, attrs).with_identifier("mock-id-123")) })
        }

        fn update(
            &self,
            id: &ResourceId,
            _identifier: &str,
            _from: &State,
            to: &Resource,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            let id = id.clone();
            let attrs = to.attributes.clone();
            Box::pin(async move { Ok(State::existing(id, attrs)) })
        }

        fn delete(&self, _id: &ResourceId, _identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn read_missing_returns_not_found() {
        let provider = MockProvider;
        let id = ResourceId::new("mock.queue", "main");
        let state = provider.read(&id, "gone").await.unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn create_returns_identifier() {
        let provider = MockProvider;
        let resource = Resource::new("mock.queue", "main");
        let state = provider.create(&resource).await.unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some("mock-id-123"));
    }

    #[tokio::test]
    async fn data_source_miss_is_an_error() {
        let provider = MockProvider;
        let resource = Resource::new("mock.queue", "main").with_read_only(true);
        let err = provider.read_data_source(&resource).await.unwrap_err();
        assert!(err.to_string().contains("mock.queue.main"));
    }

    #[test]
    fn error_display_includes_resource_context() {
        let err = ProviderError::new("boom")
            .for_resource(ResourceId::new("batch.job_queue", "main"));
        assert_eq!(err.to_string(), "batch.job_queue.main: boom");
    }
}
