//! Application state management

use std::sync::Arc;

use crate::annotations::LifecycleHooks;
use crate::auth::{Authenticator, Authorizer};
use crate::store::AnnotationStore;

/// Shared application state
///
/// Holds the collaborators every request delegates to. Nothing in here is
/// mutated after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn AnnotationStore>,
    authenticator: Arc<dyn Authenticator>,
    authorizer: Arc<dyn Authorizer>,
    hooks: LifecycleHooks,
}

impl AppState {
    /// Create a new application state with no lifecycle hooks
    pub fn new<S, N, Z>(store: S, authenticator: N, authorizer: Z) -> Self
    where
        S: AnnotationStore + 'static,
        N: Authenticator + 'static,
        Z: Authorizer + 'static,
    {
        Self::with_hooks(store, authenticator, authorizer, LifecycleHooks::default())
    }

    pub fn with_hooks<S, N, Z>(
        store: S,
        authenticator: N,
        authorizer: Z,
        hooks: LifecycleHooks,
    ) -> Self
    where
        S: AnnotationStore + 'static,
        N: Authenticator + 'static,
        Z: Authorizer + 'static,
    {
        Self {
            inner: Arc::new(AppStateInner {
                store: Arc::new(store),
                authenticator: Arc::new(authenticator),
                authorizer: Arc::new(authorizer),
                hooks,
            }),
        }
    }

    /// Get the annotation store
    pub fn store(&self) -> &dyn AnnotationStore {
        self.inner.store.as_ref()
    }

    /// Get the authenticator
    pub fn authenticator(&self) -> &dyn Authenticator {
        self.inner.authenticator.as_ref()
    }

    /// Get the authorizer
    pub fn authorizer(&self) -> &dyn Authorizer {
        self.inner.authorizer.as_ref()
    }

    /// Get the lifecycle hooks
    pub fn hooks(&self) -> &LifecycleHooks {
        &self.inner.hooks
    }
}
