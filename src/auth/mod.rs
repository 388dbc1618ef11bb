//! Authentication and authorization seams
//!
//! Handlers never validate credentials or evaluate permissions themselves.
//! An [`Authenticator`] turns request headers into an [`Identity`], and an
//! [`Authorizer`] decides whether that identity may act on an annotation.

mod header;
mod permissions;

pub use header::HeaderAuthenticator;
pub use permissions::{
    PermissionsAuthorizer, GROUP_AUTHENTICATED, GROUP_CONSUMER, GROUP_WORLD,
};

use std::fmt;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::annotations::Annotation;

/// API client an identity authenticated through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumer {
    pub key: String,
}

impl Consumer {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub consumer: Consumer,
    pub is_admin: bool,
}

impl Identity {
    pub fn new(id: impl Into<String>, consumer_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            consumer: Consumer::new(consumer_key),
            is_admin: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// Who is making the current request
///
/// Bound once per request as a request extension before any handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentity {
    Authenticated(Identity),
    Anonymous,
}

impl CallerIdentity {
    pub fn user(&self) -> Option<&Identity> {
        match self {
            CallerIdentity::Authenticated(identity) => Some(identity),
            CallerIdentity::Anonymous => None,
        }
    }
}

/// Actions checked against an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Read,
    Update,
    Delete,
    Admin,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Admin => "admin",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a request to a user
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn resolve_identity(&self, headers: &HeaderMap) -> Option<Identity>;
}

/// Decides whether `identity` may perform `action` on `annotation`
pub trait Authorizer: Send + Sync {
    fn authorize(
        &self,
        annotation: &Annotation,
        action: Action,
        identity: Option<&Identity>,
    ) -> bool;
}

impl<F> Authorizer for F
where
    F: Fn(&Annotation, Action, Option<&Identity>) -> bool + Send + Sync,
{
    fn authorize(
        &self,
        annotation: &Annotation,
        action: Action,
        identity: Option<&Identity>,
    ) -> bool {
        self(annotation, action, identity)
    }
}
