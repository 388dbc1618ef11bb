//! Header-based authentication
//!
//! Trusts a user id and consumer key injected by a fronting gateway that has
//! already verified the caller's credentials.

use std::collections::HashSet;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};

use super::{Authenticator, Identity};
use crate::config::AuthConfig;

pub struct HeaderAuthenticator {
    user_header: HeaderName,
    consumer_header: HeaderName,
    admin_users: HashSet<String>,
}

impl HeaderAuthenticator {
    pub fn new(user_header: HeaderName, consumer_header: HeaderName) -> Self {
        Self {
            user_header,
            consumer_header,
            admin_users: HashSet::new(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.user_header.clone(), config.consumer_header.clone())
            .with_admin_users(config.admin_users.iter().cloned())
    }

    pub fn with_admin_users(mut self, users: impl IntoIterator<Item = String>) -> Self {
        self.admin_users.extend(users);
        self
    }

    fn header_value<'h>(headers: &'h HeaderMap, name: &HeaderName) -> Option<&'h str> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

#[async_trait]
impl Authenticator for HeaderAuthenticator {
    async fn resolve_identity(&self, headers: &HeaderMap) -> Option<Identity> {
        let user = Self::header_value(headers, &self.user_header)?;
        let consumer = Self::header_value(headers, &self.consumer_header)?;

        let mut identity = Identity::new(user, consumer);
        if self.admin_users.contains(user) {
            identity = identity.admin();
        }
        Some(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn authenticator() -> HeaderAuthenticator {
        HeaderAuthenticator::new(
            HeaderName::from_static("x-annotator-user-id"),
            HeaderName::from_static("x-annotator-consumer-key"),
        )
        .with_admin_users(["root".to_string()])
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(*value));
        }
        headers
    }

    #[tokio::test]
    async fn test_resolves_identity() {
        let identity = authenticator()
            .resolve_identity(&headers(&[
                ("x-annotator-user-id", "alice"),
                ("x-annotator-consumer-key", "annotateit"),
            ]))
            .await
            .unwrap();

        assert_eq!(identity, Identity::new("alice", "annotateit"));
    }

    #[tokio::test]
    async fn test_requires_both_headers() {
        let auth = authenticator();
        assert!(auth
            .resolve_identity(&headers(&[("x-annotator-user-id", "alice")]))
            .await
            .is_none());
        assert!(auth
            .resolve_identity(&headers(&[
                ("x-annotator-user-id", "  "),
                ("x-annotator-consumer-key", "annotateit"),
            ]))
            .await
            .is_none());
        assert!(auth.resolve_identity(&HeaderMap::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_admin_users() {
        let identity = authenticator()
            .resolve_identity(&headers(&[
                ("x-annotator-user-id", "root"),
                ("x-annotator-consumer-key", "annotateit"),
            ]))
            .await
            .unwrap();

        assert!(identity.is_admin);
    }
}
