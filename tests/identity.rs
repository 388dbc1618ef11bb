//! Identity resolution middleware in isolation.

use axum::body::Body;
use axum::http::{HeaderName, Request, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use annotator_store::auth::{CallerIdentity, HeaderAuthenticator, Identity, PermissionsAuthorizer};
use annotator_store::middleware::resolve_identity;
use annotator_store::store::SqliteAnnotationStore;
use annotator_store::AppState;

async fn whoami(Extension(caller): Extension<CallerIdentity>) -> Json<Value> {
    match caller {
        CallerIdentity::Authenticated(identity) => Json(json!({
            "user": identity.id,
            "consumer": identity.consumer.key
        })),
        CallerIdentity::Anonymous => Json(json!("anonymous")),
    }
}

async fn make_app(upstream: Option<Identity>) -> Router {
    let store = SqliteAnnotationStore::in_memory().await.unwrap();
    let authenticator = HeaderAuthenticator::new(
        HeaderName::from_static("x-annotator-user-id"),
        HeaderName::from_static("x-annotator-consumer-key"),
    );
    let state = AppState::new(store, authenticator, PermissionsAuthorizer::new());

    let app = Router::new()
        .route("/", get(whoami))
        .layer(from_fn_with_state(state.clone(), resolve_identity));

    let app = match upstream {
        Some(identity) => app.layer(Extension(CallerIdentity::Authenticated(identity))),
        None => app,
    };

    app.with_state(state)
}

async fn call(app: Router, user: Option<&str>) -> Value {
    let mut builder = Request::get("/");
    if let Some(user) = user {
        builder = builder
            .header("x-annotator-user-id", user)
            .header("x-annotator-consumer-key", "annotateit");
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_anonymous_when_unresolved() {
    let app = make_app(None).await;
    assert_eq!(call(app, None).await, json!("anonymous"));
}

#[tokio::test]
async fn test_resolved_user_is_bound() {
    let app = make_app(None).await;
    assert_eq!(
        call(app, Some("alice")).await,
        json!({"user": "alice", "consumer": "annotateit"})
    );
}

#[tokio::test]
async fn test_upstream_identity_survives_failed_resolution() {
    let app = make_app(Some(Identity::new("gateway-user", "partner"))).await;
    assert_eq!(
        call(app, None).await,
        json!({"user": "gateway-user", "consumer": "partner"})
    );
}

#[tokio::test]
async fn test_resolved_user_replaces_upstream_identity() {
    let app = make_app(Some(Identity::new("gateway-user", "partner"))).await;
    assert_eq!(
        call(app, Some("alice")).await,
        json!({"user": "alice", "consumer": "annotateit"})
    );
}
