//! Annotator Store
//!
//! A REST API for annotation records. The crate routes requests and shapes
//! payloads; storage, authentication and authorization sit behind traits.
//!
//! # Modules
//!
//! - `annotations`: the annotation record, field filtering and lifecycle hooks
//! - `auth`: identity types plus the authenticator and authorizer seams
//! - `store`: the storage trait and its SQLite implementation
//! - `routes`: axum handlers and the application router
//! - `middleware`: identity resolution, CORS and JSON shaping

pub mod annotations;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

pub use error::{AppError, StoreError};
pub use routes::router;
pub use state::AppState;
