//! Annotation module
//!
//! Annotations are free-form JSON objects with a few reserved keys:
//!
//! - `id` - assigned by the store on first save
//! - `user` - owner, either a bare id or an object with an `id`
//! - `consumer` - the API client the annotation was created through
//! - `permissions` - per-action lists of user and group ids
//! - `created` / `updated` - timestamps maintained by the store

mod hooks;
mod types;

pub use hooks::{AnnotationHook, LifecycleHooks};
pub use types::{
    filter_input, Annotation, UserRef, CREATE_FILTER_FIELDS, UPDATE_FILTER_FIELDS,
};
