//! Annotation record types
//!
//! An annotation is an open-ended JSON object. Only a handful of keys carry
//! meaning for the store; everything else is opaque payload kept verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields a client may never supply when creating an annotation
pub const CREATE_FILTER_FIELDS: &[&str] = &["updated", "created", "consumer"];

/// Fields a client may never change through an update
pub const UPDATE_FILTER_FIELDS: &[&str] = &["updated", "created", "user", "consumer"];

/// A stored annotation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation(Map<String, Value>);

/// Owner of an annotation as it appears in the `user` field
///
/// Clients send either a bare id or an object carrying an `id` alongside
/// arbitrary profile data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    PlainId(String),
    Record {
        id: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::PlainId(id) => id,
            UserRef::Record { id, .. } => id,
        }
    }
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// The storage-assigned id, if the annotation has been saved
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.insert("id", id.into());
    }

    pub fn consumer(&self) -> Option<&str> {
        self.0.get("consumer").and_then(Value::as_str)
    }

    pub fn set_consumer(&mut self, key: impl Into<String>) {
        self.insert("consumer", key.into());
    }

    /// The `user` field parsed as either of its accepted shapes
    pub fn user(&self) -> Option<UserRef> {
        self.0
            .get("user")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Best guess at the owner's user id
    ///
    /// Empty ids and objects without a string `id` count as no owner.
    pub fn owner_id(&self) -> Option<String> {
        self.user()
            .map(|u| u.id().to_string())
            .filter(|id| !id.is_empty())
    }

    pub fn set_user(&mut self, id: impl Into<String>) {
        self.insert("user", id.into());
    }

    /// Stored permissions, `{}` when the field is absent
    pub fn permissions(&self) -> Value {
        self.0
            .get("permissions")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// User and group ids granted `action` by the permissions field
    pub fn permitted(&self, action: &str) -> Vec<&str> {
        self.0
            .get("permissions")
            .and_then(|p| p.get(action))
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn created(&self) -> Option<&str> {
        self.0.get("created").and_then(Value::as_str)
    }

    pub fn updated(&self) -> Option<&str> {
        self.0.get("updated").and_then(Value::as_str)
    }

    /// Shallow merge: keys in `changes` replace stored values, others are kept
    pub fn merge(&mut self, changes: Map<String, Value>) {
        for (key, value) in changes {
            self.0.insert(key, value);
        }
    }
}

impl From<Map<String, Value>> for Annotation {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Drop server-controlled fields from client input
pub fn filter_input(mut fields: Map<String, Value>, filtered: &[&str]) -> Map<String, Value> {
    for field in filtered {
        fields.remove(*field);
    }
    fields
}
