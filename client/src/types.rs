//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's wire format but are defined independently;
//! the integration test catches schema drift. The server never sends an
//! `id` field, so [`Todo::id`] recovers the identity from the item's url.

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub title: String,
    pub completed: bool,
    pub order: i64,
    pub url: String,
}

impl Todo {
    /// Identity encoded as the last segment of `url`, if it is numeric.
    pub fn id(&self) -> Option<u64> {
        self.url.rsplit('/').next()?.parse().ok()
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: i64,
}

/// Request payload for a partial update. Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}
