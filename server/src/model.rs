//! Todo records and their wire representations.
//!
//! # Design
//! The stored [`Todo`] carries the server-assigned identity but no url. The
//! url only exists on [`TodoRepresentation`], which is built fresh for every
//! response from the request's [`ResourceBase`]. Input DTOs never accept an
//! identity: `id` in a request body is an unknown field and is dropped.

use serde::{Deserialize, Serialize};

use crate::dispatch::ResourceBase;

/// Server-assigned identity. `0` marks a record that has not been saved yet.
pub type TodoId = u64;

/// Identity value of a record the store has not seen.
pub const UNSAVED: TodoId = 0;

/// A todo item as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub order: i64,
}

impl Todo {
    pub fn is_saved(&self) -> bool {
        self.id != UNSAVED
    }

    /// Overwrite the mutable fields with whatever the patch carries.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }

    pub fn represent(&self, base: &ResourceBase) -> TodoRepresentation {
        TodoRepresentation {
            title: self.title.clone(),
            completed: self.completed,
            order: self.order,
            url: base.todo_url(self.id),
        }
    }
}

/// Request payload for `POST /todos`. Absent and `null` fields take their
/// zero value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i64>,
}

impl From<NewTodo> for Todo {
    fn from(input: NewTodo) -> Self {
        Todo {
            id: UNSAVED,
            title: input.title.unwrap_or_default(),
            completed: input.completed.unwrap_or_default(),
            order: input.order.unwrap_or_default(),
        }
    }
}

/// Request payload for `PATCH /todos/{id}`. Only fields present in the JSON
/// are applied; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i64>,
}

/// A todo as it goes over the wire. The identity is only visible as the
/// trailing segment of `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoRepresentation {
    pub title: String,
    pub completed: bool,
    pub order: i64,
    pub url: String,
}
