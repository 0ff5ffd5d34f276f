//! The item store.
//!
//! # Design
//! [`TodoRepository`] is the capability the dispatcher talks to, so another
//! backend can be dropped in without touching the handlers. [`MemoryStore`]
//! is the only implementation: one `RwLock` guards both the identity counter
//! and the ordered collection, so identity assignment and the existence
//! check for updates happen under the same lock.
//!
//! The collection is a `Vec` in insertion order. Removing an item shifts
//! the tail down, which is O(n) per delete but keeps the relative order of
//! the remaining items.

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::model::{Todo, TodoId, TodoPatch};

/// Storage capability for todo items. Every method must be safe to call
/// from concurrently running request handlers.
pub trait TodoRepository: Send + Sync {
    /// All items in insertion order.
    fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// The item with `id`, or `None`.
    fn get(&self, id: TodoId) -> Result<Option<Todo>, StoreError>;

    /// Create when `todo` is unsaved, otherwise replace the stored item with
    /// the same identity. Returns the item as stored.
    ///
    /// # Errors
    /// `StoreError::NotFound` when `todo` carries an identity the store does
    /// not hold.
    fn save(&self, todo: Todo) -> Result<Todo, StoreError>;

    /// Merge `patch` into the stored item with `id` as one mutation and
    /// return the result.
    ///
    /// # Errors
    /// `StoreError::NotFound` when no item has `id`.
    fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, StoreError>;

    /// Remove the item with `id`. Removing an absent id is not an error.
    fn delete(&self, id: TodoId) -> Result<(), StoreError>;

    /// Remove every item.
    fn delete_all(&self) -> Result<(), StoreError>;
}

#[derive(Debug)]
struct Inner {
    next_id: TodoId,
    todos: Vec<Todo>,
}

impl Inner {
    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }
}

/// In-memory store. Identities start at 1 and are never reused, clearing
/// the collection does not rewind the counter.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                todos: Vec::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoRepository for MemoryStore {
    fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.inner.read().todos.clone())
    }

    fn get(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        let inner = self.inner.read();
        Ok(inner.position(id).map(|index| inner.todos[index].clone()))
    }

    fn save(&self, mut todo: Todo) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write();

        if !todo.is_saved() {
            todo.id = inner.next_id;
            inner.next_id += 1;
            inner.todos.push(todo.clone());
            tracing::debug!(id = todo.id, "created todo");
            return Ok(todo);
        }

        let index = inner.position(todo.id).ok_or(StoreError::NotFound(todo.id))?;
        inner.todos[index] = todo.clone();
        tracing::debug!(id = todo.id, "updated todo");
        Ok(todo)
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, StoreError> {
        let mut inner = self.inner.write();
        let index = inner.position(id).ok_or(StoreError::NotFound(id))?;
        let todo = &mut inner.todos[index];
        todo.apply(patch);
        tracing::debug!(id, "patched todo");
        Ok(todo.clone())
    }

    fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if let Some(index) = inner.position(id) {
            inner.todos.remove(index);
            tracing::debug!(id, "deleted todo");
        }
        Ok(())
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let cleared = inner.todos.len();
        inner.todos = Vec::new();
        tracing::debug!(cleared, "deleted all todos");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::model::UNSAVED;

    fn unsaved(title: &str) -> Todo {
        Todo {
            id: UNSAVED,
            title: title.to_string(),
            completed: false,
            order: 0,
        }
    }

    fn titles(store: &MemoryStore) -> Vec<String> {
        store.list().unwrap().into_iter().map(|t| t.title).collect()
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = MemoryStore::new();
        assert!(store.list().unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn create_assigns_sequential_ids_from_one() {
        let store = MemoryStore::new();
        let a = store.save(unsaved("a")).unwrap();
        let b = store.save(unsaved("b")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(titles(&store), vec!["a", "b"]);
    }

    #[test]
    fn get_returns_saved_item() {
        let store = MemoryStore::new();
        let created = store.save(unsaved("a")).unwrap();
        assert_eq!(store.get(created.id).unwrap(), Some(created));
        assert_eq!(store.get(99).unwrap(), None);
    }

    #[test]
    fn update_keeps_identity_and_position() {
        let store = MemoryStore::new();
        store.save(unsaved("a")).unwrap();
        let mut b = store.save(unsaved("b")).unwrap();
        store.save(unsaved("c")).unwrap();

        b.title = "B".to_string();
        b.completed = true;
        let updated = store.save(b).unwrap();

        assert_eq!(updated.id, 2);
        assert_eq!(titles(&store), vec!["a", "B", "c"]);
        assert!(store.get(2).unwrap().unwrap().completed);
    }

    #[test]
    fn update_of_unknown_id_is_not_found_and_does_not_insert() {
        let store = MemoryStore::new();
        let mut ghost = unsaved("ghost");
        ghost.id = 5;
        let err = store.save(ghost).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(5)));
        assert!(store.is_empty());
    }

    #[test]
    fn update_merges_present_fields_in_place() {
        let store = MemoryStore::new();
        store.save(unsaved("a")).unwrap();
        store.save(unsaved("b")).unwrap();

        let patch = TodoPatch {
            completed: Some(true),
            ..TodoPatch::default()
        };
        let updated = store.update(1, patch).unwrap();

        assert_eq!(updated.id, 1);
        assert_eq!(updated.title, "a");
        assert!(updated.completed);
        assert_eq!(titles(&store), vec!["a", "b"]);
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update(3, TodoPatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(3)));
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_patches_to_different_fields_all_land() {
        const ROUNDS: usize = 200;

        let store = MemoryStore::new();
        let id = store.save(unsaved("original")).unwrap().id;

        for round in 0..ROUNDS {
            let mut reset = store.get(id).unwrap().unwrap();
            reset.title = "original".to_string();
            reset.completed = false;
            reset.order = 0;
            store.save(reset).unwrap();

            std::thread::scope(|scope| {
                scope.spawn(|| {
                    let patch = TodoPatch {
                        title: Some(format!("title {round}")),
                        ..TodoPatch::default()
                    };
                    store.update(id, patch).unwrap();
                });
                scope.spawn(|| {
                    let patch = TodoPatch {
                        completed: Some(true),
                        ..TodoPatch::default()
                    };
                    store.update(id, patch).unwrap();
                });
                scope.spawn(|| {
                    let patch = TodoPatch {
                        order: Some(7),
                        ..TodoPatch::default()
                    };
                    store.update(id, patch).unwrap();
                });
            });

            let todo = store.get(id).unwrap().unwrap();
            assert_eq!(todo.title, format!("title {round}"));
            assert!(todo.completed, "round {round}");
            assert_eq!(todo.order, 7, "round {round}");
        }
    }

    #[test]
    fn delete_preserves_order_of_the_rest() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c", "d"] {
            store.save(unsaved(title)).unwrap();
        }
        store.delete(2).unwrap();
        assert_eq!(titles(&store), vec!["a", "c", "d"]);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let a = store.save(unsaved("a")).unwrap();
        store.delete(a.id).unwrap();
        store.delete(a.id).unwrap();
        store.delete(1234).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn delete_all_keeps_counter_moving() {
        let store = MemoryStore::new();
        store.save(unsaved("a")).unwrap();
        store.save(unsaved("b")).unwrap();
        store.delete_all().unwrap();
        assert!(store.is_empty());

        let c = store.save(unsaved("c")).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let a = store.save(unsaved("a")).unwrap();
        store.delete(a.id).unwrap();
        let b = store.save(unsaved("b")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn concurrent_creates_get_unique_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 200;

        let store = MemoryStore::new();
        let ids: Vec<TodoId> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|t| {
                    let store = &store;
                    scope.spawn(move || {
                        (0..PER_THREAD)
                            .map(|i| store.save(unsaved(&format!("{t}-{i}"))).unwrap().id)
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), THREADS * PER_THREAD);
        assert!(!unique.contains(&UNSAVED));
        assert_eq!(store.len(), THREADS * PER_THREAD);
    }

    #[test]
    fn created_item_is_visible_once_save_returns() {
        let store = MemoryStore::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let created = store.save(unsaved("x")).unwrap();
                        assert!(store.get(created.id).unwrap().is_some());
                    }
                });
            }
        });
    }
}
