//! Client side query cache.
//!
//! Cached results carry tags: the list is tagged [`Tag::TodoList`], a single todo
//! [`Tag::Todo`]. Mutations invalidate tags, which marks matching entries stale so
//! the next read goes back to the server. Optimistic edits to the cached list
//! return a [`ListPatch`] that undoes them when the server rejects the mutation.

use std::collections::HashMap;

use crate::api::dtos::todo::{CreateTodoRequest, TodoListItemResponse, TodoResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    TodoList,
    Todo(i64),
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stale: bool,
}

impl<T> Entry<T> {
    fn fresh(value: T) -> Self {
        Self {
            value,
            stale: false,
        }
    }
}

/// Undo record of one optimistic change to the cached list
#[derive(Debug, Clone, PartialEq)]
pub enum ListPatch {
    Inserted {
        temp_id: i64,
    },
    Removed {
        index: usize,
        item: TodoListItemResponse,
    },
    Replaced {
        previous: TodoListItemResponse,
    },
}

#[derive(Debug)]
pub struct QueryCache {
    list: Option<Entry<Vec<TodoListItemResponse>>>,
    details: HashMap<i64, Entry<TodoResponse>>,
    list_failed: bool,
    next_temp_id: i64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            list: None,
            details: HashMap::new(),
            list_failed: false,
            next_temp_id: -1,
        }
    }

    /// Cached list, stale or not
    pub fn list(&self) -> Option<&[TodoListItemResponse]> {
        self.list.as_ref().map(|entry| entry.value.as_slice())
    }

    /// Cached list only if no mutation invalidated it
    pub fn fresh_list(&self) -> Option<&[TodoListItemResponse]> {
        self.list
            .as_ref()
            .filter(|entry| !entry.stale)
            .map(|entry| entry.value.as_slice())
    }

    pub fn store_list(&mut self, items: Vec<TodoListItemResponse>) {
        self.list = Some(Entry::fresh(items));
        self.list_failed = false;
    }

    /// Remembers a failed list fetch until the list is invalidated again
    pub fn mark_list_failed(&mut self) {
        self.list_failed = true;
    }

    /// Missing or stale list whose last fetch did not fail
    pub fn needs_list_fetch(&self) -> bool {
        !self.list_failed && self.is_stale(Tag::TodoList)
    }

    pub fn fresh_detail(&self, id: i64) -> Option<&TodoResponse> {
        self.details
            .get(&id)
            .filter(|entry| !entry.stale)
            .map(|entry| &entry.value)
    }

    pub fn store_detail(&mut self, todo: TodoResponse) {
        self.details.insert(todo.id, Entry::fresh(todo));
    }

    pub fn is_stale(&self, tag: Tag) -> bool {
        match tag {
            Tag::TodoList => self.list.as_ref().map_or(true, |entry| entry.stale),
            Tag::Todo(id) => self.details.get(&id).map_or(true, |entry| entry.stale),
        }
    }

    pub fn invalidate(&mut self, tags: &[Tag]) {
        for tag in tags {
            match tag {
                Tag::TodoList => {
                    self.list_failed = false;
                    if let Some(entry) = self.list.as_mut() {
                        entry.stale = true;
                    }
                }
                Tag::Todo(id) => {
                    if let Some(entry) = self.details.get_mut(id) {
                        entry.stale = true;
                    }
                }
            }
        }
    }

    /// Prepends a placeholder with a temporary negative id.
    /// Nothing happens while the list has never been fetched.
    pub fn apply_optimistic_create(&mut self, data: &CreateTodoRequest) -> Option<ListPatch> {
        let entry = self.list.as_mut()?;

        let temp_id = self.next_temp_id;
        self.next_temp_id -= 1;

        entry.value.insert(
            0,
            TodoListItemResponse {
                id: temp_id,
                title: data.title.clone(),
                completed: false,
            },
        );

        Some(ListPatch::Inserted { temp_id })
    }

    /// Swaps the placeholder for the stored todo once the server confirmed it
    pub fn confirm_create(&mut self, patch: &ListPatch, created: &TodoResponse) {
        let ListPatch::Inserted { temp_id } = patch else {
            return;
        };

        if let Some(entry) = self.list.as_mut() {
            if let Some(item) = entry.value.iter_mut().find(|item| item.id == *temp_id) {
                *item = TodoListItemResponse::from(created);
            }
        }
    }

    pub fn apply_optimistic_delete(&mut self, id: i64) -> Option<ListPatch> {
        let entry = self.list.as_mut()?;

        let index = entry.value.iter().position(|item| item.id == id)?;
        let item = entry.value.remove(index);

        Some(ListPatch::Removed { index, item })
    }

    pub fn apply_optimistic_completed(&mut self, id: i64, completed: bool) -> Option<ListPatch> {
        let entry = self.list.as_mut()?;

        let item = entry.value.iter_mut().find(|item| item.id == id)?;
        let previous = item.clone();
        item.completed = completed;

        Some(ListPatch::Replaced { previous })
    }

    pub fn rollback(&mut self, patch: ListPatch) {
        let Some(entry) = self.list.as_mut() else {
            return;
        };

        match patch {
            ListPatch::Inserted { temp_id } => {
                entry.value.retain(|item| item.id != temp_id);
            }
            ListPatch::Removed { index, item } => {
                if entry.value.iter().all(|existing| existing.id != item.id) {
                    let index = index.min(entry.value.len());
                    entry.value.insert(index, item);
                }
            }
            ListPatch::Replaced { previous } => {
                if let Some(item) = entry.value.iter_mut().find(|item| item.id == previous.id) {
                    *item = previous;
                }
            }
        }
    }

    /// Drops the detail entry of a deleted todo
    pub fn evict(&mut self, id: i64) {
        self.details.remove(&id);
    }

    pub fn clear_details(&mut self) {
        self.details.clear();
    }
}
