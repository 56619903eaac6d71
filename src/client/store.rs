use chrono::NaiveDateTime;

use crate::{
    api::dtos::todo::{
        CreateTodoRequest, PartialUpdateTodoRequest, TodoListItemResponse, TodoResponse,
        UpdateTodoRequest,
    },
    errors::TodoError,
};

use super::{
    api::TodoEndpoints,
    cache::{ListPatch, QueryCache, Tag},
};

/// Create applied to the cache but not yet sent
#[derive(Debug)]
pub struct PendingCreate {
    data: CreateTodoRequest,
    patch: Option<ListPatch>,
}

/// Delete applied to the cache but not yet sent
#[derive(Debug)]
pub struct PendingDelete {
    id: i64,
    patch: Option<ListPatch>,
}

/// Queries and mutations over [`TodoEndpoints`], backed by a [`QueryCache`]
pub struct TodoStore<E: TodoEndpoints> {
    api: E,
    cache: QueryCache,
}

impl<E: TodoEndpoints> TodoStore<E> {
    pub fn new(api: E) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    #[cfg(test)]
    pub fn api(&self) -> &E {
        &self.api
    }

    /// Cached list, refetched when missing or invalidated
    pub fn fetch_all_todos(&mut self) -> Result<Vec<TodoListItemResponse>, TodoError> {
        if let Some(list) = self.cache.fresh_list() {
            return Ok(list.to_vec());
        }

        match self.api.fetch_all_todos() {
            Ok(list) => {
                self.cache.store_list(list.clone());

                Ok(list)
            }
            Err(e) => {
                self.cache.mark_list_failed();

                Err(e)
            }
        }
    }

    /// Refetches the list even after a failed fetch
    pub fn refresh_list(&mut self) -> Result<Vec<TodoListItemResponse>, TodoError> {
        self.cache.invalidate(&[Tag::TodoList]);

        self.fetch_all_todos()
    }

    pub fn fetch_todo(&mut self, id: i64) -> Result<TodoResponse, TodoError> {
        if let Some(todo) = self.cache.fresh_detail(id) {
            return Ok(todo.clone());
        }

        let todo = self.api.fetch_todo(id)?;
        self.cache.store_detail(todo.clone());

        Ok(todo)
    }

    /// Never cached, every call goes to the server
    pub fn fetch_todos_before(&self, date: NaiveDateTime) -> Result<Vec<TodoResponse>, TodoError> {
        self.api.fetch_todos_before(date)
    }

    /// Shows the new todo in the cached list right away
    pub fn begin_create(&mut self, data: CreateTodoRequest) -> PendingCreate {
        let patch = self.cache.apply_optimistic_create(&data);

        PendingCreate { data, patch }
    }

    /// Sends a create started with [`TodoStore::begin_create`], undoing the placeholder on failure
    pub fn finish_create(&mut self, pending: PendingCreate) -> Result<TodoResponse, TodoError> {
        let PendingCreate { data, patch } = pending;

        match self.api.create_todo(&data) {
            Ok(created) => {
                if let Some(patch) = &patch {
                    self.cache.confirm_create(patch, &created);
                }
                self.cache.invalidate(&[Tag::TodoList]);

                Ok(created)
            }
            Err(e) => {
                if let Some(patch) = patch {
                    self.cache.rollback(patch);
                }

                Err(e)
            }
        }
    }

    pub fn create_todo(&mut self, data: CreateTodoRequest) -> Result<TodoResponse, TodoError> {
        let pending = self.begin_create(data);

        self.finish_create(pending)
    }

    pub fn begin_delete(&mut self, id: i64) -> PendingDelete {
        let patch = self.cache.apply_optimistic_delete(id);

        PendingDelete { id, patch }
    }

    pub fn finish_delete(&mut self, pending: PendingDelete) -> Result<(), TodoError> {
        let PendingDelete { id, patch } = pending;

        match self.api.delete_todo(id) {
            Ok(()) => {
                self.cache.evict(id);
                self.cache.invalidate(&[Tag::TodoList, Tag::Todo(id)]);

                Ok(())
            }
            Err(e) => {
                if let Some(patch) = patch {
                    self.cache.rollback(patch);
                }

                Err(e)
            }
        }
    }

    pub fn put_todo(
        &mut self,
        id: i64,
        data: &UpdateTodoRequest,
    ) -> Result<TodoResponse, TodoError> {
        let updated = self.api.put_todo(id, data)?;

        self.cache.invalidate(&[Tag::TodoList, Tag::Todo(id)]);

        Ok(updated)
    }

    pub fn patch_todo(
        &mut self,
        id: i64,
        data: &PartialUpdateTodoRequest,
    ) -> Result<TodoResponse, TodoError> {
        let updated = self.api.patch_todo(id, data)?;

        self.cache.invalidate(&[Tag::TodoList, Tag::Todo(id)]);

        Ok(updated)
    }

    /// Flips completion in the cached list before the patch is sent
    pub fn set_completed(&mut self, id: i64, completed: bool) -> Result<TodoResponse, TodoError> {
        let patch = self.cache.apply_optimistic_completed(id, completed);

        let data = PartialUpdateTodoRequest {
            completed: Some(completed),
            ..Default::default()
        };

        self.patch_todo(id, &data).map_err(|e| {
            if let Some(patch) = patch {
                self.cache.rollback(patch);
            }
            e
        })
    }

    pub fn delete_all_todos(&mut self) -> Result<(), TodoError> {
        self.api.delete_all_todos()?;

        self.cache.store_list(Vec::new());
        self.cache.clear_details();
        self.cache.invalidate(&[Tag::TodoList]);

        Ok(())
    }
}
