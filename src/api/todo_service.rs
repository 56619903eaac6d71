use chrono::NaiveDateTime;

use super::errors::TodoApiError;
use crate::models::{
    todo_model::{Todo, TodoDraft},
    todo_repository::TodoRepository,
};

/// Thin layer between the handlers and the repository
#[derive(Clone)]
pub struct TodoService {
    repository: TodoRepository,
}

impl TodoService {
    pub fn new(repository: TodoRepository) -> Self {
        Self { repository }
    }

    pub fn get_all_todos(&self) -> Result<Vec<Todo>, TodoApiError> {
        self.repository.find_all()
    }

    pub fn get_todos_by_completed(&self, completed: bool) -> Result<Vec<Todo>, TodoApiError> {
        self.repository.find_by_completed(completed)
    }

    /// `None` when the todo does not exist, callers decide whether that is an error
    pub fn find_todo_by_id(&self, id: i64) -> Result<Option<Todo>, TodoApiError> {
        self.repository.find_by_id(id)
    }

    pub fn find_todo_before_date(&self, date: NaiveDateTime) -> Result<Vec<Todo>, TodoApiError> {
        self.repository.find_by_created_at_before(date)
    }

    pub fn create_todo(&self, draft: &TodoDraft) -> Result<Todo, TodoApiError> {
        self.repository.create(draft)
    }

    pub fn update_todo(&self, todo: &Todo) -> Result<Todo, TodoApiError> {
        self.repository.save(todo)
    }

    pub fn delete_todo_by_id(&self, id: i64) -> Result<(), TodoApiError> {
        self.repository.delete_by_id(id).map(|_| ())
    }

    pub fn delete_all_todos(&self) -> Result<(), TodoApiError> {
        let removed = self.repository.delete_all()?;

        log::info!("Removed {} todos", removed);

        Ok(())
    }
}
