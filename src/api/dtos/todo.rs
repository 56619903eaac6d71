use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::validation::{check_description, check_size, check_title, FieldErrors, Validate};
use crate::api::validation::{TITLE_MAX, TITLE_MIN};
use crate::models::todo_model::{Todo, TodoDraft};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full replacement of a todo's mutable fields
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
}

/// Absent and `null` fields both leave the stored value unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PartialUpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Slim shape returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TodoListItemResponse {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct TodoListQuery {
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct BeforeDateQuery {
    pub date: String,
}

impl Validate for CreateTodoRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        check_title(&self.title, &mut errors);
        check_description(self.description.as_deref(), &mut errors);

        errors.into_result()
    }
}

impl Validate for UpdateTodoRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        check_title(&self.title, &mut errors);
        check_description(self.description.as_deref(), &mut errors);

        errors.into_result()
    }
}

impl Validate for PartialUpdateTodoRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        if let Some(title) = &self.title {
            check_size("title", title, TITLE_MIN, TITLE_MAX, &mut errors);
        }
        check_description(self.description.as_deref(), &mut errors);

        errors.into_result()
    }
}

impl CreateTodoRequest {
    pub fn to_draft(&self) -> TodoDraft {
        TodoDraft::from_title(self.title.clone(), self.description.clone())
    }
}

impl UpdateTodoRequest {
    /// `existing` with every mutable field replaced
    pub fn apply_to(self, existing: Todo) -> Todo {
        Todo {
            title: self.title,
            description: self.description,
            completed: self.completed,
            ..existing
        }
    }
}

impl PartialUpdateTodoRequest {
    /// `existing` with only the present fields replaced
    pub fn apply_to(self, existing: Todo) -> Todo {
        Todo {
            title: self.title.unwrap_or(existing.title),
            description: self.description.or(existing.description),
            completed: self.completed.unwrap_or(existing.completed),
            ..existing
        }
    }
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

impl From<Todo> for TodoListItemResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            completed: todo.completed,
        }
    }
}

impl From<&TodoResponse> for TodoListItemResponse {
    fn from(todo: &TodoResponse) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            completed: todo.completed,
        }
    }
}
