use crate::api::{
    dtos::todo::{CreateTodoRequest, TodoResponse, UpdateTodoRequest},
    validation::{DESCRIPTION_MAX, TITLE_MAX, TITLE_MIN},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Completed,
}

/// Editable todo fields shared by the add form and the detail page
#[derive(Debug, Clone, PartialEq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub focus: FormField,
    with_completed: bool,
    dirty: bool,
}

impl TodoForm {
    /// Empty add form, `completed` is not editable there
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            completed: false,
            focus: FormField::Title,
            with_completed: false,
            dirty: false,
        }
    }

    pub fn from_todo(todo: &TodoResponse) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
            completed: todo.completed,
            focus: FormField::Title,
            with_completed: true,
            dirty: false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Description,
            FormField::Description if self.with_completed => FormField::Completed,
            FormField::Description | FormField::Completed => FormField::Title,
        };
    }

    pub fn input(&mut self, c: char) {
        match self.focus {
            FormField::Title => self.title.push(c),
            FormField::Description => self.description.push(c),
            FormField::Completed => {
                if c == ' ' {
                    self.completed = !self.completed;
                } else {
                    return;
                }
            }
        }
        self.dirty = true;
    }

    pub fn backspace(&mut self) {
        let removed = match self.focus {
            FormField::Title => self.title.pop(),
            FormField::Description => self.description.pop(),
            FormField::Completed => None,
        };
        if removed.is_some() {
            self.dirty = true;
        }
    }

    pub fn title_error(&self) -> Option<String> {
        let len = self.title.chars().count();

        if self.title.trim().is_empty() {
            Some("Title is required".to_string())
        } else if len < TITLE_MIN {
            Some(format!("Title should be at least {} characters long", TITLE_MIN))
        } else if len > TITLE_MAX {
            Some(format!("Title should be {} characters at most", TITLE_MAX))
        } else {
            None
        }
    }

    pub fn description_error(&self) -> Option<String> {
        if self.description.chars().count() > DESCRIPTION_MAX {
            Some(format!(
                "Description should be {} characters at most",
                DESCRIPTION_MAX
            ))
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.title_error().is_none() && self.description_error().is_none()
    }

    /// Submitting is disabled while the form is invalid or untouched
    pub fn can_submit(&self) -> bool {
        self.dirty && self.is_valid()
    }

    fn description(&self) -> Option<String> {
        if self.description.is_empty() {
            None
        } else {
            Some(self.description.clone())
        }
    }

    pub fn to_create_request(&self) -> CreateTodoRequest {
        CreateTodoRequest {
            title: self.title.clone(),
            description: self.description(),
        }
    }

    pub fn to_update_request(&self) -> UpdateTodoRequest {
        UpdateTodoRequest {
            title: self.title.clone(),
            description: self.description(),
            completed: self.completed,
        }
    }
}

impl Default for TodoForm {
    fn default() -> Self {
        Self::new()
    }
}
