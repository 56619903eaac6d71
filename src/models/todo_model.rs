use crate::schema::*;
use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A todo that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Insertable)]
#[table_name = "todos"]
pub struct NewTodo<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TodoDraft {
    pub fn from_title(title: String, description: Option<String>) -> Self {
        Self {
            title,
            description,
            completed: false,
        }
    }

    /// Stamps both audit columns with `now`
    pub fn to_insertable(&self, now: NaiveDateTime) -> NewTodo<'_> {
        NewTodo {
            title: &self.title,
            description: self.description.as_deref(),
            completed: self.completed,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Current local time, the clock used for `created_at` / `updated_at`
pub fn audit_timestamp() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
