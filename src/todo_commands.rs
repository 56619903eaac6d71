use anyhow::{anyhow, bail, Context};
use inquire::{Confirm, InquireError, Text};

use crate::{
    api::{
        dtos::todo::{CreateTodoRequest, TodoResponse},
        validation::Validate,
    },
    client::{api::HttpTodoApi, store::TodoStore},
    ui::todo_list_renderer::render_todo_list,
    utils::parse_local_datetime,
};

fn prompt<T>(answer: Result<T, InquireError>) -> anyhow::Result<T> {
    answer.map_err(|e| anyhow!("{}", e))
}

fn print_todo(todo: &TodoResponse) {
    let mark = if todo.completed { "x" } else { " " };

    println!("[{}] #{} {}", mark, todo.id, todo.title);
    if let Some(description) = &todo.description {
        println!("    {}", description);
    }
    println!("    created {} / updated {}", todo.created_at, todo.updated_at);
}

/// Prompt user to create new todo
pub fn create_new_todo() -> anyhow::Result<()> {
    let title = prompt(
        Text::new("Title")
            .with_help_message("Title for your new todo")
            .prompt(),
    )?;

    let description = prompt(
        Text::new("Description")
            .with_help_message("Optional, leave empty to skip")
            .prompt(),
    )?;

    let data = CreateTodoRequest {
        title,
        description: Some(description).filter(|d| !d.trim().is_empty()),
    };

    if let Err(errors) = data.validate() {
        bail!("{}", errors);
    }

    let mut store = TodoStore::new(HttpTodoApi::from_config());
    let todo = store.create_todo(data)?;

    println!("Created todo");
    print_todo(&todo);

    Ok(())
}

/// Opens the terminal UI on the list page
pub fn list_todos() -> anyhow::Result<()> {
    render_todo_list(HttpTodoApi::from_config()).map_err(|e| anyhow!("{}", e))
}

pub fn show_todo(id: i64) -> anyhow::Result<()> {
    let mut store = TodoStore::new(HttpTodoApi::from_config());

    let todo = store
        .fetch_todo(id)
        .with_context(|| format!("Could not load todo {}", id))?;

    print_todo(&todo);

    Ok(())
}

/// Prints todos created before `date`, an ISO-8601 local date-time
pub fn list_todos_before(date: &str) -> anyhow::Result<()> {
    let date = parse_local_datetime(date)
        .with_context(|| format!("Invalid date '{}', expected e.g. 2024-05-01T10:00:00", date))?;

    let store = TodoStore::new(HttpTodoApi::from_config());
    let todos = store.fetch_todos_before(date)?;

    if todos.is_empty() {
        println!("No todos created before {}", date);
    }
    todos.iter().for_each(print_todo);

    Ok(())
}

pub fn clear_todos() -> anyhow::Result<()> {
    let confirmed = prompt(
        Confirm::new("Delete every todo?")
            .with_default(false)
            .prompt(),
    )?;

    if !confirmed {
        return Ok(());
    }

    let mut store = TodoStore::new(HttpTodoApi::from_config());
    store.delete_all_todos()?;

    println!("All todos deleted");

    Ok(())
}
