use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::todo_model::{audit_timestamp, Todo, TodoDraft};
use super::Pool;
use crate::api::errors::TodoApiError;

no_arg_sql_function!(
    last_insert_rowid,
    diesel::sql_types::BigInt,
    "Represents the SQL last_insert_rowid() function"
);

/// Diesel backed access to the `todos` table
#[derive(Clone)]
pub struct TodoRepository {
    pool: Pool,
}

impl TodoRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// All todos, newest first
    pub fn find_all(&self) -> Result<Vec<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let list = todos
            .order((created_at.desc(), id.desc()))
            .load::<Todo>(conn)?;

        Ok(list)
    }

    pub fn find_by_completed(&self, is_completed: bool) -> Result<Vec<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let list = todos
            .filter(completed.eq(is_completed))
            .load::<Todo>(conn)?;

        Ok(list)
    }

    pub fn find_by_created_at_before(
        &self,
        cutoff: NaiveDateTime,
    ) -> Result<Vec<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let list = todos.filter(created_at.lt(cutoff)).load::<Todo>(conn)?;

        Ok(list)
    }

    pub fn find_by_id(&self, todo_id: i64) -> Result<Option<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let found = todos.find(todo_id).first::<Todo>(conn).optional()?;

        Ok(found)
    }

    /// Inserts a new row, both audit columns get the current time
    pub fn create(&self, draft: &TodoDraft) -> Result<Todo, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let new_todo = draft.to_insertable(audit_timestamp());

        let inserted = conn.transaction::<_, diesel::result::Error, _>(|| {
            diesel::insert_into(todos).values(&new_todo).execute(conn)?;

            let new_id = diesel::select(last_insert_rowid).get_result::<i64>(conn)?;

            todos.find(new_id).first::<Todo>(conn)
        })?;

        Ok(inserted)
    }

    /// Writes every mutable column of `todo` and refreshes `updated_at`.
    /// `id` and `created_at` are never touched.
    pub fn save(&self, todo: &Todo) -> Result<Todo, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let saved = conn.transaction::<_, diesel::result::Error, _>(|| {
            diesel::update(todos.find(todo.id))
                .set((
                    title.eq(todo.title.clone()),
                    description.eq(todo.description.clone()),
                    completed.eq(todo.completed),
                    updated_at.eq(audit_timestamp()),
                ))
                .execute(conn)?;

            todos.find(todo.id).first::<Todo>(conn)
        })?;

        Ok(saved)
    }

    /// Returns the number of removed rows
    pub fn delete_by_id(&self, todo_id: i64) -> Result<usize, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let count = diesel::delete(todos.filter(id.eq(todo_id))).execute(conn)?;

        Ok(count)
    }

    pub fn delete_all(&self) -> Result<usize, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let conn = &self.pool.get()?;

        let count = diesel::delete(todos).execute(conn)?;

        Ok(count)
    }
}
