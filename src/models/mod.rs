pub mod todo_model;
pub mod todo_repository;

use diesel::{
    connection::SimpleConnection,
    r2d2::{ConnectionManager, CustomizeConnection},
    SqliteConnection,
};

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const CREATE_TODOS: &str = include_str!("../../migrations/2024-05-01-000000_create_todos/up.sql");

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the connection pool and makes sure the `todos` table exists
///
/// `:memory:` keeps a single connection alive for the whole lifetime of the pool,
/// every other connection would see its own empty database.
pub fn build_pool(database_url: &str) -> anyhow::Result<Pool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    let builder = Pool::builder().connection_customizer(Box::new(SqlitePragmas));

    let pool = if database_url == ":memory:" {
        builder
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?
    } else {
        builder.build(manager)?
    };

    run_migrations(&pool)?;

    Ok(pool)
}

fn run_migrations(pool: &Pool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    conn.batch_execute(CREATE_TODOS)?;

    log::debug!("todos table ready");

    Ok(())
}
