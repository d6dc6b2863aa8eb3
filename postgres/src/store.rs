//! sqlx implementation of [`TodoStore`].

use sqlx::PgPool;
use std::fmt::Debug;
use todo_lists_core::store::SQL_LOG_TARGET;
use todo_lists_core::{ListId, StoreError, StoreFuture, Todo, TodoId, TodoList, TodoStore};

const LIST_WITH_COUNTS: &str = "SELECT lists.id, lists.name, \
     COUNT(todos.id) AS todos_count, \
     COUNT(NULLIF(todos.status, true)) AS todos_remaining_count \
     FROM lists LEFT JOIN todos ON todos.list_id = lists.id";

/// A list row joined with its todo counts.
#[derive(sqlx::FromRow)]
struct ListRow {
    id: i32,
    name: String,
    todos_count: i64,
    todos_remaining_count: i64,
}

impl From<ListRow> for TodoList {
    fn from(row: ListRow) -> Self {
        Self {
            id: ListId::new(row.id),
            name: row.name,
            todos_count: row.todos_count,
            todos_remaining_count: row.todos_remaining_count,
        }
    }
}

/// A `todos` row. The `status` column holds the completed flag.
#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i32,
    list_id: i32,
    name: String,
    status: bool,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: TodoId::new(row.id),
            list_id: ListId::new(row.list_id),
            name: row.name,
            completed: row.status,
        }
    }
}

/// `PostgreSQL`-backed [`TodoStore`].
///
/// Cloning is cheap; clones share the same connection pool.
///
/// # Schema
///
/// ```text
/// lists(id SERIAL PRIMARY KEY, name TEXT NOT NULL UNIQUE)
/// todos(id SERIAL PRIMARY KEY, name TEXT NOT NULL,
///       list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
///       status BOOLEAN NOT NULL DEFAULT false)
/// ```
#[derive(Clone, Debug)]
pub struct PostgresTodoStore {
    pool: PgPool,
}

impl PostgresTodoStore {
    /// Connect to the database at `url` with default pool settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url).await.map_err(database_error)?;
        Ok(Self::from_pool(pool))
    }

    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::DatabaseError(format!("Migration failed: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

/// Record a statement and its parameters before it runs.
fn log_statement(operation: &'static str, statement: &str, params: impl Debug) {
    tracing::info!(
        target: SQL_LOG_TARGET,
        operation,
        statement,
        params = ?params,
        "Executing statement"
    );
    metrics::counter!("todo_lists.store.statements", "operation" => operation).increment(1);
}

fn database_error(error: sqlx::Error) -> StoreError {
    StoreError::DatabaseError(error.to_string())
}

/// Map a write on `lists.name` to [`StoreError::DuplicateListName`] when the
/// unique constraint rejected it.
fn list_name_write_error(name: &str, error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            tracing::warn!(name, "List name rejected by unique constraint");
            return StoreError::DuplicateListName(name.to_string());
        }
    }
    database_error(error)
}

impl TodoStore for PostgresTodoStore {
    fn get_list(&self, id: ListId) -> StoreFuture<'_, Option<TodoList>> {
        Box::pin(async move {
            let sql = format!("{LIST_WITH_COUNTS} WHERE lists.id = $1 GROUP BY lists.id");
            log_statement("get_list", &sql, (id.get(),));

            let row: Option<ListRow> = sqlx::query_as(&sql)
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(row.map(TodoList::from))
        })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<TodoList>> {
        Box::pin(async move {
            let sql = format!("{LIST_WITH_COUNTS} GROUP BY lists.id ORDER BY lists.name COLLATE \"C\"");
            log_statement("list_all", &sql, ());

            let rows: Vec<ListRow> = sqlx::query_as(&sql)
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(rows.into_iter().map(TodoList::from).collect())
        })
    }

    fn add_list<'a>(&'a self, name: &'a str) -> StoreFuture<'a, ListId> {
        Box::pin(async move {
            let sql = "INSERT INTO lists (name) VALUES ($1) RETURNING id";
            log_statement("add_list", sql, (name,));

            let id: i32 = sqlx::query_scalar(sql)
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| list_name_write_error(name, e))?;

            Ok(ListId::new(id))
        })
    }

    fn rename_list<'a>(&'a self, id: ListId, name: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let sql = "UPDATE lists SET name = $1 WHERE id = $2";
            log_statement("rename_list", sql, (name, id.get()));

            sqlx::query(sql)
                .bind(name)
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(|e| list_name_write_error(name, e))?;

            Ok(())
        })
    }

    fn delete_list(&self, id: ListId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            // todos rows go with it through ON DELETE CASCADE
            let sql = "DELETE FROM lists WHERE id = $1";
            log_statement("delete_list", sql, (id.get(),));

            sqlx::query(sql)
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(())
        })
    }

    fn add_todo<'a>(&'a self, list_id: ListId, name: &'a str) -> StoreFuture<'a, TodoId> {
        Box::pin(async move {
            let sql = "INSERT INTO todos (name, list_id) VALUES ($1, $2) RETURNING id";
            log_statement("add_todo", sql, (name, list_id.get()));

            let id: i32 = sqlx::query_scalar(sql)
                .bind(name)
                .bind(list_id.get())
                .fetch_one(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(TodoId::new(id))
        })
    }

    fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let sql = "DELETE FROM todos WHERE id = $1 AND list_id = $2";
            log_statement("delete_todo", sql, (todo_id.get(), list_id.get()));

            sqlx::query(sql)
                .bind(todo_id.get())
                .bind(list_id.get())
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(())
        })
    }

    fn set_todo_status(
        &self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let sql = "UPDATE todos SET status = $1 WHERE id = $2 AND list_id = $3";
            log_statement("set_todo_status", sql, (completed, todo_id.get(), list_id.get()));

            sqlx::query(sql)
                .bind(completed)
                .bind(todo_id.get())
                .bind(list_id.get())
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(())
        })
    }

    fn complete_all(&self, list_id: ListId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let sql = "UPDATE todos SET status = true WHERE list_id = $1";
            log_statement("complete_all", sql, (list_id.get(),));

            sqlx::query(sql)
                .bind(list_id.get())
                .execute(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(())
        })
    }

    fn list_todos(&self, list_id: ListId) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            let sql = "SELECT id, list_id, name, status FROM todos WHERE list_id = $1 ORDER BY id";
            log_statement("list_todos", sql, (list_id.get(),));

            let rows: Vec<TodoRow> = sqlx::query_as(sql)
                .bind(list_id.get())
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(rows.into_iter().map(Todo::from).collect())
        })
    }
}
