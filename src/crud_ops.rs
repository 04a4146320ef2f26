//! Profile and todo queries. Todo access is always scoped to an owner id.

use sqlx::sqlite::SqlitePool;

use crate::backend::BackendError;
use crate::entities::{ExtendedUser, NewTodo, ProfileDraft, Todo, TodoChanges};

pub async fn count_profiles(sqlite_pool: &SqlitePool) -> Result<i64, BackendError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(sqlite_pool)
        .await?;
    Ok(count)
}

pub async fn select_profiles(sqlite_pool: &SqlitePool) -> Result<Vec<ExtendedUser>, BackendError> {
    let users = sqlx::query_as("SELECT id, email, username, role, account_status FROM users")
        .fetch_all(sqlite_pool)
        .await?;
    Ok(users)
}

pub async fn select_profile(
    sqlite_pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<ExtendedUser>, BackendError> {
    let user = sqlx::query_as(
        "SELECT id, email, username, role, account_status FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(sqlite_pool)
    .await?;
    Ok(user)
}

pub async fn insert_profile(
    sqlite_pool: &SqlitePool,
    profile: &ExtendedUser,
) -> Result<(), BackendError> {
    sqlx::query(
        "INSERT INTO users (id, email, username, role, account_status) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&profile.id)
    .bind(&profile.email)
    .bind(&profile.username)
    .bind(profile.role)
    .bind(&profile.account_status)
    .execute(sqlite_pool)
    .await?;
    Ok(())
}

pub async fn update_profile(
    sqlite_pool: &SqlitePool,
    user_id: &str,
    changes: &ProfileDraft,
) -> Result<(), BackendError> {
    let result = sqlx::query(
        "UPDATE users SET username = COALESCE(?, username), email = COALESCE(?, email), \
         role = COALESCE(?, role), account_status = COALESCE(?, account_status) WHERE id = ?",
    )
    .bind(&changes.username)
    .bind(&changes.email)
    .bind(changes.role)
    .bind(&changes.account_status)
    .bind(user_id)
    .execute(sqlite_pool)
    .await?;

    if result.rows_affected() > 0 {
        Ok(())
    } else {
        Err(BackendError::NotFound(user_id.to_owned()))
    }
}

pub async fn select_todos(
    sqlite_pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Todo>, BackendError> {
    let todos = sqlx::query_as(
        "SELECT id, title, detail, deadline, status, user_id FROM todos WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(sqlite_pool)
    .await?;
    Ok(todos)
}

pub async fn insert_todo(sqlite_pool: &SqlitePool, todo: &NewTodo) -> Result<Vec<Todo>, BackendError> {
    let todos = sqlx::query_as(
        "INSERT INTO todos (title, detail, deadline, status, user_id) VALUES (?, ?, ?, ?, ?) \
         RETURNING id, title, detail, deadline, status, user_id",
    )
    .bind(&todo.title)
    .bind(&todo.detail)
    .bind(&todo.deadline)
    .bind(todo.status)
    .bind(&todo.user_id)
    .fetch_all(sqlite_pool)
    .await?;
    Ok(todos)
}

pub async fn update_todo(
    sqlite_pool: &SqlitePool,
    user_id: &str,
    todo_id: i64,
    changes: &TodoChanges,
) -> Result<(), BackendError> {
    let result = sqlx::query(
        "UPDATE todos SET deadline = ?, title = ?, detail = ?, status = ? WHERE id = ? AND user_id = ?",
    )
    .bind(&changes.deadline)
    .bind(&changes.title)
    .bind(&changes.detail)
    .bind(changes.status)
    .bind(todo_id)
    .bind(user_id)
    .execute(sqlite_pool)
    .await?;

    if result.rows_affected() > 0 {
        Ok(())
    } else {
        Err(BackendError::NotFound(todo_id.to_string()))
    }
}

pub async fn delete_todo(
    sqlite_pool: &SqlitePool,
    user_id: &str,
    todo_id: i64,
) -> Result<(), BackendError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
        .bind(todo_id)
        .bind(user_id)
        .execute(sqlite_pool)
        .await?;

    if result.rows_affected() > 0 {
        Ok(())
    } else {
        Err(BackendError::NotFound(todo_id.to_string()))
    }
}
