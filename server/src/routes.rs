//! Handlers for the `/todo` resource.
//!
//! Each handler issues at most one store call. Bodies are validated before
//! the store is touched; a path id that cannot be coerced matches no row and
//! answers 404 without a query.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use todo_core::types::{
    MSG_DELETED, MSG_INSERTED, MSG_INSERT_FAILED, MSG_NO_RECORDS, MSG_ROUTE_NOT_FOUND,
    MSG_TODO_NOT_FOUND, MSG_UPDATED,
};
use todo_core::{coerce_id, InsertedBody, MessageBody, Todo, TodoFields, TodoInput};

use crate::error::AppError;
use crate::store::TodoStore;

pub fn router<S: TodoStore>() -> Router<S> {
    Router::new()
        .route("/todo", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todo/", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todo/{id}", put(update_todo::<S>).delete(delete_todo::<S>))
}

/// Fallback for unknown paths and for known paths hit with the wrong method.
pub async fn route_not_found() -> AppError {
    AppError::NotFound(MSG_ROUTE_NOT_FOUND.to_string())
}

fn extract_fields(body: Result<Json<TodoInput>, JsonRejection>) -> Result<TodoFields, AppError> {
    let Json(input) = body?;
    Ok(input.validate()?)
}

fn todo_not_found() -> AppError {
    AppError::NotFound(MSG_TODO_NOT_FOUND.to_string())
}

async fn list_todos<S: TodoStore>(State(store): State<S>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = store.list().await?;
    if todos.is_empty() {
        return Err(AppError::NotFound(MSG_NO_RECORDS.to_string()));
    }
    tracing::debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

async fn create_todo<S: TodoStore>(
    State(store): State<S>,
    body: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<InsertedBody>), AppError> {
    let fields = extract_fields(body)?;
    let outcome = store.insert(&fields).await?;
    if outcome.rows_affected == 0 {
        return Err(AppError::Internal(MSG_INSERT_FAILED.to_string()));
    }
    tracing::debug!(id = outcome.last_insert_id, "inserted todo");
    Ok((
        StatusCode::CREATED,
        Json(InsertedBody {
            message: MSG_INSERTED.to_string(),
            insert_id: outcome.last_insert_id,
        }),
    ))
}

async fn update_todo<S: TodoStore>(
    State(store): State<S>,
    Path(raw_id): Path<String>,
    body: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let fields = extract_fields(body)?;
    let id = coerce_id(&raw_id).ok_or_else(todo_not_found)?;
    if store.update(id, &fields).await?.rows_affected == 0 {
        return Err(todo_not_found());
    }
    tracing::debug!(id, "updated todo");
    Ok(Json(MessageBody::new(MSG_UPDATED)))
}

async fn delete_todo<S: TodoStore>(
    State(store): State<S>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = coerce_id(&raw_id).ok_or_else(todo_not_found)?;
    if store.delete(id).await?.rows_affected == 0 {
        return Err(todo_not_found());
    }
    tracing::debug!(id, "deleted todo");
    Ok(Json(MessageBody::new(MSG_DELETED)))
}
