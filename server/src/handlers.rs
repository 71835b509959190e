//! Request handlers for the todo endpoints.
//!
//! Every handler validates its input through `todo_core::validate` before
//! touching the store, so a rejected request never writes.

use axum::extract::{Path, Query, State};
use axum::Json;
use todo_core::validate::{self, validate_query};
use todo_core::{FilterShape, Todo, TodoPayload, TodoQuery, ValidationError};

use crate::error::ServiceError;
use crate::store::TodoStore;

#[tracing::instrument(skip(store))]
pub async fn list_todos(
    State(store): State<TodoStore>,
    Query(query): Query<TodoQuery>,
) -> Result<Json<Vec<Todo>>, ServiceError> {
    let fields = validate_query(&query)?;
    let shape = FilterShape::from_fields(&fields);
    let search_q = query.search_q.as_deref().unwrap_or_default();
    let todos = store.list(&shape, search_q).await?;
    Ok(Json(todos))
}

#[tracing::instrument(skip(store))]
pub async fn get_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ServiceError> {
    store
        .get(id)
        .await?
        .map(Json)
        .ok_or(ServiceError::NotFound { id })
}

#[tracing::instrument(skip(store))]
pub async fn agenda(
    State(store): State<TodoStore>,
    Query(query): Query<TodoQuery>,
) -> Result<Json<Vec<Todo>>, ServiceError> {
    let fields = validate_query(&query)?;
    let date = fields.due_date.ok_or(ValidationError::DueDate)?;
    Ok(Json(store.agenda(date).await?))
}

#[tracing::instrument(skip(store))]
pub async fn create_todo(
    State(store): State<TodoStore>,
    Json(payload): Json<TodoPayload>,
) -> Result<&'static str, ServiceError> {
    let todo = validate::new_todo(payload)?;
    store.insert(&todo).await?;
    tracing::info!(id = todo.id, "todo added");
    Ok("Todo Successfully Added")
}

/// Merge the body over the stored row and write the whole row back. The
/// reply names only the first present field (status, priority, category,
/// todo, due date), even when several changed.
#[tracing::instrument(skip(store))]
pub async fn update_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
    Json(payload): Json<TodoPayload>,
) -> Result<String, ServiceError> {
    let (patch, updated) = validate::todo_patch(payload)?;
    let mut todo = store.get(id).await?.ok_or(ServiceError::NotFound { id })?;
    todo.apply(patch);
    if !store.update(&todo).await? {
        return Err(ServiceError::NotFound { id });
    }
    tracing::info!(id, field = %updated, "todo updated");
    Ok(format!("{updated} Updated"))
}

/// Succeeds whether or not the id existed.
#[tracing::instrument(skip(store))]
pub async fn delete_todo(
    State(store): State<TodoStore>,
    Path(id): Path<i64>,
) -> Result<&'static str, ServiceError> {
    let existed = store.delete(id).await?;
    tracing::info!(id, existed, "todo deleted");
    Ok("Todo Deleted")
}

pub async fn health() -> &'static str {
    "OK"
}
