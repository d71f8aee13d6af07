// rest/routes/tasks.rs — Task REST routes.
//
// Every response uses the fixed envelope: `data` (plus pagination fields on
// list), `message` on delete, `errors` on failure.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::tasks::{TaskChanges, TaskError, TaskListParams};
use crate::AppContext;

type RouteError = (StatusCode, Json<Value>);

fn map_err(err: TaskError) -> RouteError {
    match err {
        TaskError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "errors": ["Task not found"] })),
        ),
        TaskError::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors })),
        ),
        TaskError::Db(e) => {
            tracing::error!("task query failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "errors": ["Internal server error"] })),
            )
        }
    }
}

/// Request body wrapper: `{ "task": { ...permitted fields } }`.
/// Deserializing into `TaskChanges` is the allow-list — `id`, timestamps,
/// and any unknown keys are dropped before they reach the store.
#[derive(Deserialize)]
pub struct TaskBody {
    pub task: TaskChanges,
}

/// Raw query string inputs. Numeric fields are parsed leniently so malformed
/// values fall back to the store defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub due_date: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

fn lenient_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok())
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, RouteError> {
    let params = TaskListParams {
        status: query.status.filter(|s| !s.is_empty()),
        due_date: query.due_date.filter(|s| !s.is_empty()),
        page: lenient_int(query.page.as_deref()),
        per_page: lenient_int(query.per_page.as_deref()),
    };

    let page = ctx.tasks.list(&params).await.map_err(map_err)?;
    Ok(Json(json!({
        "data": page.records,
        "total_records": page.total,
        "per_page": page.per_page,
        "page": page.page,
    })))
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, RouteError> {
    let task = ctx.tasks.get(id).await.map_err(map_err)?;
    Ok(Json(json!({ "data": task, "status": 200 })))
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<TaskBody>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let task = ctx.tasks.create(body.task).await.map_err(map_err)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": task, "status": 201 })),
    ))
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
    Json(body): Json<TaskBody>,
) -> Result<Json<Value>, RouteError> {
    let task = ctx.tasks.update(id, body.task).await.map_err(map_err)?;
    Ok(Json(json!({ "data": task, "status": 200 })))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, RouteError> {
    ctx.tasks.delete(id).await.map_err(map_err)?;
    Ok(Json(json!({ "message": "Task deleted", "status": 200 })))
}
