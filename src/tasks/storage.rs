// tasks/storage.rs — Task table CRUD plus the filtered/paginated list query.

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use super::model::{validate, Task, TaskChanges, DEFAULT_STATUS};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Store-level failures the HTTP layer maps onto the response contract.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound,
    #[error("validation failed: {}", .0.join(", "))]
    Invalid(Vec<String>),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// List query inputs. Filters are pass-through equality matches — an
/// unrecognized status simply yields zero rows, never an error.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub due_date: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// One page of the filtered task set. `total` counts every matching row,
/// not just the returned slice.
#[derive(Debug)]
pub struct TaskPage {
    pub records: Vec<Task>,
    pub total: i64,
    pub per_page: i64,
    pub page: i64,
}

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Filtered, ordered, paginated listing. `page` and `per_page` fall back
    /// to defaults when absent or non-positive; the total is counted before
    /// the LIMIT/OFFSET slice is taken.
    pub async fn list(&self, params: &TaskListParams) -> Result<TaskPage, TaskError> {
        let page = params.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let per_page = params
            .per_page
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PER_PAGE);

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks
             WHERE (?1 IS NULL OR status = ?1)
               AND (?2 IS NULL OR due_date = ?2)",
        )
        .bind(params.status.as_deref())
        .bind(params.due_date.as_deref())
        .fetch_one(&self.pool)
        .await?;

        // NULL due dates sort first (SQLite default ASC ordering).
        let records: Vec<Task> = sqlx::query_as(
            "SELECT * FROM tasks
             WHERE (?1 IS NULL OR status = ?1)
               AND (?2 IS NULL OR due_date = ?2)
             ORDER BY due_date ASC
             LIMIT ?3 OFFSET ?4",
        )
        .bind(params.status.as_deref())
        .bind(params.due_date.as_deref())
        .bind(per_page)
        // Saturate: absurdly large page numbers are an out-of-range slice,
        // never an overflow.
        .bind((page - 1).saturating_mul(per_page))
        .fetch_all(&self.pool)
        .await?;

        Ok(TaskPage {
            records,
            total,
            per_page,
            page,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Task, TaskError> {
        sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TaskError::NotFound)
    }

    /// Insert a new task. The `pending` default is applied before validation
    /// runs; validation requires a status, so the default must come first.
    pub async fn create(&self, fields: TaskChanges) -> Result<Task, TaskError> {
        let status = fields
            .status
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());

        let errors = validate(fields.title.as_deref(), Some(&status));
        if !errors.is_empty() {
            return Err(TaskError::Invalid(errors));
        }

        let now = now_rfc3339();
        let id: i64 = sqlx::query_scalar(
            r"INSERT INTO tasks (title, description, status, due_date, created_at, updated_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6)
              RETURNING id",
        )
        .bind(fields.title.unwrap_or_default())
        .bind(fields.description.flatten())
        .bind(&status)
        .bind(fields.due_date.flatten().map(|d| d.to_string()))
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        self.get(id).await
    }

    /// Merge the supplied fields over the stored row, re-validate the whole
    /// merged record, then persist. On validation failure nothing changes.
    pub async fn update(&self, id: i64, changes: TaskChanges) -> Result<Task, TaskError> {
        let current = self.get(id).await?;

        let title = changes.title.unwrap_or(current.title);
        let status = changes.status.unwrap_or(current.status);
        // Nullable columns: a supplied value (even null) overwrites, an
        // absent field keeps the stored one.
        let description = match changes.description {
            Some(supplied) => supplied,
            None => current.description,
        };
        let due_date = match changes.due_date {
            Some(supplied) => supplied.map(|d| d.to_string()),
            None => current.due_date,
        };

        let errors = validate(Some(&title), Some(&status));
        if !errors.is_empty() {
            return Err(TaskError::Invalid(errors));
        }

        sqlx::query(
            "UPDATE tasks
             SET title = ?1, description = ?2, status = ?3, due_date = ?4, updated_at = ?5
             WHERE id = ?6",
        )
        .bind(&title)
        .bind(&description)
        .bind(&status)
        .bind(&due_date)
        .bind(now_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    /// Remove the row. The prior lookup is what reports `NotFound` — the
    /// DELETE itself is unconditional.
    pub async fn delete(&self, id: i64) -> Result<(), TaskError> {
        self.get(id).await?;
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
