// tasks/model.rs — Task row shape and write-time validation.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Statuses a task may hold, in lifecycle order.
pub const STATUSES: [&str; 3] = ["pending", "doing", "done"];

/// Status substituted when a create request omits the field. Applied
/// before validation — the required-status rule would otherwise reject
/// the omission.
pub const DEFAULT_STATUS: &str = "pending";

/// A persisted task row. `due_date` is an ISO `YYYY-MM-DD` string,
/// timestamps are RFC 3339 UTC.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Client-suppliable fields — the permitted set on create and update.
/// `id` and the timestamps are system-owned and never read from a request;
/// unknown fields deserialize to nothing.
///
/// The nullable columns are double options: an absent field (`None`)
/// preserves the stored value on update, an explicit JSON `null`
/// (`Some(None)`) clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskChanges {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Evaluate every validation rule against a candidate record and collect
/// the failures in rule order — no short-circuiting. An empty vec means
/// the record is valid.
pub fn validate(title: Option<&str>, status: Option<&str>) -> Vec<String> {
    let mut errors = Vec::new();

    if title.is_none_or(|t| t.trim().is_empty()) {
        errors.push("Title can't be blank".to_string());
    }
    // A missing title counts as length 0, so absence fails both rules.
    if title.map_or(0, |t| t.chars().count()) < 3 {
        errors.push("Title is too short (minimum is 3 characters)".to_string());
    }

    if status.is_none_or(|s| s.trim().is_empty()) {
        errors.push("Status can't be blank".to_string());
    }
    if !status.is_some_and(|s| STATUSES.contains(&s)) {
        errors.push("Status is not included in the list".to_string());
    }

    errors
}
