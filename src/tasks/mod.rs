pub mod model;
pub mod storage;

pub use model::{Task, TaskChanges, STATUSES};
pub use storage::{TaskError, TaskListParams, TaskPage, TaskStore};
