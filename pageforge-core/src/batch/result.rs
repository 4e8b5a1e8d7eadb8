//! Batch execution results and history records.

use super::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of one task within a batch or scheduled dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: u64,
    /// Operation name, e.g. `"split_by_count"`.
    pub operation: String,
    pub success: bool,
    /// Files the operation produced, empty on failure.
    pub output_files: Vec<PathBuf>,
    /// Non-fatal condition worth surfacing, e.g. a replacement shortfall.
    pub warning: Option<String>,
    pub error: Option<String>,
}

impl TaskOutcome {
    pub fn succeeded(task_id: u64, operation: &str, output_files: Vec<PathBuf>) -> Self {
        Self {
            task_id,
            operation: operation.to_string(),
            success: true,
            output_files,
            warning: None,
            error: None,
        }
    }

    pub fn failed(task_id: u64, operation: &str, error: String) -> Self {
        Self {
            task_id,
            operation: operation.to_string(),
            success: false,
            output_files: Vec::new(),
            warning: None,
            error: Some(error),
        }
    }

    pub fn with_warning(mut self, warning: String) -> Self {
        self.warning = Some(warning);
        self
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "task {} ({}) ok, {} file(s)",
                self.task_id,
                self.operation,
                self.output_files.len()
            )
        } else {
            write!(
                f,
                "task {} ({}) failed: {}",
                self.task_id,
                self.operation,
                self.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

/// Aggregate result of one `execute_batch` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub total: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub outcomes: Vec<TaskOutcome>,
}

impl BatchResult {
    pub fn empty() -> Self {
        Self {
            total: 0,
            success_count: 0,
            failed_count: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn all_successful(&self) -> bool {
        self.failed_count == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}

/// One batch execution, as remembered by the orchestrator. The history
/// list is append-only and never pruned automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub executed_at: DateTime<Utc>,
    pub result: BatchResult,
}

/// Outcome of a scheduled task dispatched by `check_scheduled_tasks`. The
/// task record is returned in its terminal state (completed or failed, with
/// `ended_at` set) since it no longer lives in the scheduled list.
#[derive(Debug, Clone)]
pub struct ScheduledOutcome {
    pub scheduled_id: u64,
    pub task: Task,
    pub outcome: TaskOutcome,
}
