//! Batch task definitions.

use crate::backend::Margins;
use crate::range::PageSpan;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle of a task. Transitions only move forward:
/// pending -> processing -> completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// What a task does. One variant per engine operation, plus `External` for
/// work dispatched to a registered collaborator (conversion, OCR, signing).
/// An external kind nobody claims fails that task only.
#[derive(Debug, Clone)]
pub enum TaskSpec {
    SplitByCount {
        input: PathBuf,
        output_dir: PathBuf,
        pages_per_file: usize,
    },
    SplitByRanges {
        input: PathBuf,
        output_dir: PathBuf,
        ranges: Vec<PageSpan>,
    },
    SplitPairs {
        input: PathBuf,
        output_dir: PathBuf,
    },
    ExtractPages {
        input: PathBuf,
        output: PathBuf,
        pages: Option<String>,
    },
    Merge {
        inputs: Vec<PathBuf>,
        output: PathBuf,
    },
    DeletePages {
        input: PathBuf,
        output: PathBuf,
        pages: Vec<usize>,
    },
    InsertPages {
        target: PathBuf,
        insert: PathBuf,
        output: PathBuf,
        position: usize,
    },
    ReplacePages {
        target: PathBuf,
        replacement: PathBuf,
        output: PathBuf,
        pages: Vec<usize>,
    },
    ReorderPages {
        input: PathBuf,
        output: PathBuf,
        order: Vec<usize>,
    },
    CropPages {
        input: PathBuf,
        output: PathBuf,
        margins: Margins,
        pages: Option<String>,
    },
    RotatePages {
        input: PathBuf,
        output: PathBuf,
        degrees: i32,
        pages: Option<String>,
    },
    External {
        kind: String,
        inputs: Vec<PathBuf>,
        output: PathBuf,
    },
}

impl TaskSpec {
    /// Stable operation name, used in outcomes and history records.
    pub fn kind(&self) -> &str {
        match self {
            TaskSpec::SplitByCount { .. } => "split_by_count",
            TaskSpec::SplitByRanges { .. } => "split_by_ranges",
            TaskSpec::SplitPairs { .. } => "split_pairs",
            TaskSpec::ExtractPages { .. } => "extract_pages",
            TaskSpec::Merge { .. } => "merge",
            TaskSpec::DeletePages { .. } => "delete_pages",
            TaskSpec::InsertPages { .. } => "insert_pages",
            TaskSpec::ReplacePages { .. } => "replace_pages",
            TaskSpec::ReorderPages { .. } => "reorder_pages",
            TaskSpec::CropPages { .. } => "crop_pages",
            TaskSpec::RotatePages { .. } => "rotate_pages",
            TaskSpec::External { kind, .. } => kind,
        }
    }

    /// Input paths the task reads.
    pub fn input_files(&self) -> Vec<PathBuf> {
        match self {
            TaskSpec::SplitByCount { input, .. }
            | TaskSpec::SplitByRanges { input, .. }
            | TaskSpec::SplitPairs { input, .. }
            | TaskSpec::ExtractPages { input, .. }
            | TaskSpec::DeletePages { input, .. }
            | TaskSpec::ReorderPages { input, .. }
            | TaskSpec::CropPages { input, .. }
            | TaskSpec::RotatePages { input, .. } => vec![input.clone()],
            TaskSpec::Merge { inputs, .. } | TaskSpec::External { inputs, .. } => inputs.clone(),
            TaskSpec::InsertPages { target, insert, .. } => {
                vec![target.clone(), insert.clone()]
            }
            TaskSpec::ReplacePages {
                target,
                replacement,
                ..
            } => vec![target.clone(), replacement.clone()],
        }
    }
}

impl fmt::Display for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskSpec::Merge { inputs, output } => {
                write!(f, "merge {} files to {}", inputs.len(), output.display())
            }
            TaskSpec::External { kind, inputs, .. } => {
                write!(f, "{kind} ({} inputs)", inputs.len())
            }
            other => {
                let input = other
                    .input_files()
                    .first()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                write!(f, "{} {input}", other.kind())
            }
        }
    }
}

/// A queued unit of work and its bookkeeping.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: u64,
    pub spec: TaskSpec,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Task {
    pub fn new(id: u64, spec: TaskSpec) -> Self {
        Self {
            id,
            spec,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
            error: None,
        }
    }
}

/// A deferred task, dispatched once its trigger time has passed.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub id: u64,
    pub task: Task,
    pub trigger_time: DateTime<Utc>,
}
