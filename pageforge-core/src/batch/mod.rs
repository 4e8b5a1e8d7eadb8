//! Batch orchestration over the page engine
//!
//! The orchestrator owns a task queue, named templates, an execution
//! history and a list of scheduled tasks. Everything runs strictly
//! sequentially on the calling thread: `execute_batch` walks the queue in
//! order, isolates each task's failure, reports progress through a
//! synchronous callback, and appends one history record per call.
//! Scheduling is poll-driven; callers invoke [`BatchOrchestrator::check_scheduled_tasks`]
//! periodically and no timer or thread is owned here.
//!
//! None of the queue-mutation operations are internally synchronized; a
//! caller sharing an orchestrator across threads must serialize access.

pub mod history;
pub mod rename;
pub mod result;
pub mod task;

pub use history::{HistoryLog, OperationRecord};
pub use rename::{batch_rename, RenameOutcome};
pub use result::{BatchResult, HistoryRecord, ScheduledOutcome, TaskOutcome};
pub use task::{ScheduledTask, Task, TaskSpec, TaskStatus};

use crate::backend::DocumentBackend;
use crate::engine::PageEngine;
use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// External collaborator for task kinds the engine does not implement
/// itself (conversion, OCR, signing). Registered on the orchestrator; an
/// `External` task whose kind nobody supports fails that task only.
pub trait Collaborator {
    fn supports(&self, kind: &str) -> bool;

    fn run(&mut self, kind: &str, inputs: &[PathBuf], output: &Path) -> Result<Vec<PathBuf>>;
}

/// A saved task configuration, reusable by name.
#[derive(Debug, Clone)]
pub struct Template {
    pub config: TaskSpec,
    pub created_at: DateTime<Utc>,
}

/// Sequential batch executor and scheduler over a [`PageEngine`].
pub struct BatchOrchestrator<B: DocumentBackend> {
    engine: PageEngine<B>,
    tasks: Vec<Task>,
    templates: HashMap<String, Template>,
    history: Vec<HistoryRecord>,
    scheduled: Vec<ScheduledTask>,
    collaborator: Option<Box<dyn Collaborator>>,
    next_task_id: u64,
    next_scheduled_id: u64,
}

impl<B: DocumentBackend> BatchOrchestrator<B> {
    pub fn new(engine: PageEngine<B>) -> Self {
        Self {
            engine,
            tasks: Vec::new(),
            templates: HashMap::new(),
            history: Vec::new(),
            scheduled: Vec::new(),
            collaborator: None,
            next_task_id: 1,
            next_scheduled_id: 1,
        }
    }

    /// Register the collaborator handling `External` task kinds.
    pub fn set_collaborator(&mut self, collaborator: Box<dyn Collaborator>) {
        self.collaborator = Some(collaborator);
    }

    pub fn engine(&self) -> &PageEngine<B> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut PageEngine<B> {
        &mut self.engine
    }

    // --- queue -----------------------------------------------------------

    /// Append a pending task; returns its id. Ids are monotonic and never
    /// reused, even after removals.
    pub fn add_task(&mut self, spec: TaskSpec) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        tracing::debug!(id, kind = spec.kind(), "task queued");
        self.tasks.push(Task::new(id, spec));
        id
    }

    /// Remove the task at `index`, if it exists.
    pub fn remove_task(&mut self, index: usize) -> Option<Task> {
        if index < self.tasks.len() {
            Some(self.tasks.remove(index))
        } else {
            None
        }
    }

    pub fn clear_tasks(&mut self) {
        self.tasks.clear();
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    // --- templates -------------------------------------------------------

    /// Save a named task configuration. Overwriting is last-write-wins.
    pub fn save_template(&mut self, name: impl Into<String>, config: TaskSpec) {
        self.templates.insert(
            name.into(),
            Template {
                config,
                created_at: Utc::now(),
            },
        );
    }

    pub fn load_template(&self, name: &str) -> Option<TaskSpec> {
        self.templates.get(name).map(|t| t.config.clone())
    }

    pub fn list_templates(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    // --- execution -------------------------------------------------------

    /// Execute the queue in order without progress reporting.
    pub fn execute_batch(&mut self) -> BatchResult {
        self.execute_batch_with_progress(|_| {})
    }

    /// Execute the queue in order. A failing task is recorded and does not
    /// abort the batch. After each task the callback receives
    /// `round(100 * (index + 1) / total)`, and a final `100` after the
    /// loop. One [`HistoryRecord`] is appended per call.
    pub fn execute_batch_with_progress(&mut self, mut progress: impl FnMut(u8)) -> BatchResult {
        let total = self.tasks.len();
        let mut result = BatchResult::empty();
        result.total = total;

        tracing::info!(total, "executing batch");

        for index in 0..total {
            self.tasks[index].status = TaskStatus::Processing;
            self.tasks[index].started_at = Some(Utc::now());

            let task_id = self.tasks[index].id;
            let spec = self.tasks[index].spec.clone();
            let outcome = match dispatch(&mut self.engine, self.collaborator.as_deref_mut(), &spec)
            {
                Ok((output_files, warning)) => {
                    self.tasks[index].status = TaskStatus::Completed;
                    result.success_count += 1;
                    let mut outcome = TaskOutcome::succeeded(task_id, spec.kind(), output_files);
                    if let Some(warning) = warning {
                        outcome = outcome.with_warning(warning);
                    }
                    outcome
                }
                Err(error) => {
                    tracing::warn!(task_id, %error, "task failed");
                    self.tasks[index].status = TaskStatus::Failed;
                    self.tasks[index].error = Some(error.to_string());
                    result.failed_count += 1;
                    TaskOutcome::failed(task_id, spec.kind(), error.to_string())
                }
            };
            self.tasks[index].ended_at = Some(Utc::now());
            result.outcomes.push(outcome);

            let percent = (100.0 * (index + 1) as f64 / total as f64).round() as u8;
            progress(percent);
        }

        progress(100);

        self.history.push(HistoryRecord {
            executed_at: Utc::now(),
            result: result.clone(),
        });

        result
    }

    /// Batch executions recorded so far, oldest first. Never pruned.
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    // --- scheduling ------------------------------------------------------

    /// Defer a task until `trigger_time`. The main queue is untouched;
    /// returns the scheduled id.
    pub fn schedule_task(&mut self, spec: TaskSpec, trigger_time: DateTime<Utc>) -> u64 {
        let scheduled_id = self.next_scheduled_id;
        self.next_scheduled_id += 1;

        let task_id = self.next_task_id;
        self.next_task_id += 1;

        tracing::debug!(scheduled_id, %trigger_time, "task scheduled");
        self.scheduled.push(ScheduledTask {
            id: scheduled_id,
            task: Task::new(task_id, spec),
            trigger_time,
        });
        scheduled_id
    }

    pub fn scheduled_tasks(&self) -> &[ScheduledTask] {
        &self.scheduled
    }

    /// Drop a scheduled task before it fires. Returns whether it existed.
    pub fn remove_scheduled_task(&mut self, scheduled_id: u64) -> bool {
        let before = self.scheduled.len();
        self.scheduled.retain(|s| s.id != scheduled_id);
        self.scheduled.len() != before
    }

    /// Poll-driven trigger: dispatch every scheduled task whose trigger
    /// time has passed, exactly once each, with the same failure isolation
    /// as `execute_batch`. Dispatched tasks leave the scheduled list
    /// whether they succeeded or not.
    pub fn check_scheduled_tasks(&mut self) -> Vec<ScheduledOutcome> {
        let now = Utc::now();
        let mut due = Vec::new();
        let mut remaining = Vec::new();
        for scheduled in self.scheduled.drain(..) {
            if scheduled.trigger_time <= now {
                due.push(scheduled);
            } else {
                remaining.push(scheduled);
            }
        }
        self.scheduled = remaining;

        let mut outcomes = Vec::with_capacity(due.len());
        for mut scheduled in due {
            scheduled.task.status = TaskStatus::Processing;
            scheduled.task.started_at = Some(Utc::now());

            let spec = scheduled.task.spec.clone();
            let outcome =
                match dispatch(&mut self.engine, self.collaborator.as_deref_mut(), &spec) {
                    Ok((output_files, warning)) => {
                        scheduled.task.status = TaskStatus::Completed;
                        let mut outcome =
                            TaskOutcome::succeeded(scheduled.task.id, spec.kind(), output_files);
                        if let Some(warning) = warning {
                            outcome = outcome.with_warning(warning);
                        }
                        outcome
                    }
                    Err(error) => {
                        tracing::warn!(scheduled_id = scheduled.id, %error, "scheduled task failed");
                        scheduled.task.status = TaskStatus::Failed;
                        scheduled.task.error = Some(error.to_string());
                        TaskOutcome::failed(scheduled.task.id, spec.kind(), error.to_string())
                    }
                };
            scheduled.task.ended_at = Some(Utc::now());

            outcomes.push(ScheduledOutcome {
                scheduled_id: scheduled.id,
                task: scheduled.task,
                outcome,
            });
        }

        outcomes
    }

    // --- renaming --------------------------------------------------------

    /// Batch-rename files; see [`rename::batch_rename`].
    pub fn batch_rename(
        &self,
        files: &[PathBuf],
        pattern: &str,
        output_dir: Option<&Path>,
    ) -> Vec<RenameOutcome> {
        rename::batch_rename(files, pattern, output_dir)
    }
}

/// Map a task spec to the matching engine operation or collaborator and
/// return the produced files plus an optional non-fatal warning.
fn dispatch<B: DocumentBackend>(
    engine: &mut PageEngine<B>,
    collaborator: Option<&mut (dyn Collaborator + 'static)>,
    spec: &TaskSpec,
) -> Result<(Vec<PathBuf>, Option<String>)> {
    match spec {
        TaskSpec::SplitByCount {
            input,
            output_dir,
            pages_per_file,
        } => Ok((
            engine.split_by_count(input, output_dir, *pages_per_file)?,
            None,
        )),
        TaskSpec::SplitByRanges {
            input,
            output_dir,
            ranges,
        } => Ok((engine.split_by_ranges(input, output_dir, ranges)?, None)),
        TaskSpec::SplitPairs { input, output_dir } => {
            Ok((engine.split_pairs(input, output_dir)?, None))
        }
        TaskSpec::ExtractPages {
            input,
            output,
            pages,
        } => {
            engine.extract_pages(input, output, pages.as_deref())?;
            Ok((vec![output.clone()], None))
        }
        TaskSpec::Merge { inputs, output } => {
            engine.merge(inputs, output)?;
            Ok((vec![output.clone()], None))
        }
        TaskSpec::DeletePages {
            input,
            output,
            pages,
        } => {
            engine.delete_pages(input, output, pages)?;
            Ok((vec![output.clone()], None))
        }
        TaskSpec::InsertPages {
            target,
            insert,
            output,
            position,
        } => {
            engine.insert_pages(target, insert, output, *position)?;
            Ok((vec![output.clone()], None))
        }
        TaskSpec::ReplacePages {
            target,
            replacement,
            output,
            pages,
        } => {
            let report = engine.replace_pages(target, replacement, output, pages)?;
            let warning = (!report.is_complete()).then(|| {
                format!(
                    "replacement ran short; pages {:?} left unreplaced",
                    report.unreplaced
                )
            });
            Ok((vec![output.clone()], warning))
        }
        TaskSpec::ReorderPages {
            input,
            output,
            order,
        } => {
            engine.reorder_pages(input, output, order)?;
            Ok((vec![output.clone()], None))
        }
        TaskSpec::CropPages {
            input,
            output,
            margins,
            pages,
        } => {
            engine.crop_pages(input, output, margins, pages.as_deref())?;
            Ok((vec![output.clone()], None))
        }
        TaskSpec::RotatePages {
            input,
            output,
            degrees,
            pages,
        } => {
            engine.rotate_pages(input, output, *degrees, pages.as_deref())?;
            Ok((vec![output.clone()], None))
        }
        TaskSpec::External {
            kind,
            inputs,
            output,
        } => match collaborator {
            Some(collaborator) if collaborator.supports(kind) => {
                Ok((collaborator.run(kind, inputs, output)?, None))
            }
            _ => Err(EngineError::Validation(format!(
                "unsupported task kind: {kind}"
            ))),
        },
    }
}
