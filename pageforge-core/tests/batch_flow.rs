//! End-to-end batch orchestration over the in-memory backend.

use pageforge::backend::{Margins, MemoryBackend, SourceDocument};
use pageforge::batch::{BatchOrchestrator, HistoryLog, OperationRecord, TaskSpec, TaskStatus};
use pageforge::engine::PageEngine;
use pageforge::PageSpan;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn orchestrator_with_docs(docs: &[(&str, usize)]) -> (BatchOrchestrator<MemoryBackend>, MemoryBackend) {
    let backend = MemoryBackend::new();
    for (path, pages) in docs {
        backend.insert(path, *pages);
    }
    let engine = PageEngine::new(backend.clone());
    (BatchOrchestrator::new(engine), backend)
}

#[test]
fn mixed_batch_isolates_failure_and_reports_progress() {
    let (mut orch, backend) =
        orchestrator_with_docs(&[("report.pdf", 25), ("appendix.pdf", 4)]);

    // 1: split into chunks of 10
    orch.add_task(TaskSpec::SplitByCount {
        input: PathBuf::from("report.pdf"),
        output_dir: PathBuf::from("out"),
        pages_per_file: 10,
    });
    // 2: merge a missing input, this one fails
    orch.add_task(TaskSpec::Merge {
        inputs: vec![PathBuf::from("missing.pdf")],
        output: PathBuf::from("out/merged.pdf"),
    });
    // 3: rotate the appendix, still runs
    orch.add_task(TaskSpec::RotatePages {
        input: PathBuf::from("appendix.pdf"),
        output: PathBuf::from("out/appendix_rot.pdf"),
        degrees: 90,
        pages: Some("1-2".to_string()),
    });

    let mut progress = Vec::new();
    let result = orch.execute_batch_with_progress(|p| progress.push(p));

    assert_eq!(result.total, 3);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failed_count, 1);
    assert_eq!(progress, vec![33, 67, 100, 100]);

    // Split produced the expected chunk files.
    assert_eq!(
        result.outcomes[0].output_files,
        vec![
            PathBuf::from("out/report_part_001.pdf"),
            PathBuf::from("out/report_part_002.pdf"),
            PathBuf::from("out/report_part_003.pdf"),
        ]
    );
    assert_eq!(
        backend
            .document("out/report_part_003.pdf")
            .unwrap()
            .page_count(),
        5
    );

    // The failure names the missing input; the third task still ran.
    assert!(result.outcomes[1].error.as_deref().unwrap().contains("missing.pdf"));
    let rotated = backend.document("out/appendix_rot.pdf").unwrap();
    let rotations: Vec<u16> = rotated.pages.iter().map(|p| p.rotation).collect();
    assert_eq!(rotations, vec![90, 90, 0, 0]);

    // Task statuses and one history record for the whole batch.
    let statuses: Vec<TaskStatus> = orch.tasks().iter().map(|t| t.status).collect();
    assert_eq!(
        statuses,
        vec![TaskStatus::Completed, TaskStatus::Failed, TaskStatus::Completed]
    );
    assert_eq!(orch.history().len(), 1);
    assert_eq!(orch.history()[0].result.failed_count, 1);
}

#[test]
fn split_edit_merge_pipeline() {
    let (mut orch, backend) = orchestrator_with_docs(&[("doc.pdf", 6), ("cover.pdf", 1)]);

    orch.add_task(TaskSpec::SplitByRanges {
        input: PathBuf::from("doc.pdf"),
        output_dir: PathBuf::from("out"),
        ranges: vec![PageSpan::new(1, 3), PageSpan::new(4, 6)],
    });
    orch.add_task(TaskSpec::Merge {
        inputs: vec![
            PathBuf::from("cover.pdf"),
            PathBuf::from("out/doc_range_001-003.pdf"),
        ],
        output: PathBuf::from("out/front.pdf"),
    });
    orch.add_task(TaskSpec::DeletePages {
        input: PathBuf::from("out/front.pdf"),
        output: PathBuf::from("out/front_trimmed.pdf"),
        pages: vec![2],
    });

    let result = orch.execute_batch();
    assert!(result.all_successful());

    let final_doc = backend.document("out/front_trimmed.pdf").unwrap();
    assert_eq!(final_doc.labels(), vec!["cover:1", "doc:2", "doc:3"]);
}

#[test]
fn crop_task_applies_margins() {
    let (mut orch, backend) = orchestrator_with_docs(&[("doc.pdf", 2)]);

    orch.add_task(TaskSpec::CropPages {
        input: PathBuf::from("doc.pdf"),
        output: PathBuf::from("out/cropped.pdf"),
        margins: Margins::uniform(18.0),
        pages: None,
    });

    assert!(orch.execute_batch().all_successful());
    let doc = backend.document("out/cropped.pdf").unwrap();
    assert_eq!(doc.pages[0].crop_box, [18.0, 18.0, 594.0, 774.0]);
}

#[test]
fn scheduled_tasks_fire_once_in_order() {
    let (mut orch, backend) = orchestrator_with_docs(&[("a.pdf", 2)]);

    let past = Utc::now() - Duration::seconds(10);
    let first = orch.schedule_task(
        TaskSpec::Merge {
            inputs: vec![PathBuf::from("a.pdf")],
            output: PathBuf::from("first.pdf"),
        },
        past,
    );
    let second = orch.schedule_task(
        TaskSpec::Merge {
            inputs: vec![PathBuf::from("a.pdf")],
            output: PathBuf::from("second.pdf"),
        },
        past + Duration::seconds(1),
    );
    orch.schedule_task(
        TaskSpec::Merge {
            inputs: vec![PathBuf::from("a.pdf")],
            output: PathBuf::from("never.pdf"),
        },
        Utc::now() + Duration::hours(1),
    );

    let outcomes = orch.check_scheduled_tasks();
    let ids: Vec<u64> = outcomes.iter().map(|o| o.scheduled_id).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(backend.exists("first.pdf"));
    assert!(backend.exists("second.pdf"));
    assert!(!backend.exists("never.pdf"));

    assert!(orch.check_scheduled_tasks().is_empty());
    assert_eq!(orch.scheduled_tasks().len(), 1);
}

#[test]
fn batch_outcomes_feed_the_persistent_history_log() {
    let (mut orch, _) = orchestrator_with_docs(&[("a.pdf", 2)]);

    orch.add_task(TaskSpec::Merge {
        inputs: vec![PathBuf::from("a.pdf")],
        output: PathBuf::from("out.pdf"),
    });
    orch.add_task(TaskSpec::Merge {
        inputs: vec![PathBuf::from("missing.pdf")],
        output: PathBuf::from("bad.pdf"),
    });
    let result = orch.execute_batch();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    let mut log = HistoryLog::open(&path);
    for outcome in &result.outcomes {
        let record = if outcome.success {
            OperationRecord::success(&outcome.operation, vec![], outcome.output_files.clone())
        } else {
            OperationRecord::failure(
                &outcome.operation,
                vec![],
                outcome.error.clone().unwrap_or_default(),
            )
        };
        log.add(record).unwrap();
    }

    let reopened = HistoryLog::open(&path);
    assert_eq!(reopened.len(), 2);
    assert!(reopened.records()[0].success);
    assert!(!reopened.records()[1].success);
}
