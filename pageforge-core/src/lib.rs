//! # pageforge
//!
//! A page-indexing and batch-orchestration engine for paginated documents.
//!
//! ## Features
//!
//! - **Page ranges**: Parse human-written page specs like `"1-3,5,7-10"`
//! - **Page transforms**: Split, merge, insert, delete, replace, reorder, crop and rotate pages
//! - **Batch execution**: Queue tasks, run them with failure isolation and progress reporting
//! - **Scheduling**: Defer tasks to a trigger time, dispatched by polling
//! - **Templates & history**: Save task configurations by name, persist operation history as JSON
//! - **Backend seam**: Engine is generic over a [`backend::DocumentBackend`]; an in-memory backend ships for tests and tooling
//!
//! ## Quick Start
//!
//! ```rust
//! use pageforge::backend::MemoryBackend;
//! use pageforge::engine::PageEngine;
//! use std::path::Path;
//!
//! # fn main() -> pageforge::Result<()> {
//! let backend = MemoryBackend::new();
//! backend.insert("report.pdf", 25);
//!
//! let mut engine = PageEngine::new(backend);
//! let parts = engine.split_by_count(Path::new("report.pdf"), Path::new("out"), 10)?;
//! assert_eq!(parts.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch Orchestration
//!
//! ```rust
//! use pageforge::backend::MemoryBackend;
//! use pageforge::batch::{BatchOrchestrator, TaskSpec};
//! use pageforge::engine::PageEngine;
//! use std::path::PathBuf;
//!
//! let backend = MemoryBackend::new();
//! backend.insert("a.pdf", 3);
//! backend.insert("b.pdf", 4);
//!
//! let mut orchestrator = BatchOrchestrator::new(PageEngine::new(backend));
//! orchestrator.add_task(TaskSpec::Merge {
//!     inputs: vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
//!     output: PathBuf::from("merged.pdf"),
//! });
//!
//! let result = orchestrator.execute_batch_with_progress(|percent| {
//!     println!("{percent}%");
//! });
//! assert!(result.all_successful());
//! ```
//!
//! ## Modules
//!
//! - [`range`] - Page span and page spec resolution
//! - [`engine`] - The [`engine::PageEngine`] and its page operations
//! - [`backend`] - Document backend traits and the in-memory backend
//! - [`batch`] - Task queue, scheduler, templates, renaming and history
//! - [`cache`] - The LRU cache backing page-count memoization
//! - [`cancel`] - Shared cancellation flag for long operations

pub mod backend;
pub mod batch;
pub mod cache;
pub mod cancel;
pub mod engine;
pub mod error;
pub mod range;

pub use cancel::CancelFlag;
pub use error::{EngineError, Result};
pub use range::{resolve_page_spec, PageSpan};
