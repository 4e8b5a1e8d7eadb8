//! Page-level document transforms
//!
//! [`PageEngine`] drives an injected [`DocumentBackend`] through the
//! operations a caller sees: splitting, merging, page editing and page
//! attribute transforms. Page numbers are 1-indexed at this API and
//! converted to 0-indexed positions internally.
//!
//! Page-count lookups are memoized per path through an LRU cache. There is
//! no invalidation on underlying-file change; call
//! [`PageEngine::forget_page_count`] after rewriting a document in place.

mod edit;
mod merge;
mod split;
mod transform;

pub use edit::ReplaceReport;
pub use transform::RotationAngle;

use crate::backend::{DocumentBackend, SourceDocument};
use crate::cache::LruCache;
use crate::cancel::CancelFlag;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Default capacity of the page-count cache.
const PAGE_COUNT_CACHE_CAPACITY: usize = 100;

/// Page-transform engine over a document backend.
pub struct PageEngine<B: DocumentBackend> {
    backend: B,
    page_counts: LruCache<PathBuf, usize>,
    cancel: CancelFlag,
}

impl<B: DocumentBackend> PageEngine<B> {
    pub fn new(backend: B) -> Self {
        Self::with_cache_capacity(backend, PAGE_COUNT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(backend: B, capacity: usize) -> Self {
        Self {
            backend,
            page_counts: LruCache::new(capacity),
            cancel: CancelFlag::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Handle to the engine's cancellation flag. Raise it from another
    /// clone to abort the operation in flight at its next check point.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Total page count of the document at `path`, memoized per path.
    pub fn page_count(&mut self, path: &Path) -> Result<usize> {
        if let Some(&count) = self.page_counts.get(&path.to_path_buf()) {
            tracing::debug!(path = %path.display(), count, "page count from cache");
            return Ok(count);
        }
        let count = self.backend.open(path)?.page_count();
        self.page_counts.put(path.to_path_buf(), count);
        tracing::debug!(path = %path.display(), count, "page count computed");
        Ok(count)
    }

    /// Drop the memoized page count for `path`, if any.
    pub fn forget_page_count(&mut self, path: &Path) {
        self.page_counts.remove(&path.to_path_buf());
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        self.cancel.check()
    }
}

/// Split an input path into `(base_name, extension)` for output naming.
/// A missing extension falls back to `pdf`.
pub(crate) fn stem_and_ext(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pdf".to_string());
    (stem, ext)
}
