//! Document backend seam
//!
//! The engine does not parse or write document byte streams itself. It
//! drives an injected backend through these traits: open a source document,
//! ask for its page count, copy pages into a new output document, mutate
//! per-page attributes (rotation, crop box) and save the result. Backends
//! own the on-disk format.

pub mod memory;
#[cfg(test)]
pub(crate) mod testing;

pub use memory::{MemoryBackend, MemoryDocument, MemoryPage};

use crate::error::Result;
use std::path::Path;

/// Inward offsets, in points, applied from each page edge when cropping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Uniform margin on all four edges.
    pub fn uniform(amount: f64) -> Self {
        Self::new(amount, amount, amount, amount)
    }
}

/// An opened paginated document. Owned for the duration of one operation;
/// never retained across operations.
pub trait SourceDocument {
    fn page_count(&self) -> usize;
}

/// A document under construction. Pages are copied in from source
/// documents, then per-page attributes may be adjusted before saving.
pub trait OutputDocument {
    type Doc: SourceDocument;

    /// Append a copy of `source`'s page at the given 0-indexed position.
    fn copy_page(&mut self, source: &Self::Doc, index: usize) -> Result<()>;

    fn page_count(&self) -> usize;

    /// Add a clockwise rotation to the page at `index`, modulo 360.
    fn rotate_page(&mut self, index: usize, degrees: u16) -> Result<()>;

    /// Shrink the page's visible box inward by the margin amounts.
    fn crop_page(&mut self, index: usize, margins: &Margins) -> Result<()>;

    fn save(&self, path: &Path) -> Result<()>;
}

/// Factory for source and output documents.
pub trait DocumentBackend {
    type Doc: SourceDocument;
    type Out: OutputDocument<Doc = Self::Doc>;

    /// Open an existing document; missing paths fail with `NotFound`.
    fn open(&self, path: &Path) -> Result<Self::Doc>;

    /// Start an empty output document.
    fn start_output(&self) -> Self::Out;
}
