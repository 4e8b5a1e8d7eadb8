//! In-memory document backend
//!
//! Documents live in a path-keyed store shared by all clones of the
//! backend, standing in for a filesystem. Pages carry a label naming their
//! origin plus the mutable attributes the engine manipulates (rotation,
//! crop box), which makes transform results easy to assert on in tests.

use super::{DocumentBackend, Margins, OutputDocument, SourceDocument};
use crate::error::{EngineError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// A single page: origin label plus mutable attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPage {
    /// Identifies where the page came from, e.g. `"report:3"`.
    pub label: String,
    /// Accumulated clockwise rotation in degrees.
    pub rotation: u16,
    /// Visible box as `[llx, lly, urx, ury]`.
    pub crop_box: [f64; 4],
}

impl MemoryPage {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            rotation: 0,
            crop_box: DEFAULT_MEDIA_BOX,
        }
    }
}

/// A stored document: an ordered page list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDocument {
    pub pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    /// Labels of all pages, in order. Convenient for ordering assertions.
    pub fn labels(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.label.as_str()).collect()
    }
}

impl SourceDocument for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Backend over a shared path -> document map. Clones share the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<Mutex<HashMap<PathBuf, MemoryDocument>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document with `page_count` pages labelled `{stem}:{n}` where
    /// `n` is the 1-indexed page number.
    pub fn insert(&self, path: impl AsRef<Path>, page_count: usize) {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "doc".to_string());
        let pages = (1..=page_count)
            .map(|n| MemoryPage::new(format!("{stem}:{n}")))
            .collect();
        self.insert_document(path, MemoryDocument { pages });
    }

    /// Store a prebuilt document.
    pub fn insert_document(&self, path: impl AsRef<Path>, doc: MemoryDocument) {
        self.store
            .lock()
            .expect("memory store poisoned")
            .insert(path.as_ref().to_path_buf(), doc);
    }

    /// Fetch a stored document, if present.
    pub fn document(&self, path: impl AsRef<Path>) -> Option<MemoryDocument> {
        self.store
            .lock()
            .expect("memory store poisoned")
            .get(path.as_ref())
            .cloned()
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.store
            .lock()
            .expect("memory store poisoned")
            .contains_key(path.as_ref())
    }
}

impl DocumentBackend for MemoryBackend {
    type Doc = MemoryDocument;
    type Out = MemoryOutput;

    fn open(&self, path: &Path) -> Result<MemoryDocument> {
        self.document(path)
            .ok_or_else(|| EngineError::NotFound(path.to_path_buf()))
    }

    fn start_output(&self) -> MemoryOutput {
        MemoryOutput {
            backend: self.clone(),
            pages: Vec::new(),
        }
    }
}

/// Output document accumulating copied pages; `save` publishes it back to
/// the shared store.
pub struct MemoryOutput {
    backend: MemoryBackend,
    pages: Vec<MemoryPage>,
}

impl OutputDocument for MemoryOutput {
    type Doc = MemoryDocument;

    fn copy_page(&mut self, source: &MemoryDocument, index: usize) -> Result<()> {
        let page = source.pages.get(index).ok_or_else(|| {
            EngineError::Backend(format!(
                "page index {index} out of bounds (document has {} pages)",
                source.pages.len()
            ))
        })?;
        self.pages.push(page.clone());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn rotate_page(&mut self, index: usize, degrees: u16) -> Result<()> {
        let page = self.page_mut(index)?;
        page.rotation = (page.rotation + degrees) % 360;
        Ok(())
    }

    fn crop_page(&mut self, index: usize, margins: &Margins) -> Result<()> {
        let page = self.page_mut(index)?;
        let [llx, lly, urx, ury] = page.crop_box;
        page.crop_box = [
            llx + margins.left,
            lly + margins.bottom,
            urx - margins.right,
            ury - margins.top,
        ];
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.backend.insert_document(
            path,
            MemoryDocument {
                pages: self.pages.clone(),
            },
        );
        Ok(())
    }
}

impl MemoryOutput {
    fn page_mut(&mut self, index: usize) -> Result<&mut MemoryPage> {
        let count = self.pages.len();
        self.pages.get_mut(index).ok_or_else(|| {
            EngineError::Backend(format!(
                "page index {index} out of bounds (output has {count} pages)"
            ))
        })
    }
}
