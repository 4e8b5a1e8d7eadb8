//! Test-only backend wrappers.

use super::memory::{MemoryBackend, MemoryDocument, MemoryOutput};
use super::DocumentBackend;
use crate::cancel::CancelFlag;
use crate::error::Result;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Wraps a [`MemoryBackend`] and raises a cancel flag once a fixed number
/// of backend calls (`open` or `start_output`) have been made, so tests can
/// cancel an operation deterministically mid-run.
#[derive(Clone)]
pub(crate) struct CancellingBackend {
    inner: MemoryBackend,
    flag: Arc<Mutex<Option<CancelFlag>>>,
    remaining: Arc<AtomicUsize>,
}

impl CancellingBackend {
    pub(crate) fn new(inner: MemoryBackend, calls_before_cancel: usize) -> Self {
        Self {
            inner,
            flag: Arc::new(Mutex::new(None)),
            remaining: Arc::new(AtomicUsize::new(calls_before_cancel)),
        }
    }

    /// Arm the wrapper with the engine's flag. The engine owns its flag, so
    /// this runs after engine construction.
    pub(crate) fn arm(&self, flag: CancelFlag) {
        *self.flag.lock().expect("flag slot poisoned") = Some(flag);
    }

    fn count_call(&self) {
        let prev = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if prev == Ok(1) {
            if let Some(flag) = self.flag.lock().expect("flag slot poisoned").as_ref() {
                flag.cancel();
            }
        }
    }
}

impl DocumentBackend for CancellingBackend {
    type Doc = MemoryDocument;
    type Out = MemoryOutput;

    fn open(&self, path: &Path) -> Result<MemoryDocument> {
        self.count_call();
        self.inner.open(path)
    }

    fn start_output(&self) -> MemoryOutput {
        self.count_call();
        self.inner.start_output()
    }
}
