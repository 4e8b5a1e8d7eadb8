//! Document merging.

use super::PageEngine;
use crate::backend::{DocumentBackend, OutputDocument, SourceDocument};
use crate::error::{EngineError, Result};
use std::path::{Path, PathBuf};

impl<B: DocumentBackend> PageEngine<B> {
    /// Concatenate all pages of all inputs, in the given file order,
    /// preserving intra-file page order. At least one input is required; a
    /// single input is a plain copy. A missing input fails with `NotFound`.
    /// Cancellation is checked once per input file.
    pub fn merge(&mut self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        if inputs.is_empty() {
            return Err(EngineError::Validation(
                "merge requires at least one input document".to_string(),
            ));
        }

        tracing::info!(inputs = inputs.len(), output = %output.display(), "merging documents");

        let mut out = self.backend().start_output();
        for input in inputs {
            self.check_cancelled()?;

            let source = self.backend().open(input)?;
            for index in 0..source.page_count() {
                out.copy_page(&source, index)?;
            }
            tracing::debug!(input = %input.display(), pages = source.page_count(), "appended");
        }

        out.save(output)?;
        Ok(())
    }
}
