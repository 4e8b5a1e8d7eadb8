//! Document splitting and extraction: by chunk size, by explicit ranges,
//! first/last pair mode, and page-spec extraction into a single output.

use super::{stem_and_ext, PageEngine};
use crate::backend::{DocumentBackend, OutputDocument, SourceDocument};
use crate::error::{EngineError, Result};
use crate::range::{resolve_page_spec, PageSpan};
use std::path::{Path, PathBuf};

impl<B: DocumentBackend> PageEngine<B> {
    /// Partition the document into consecutive chunks of `pages_per_file`
    /// pages (the last chunk may be smaller). Outputs are named
    /// `{base}_part_{index:03}.{ext}` with a 1-based index. Returns the
    /// output paths in order.
    pub fn split_by_count(
        &mut self,
        input: &Path,
        out_dir: &Path,
        pages_per_file: usize,
    ) -> Result<Vec<PathBuf>> {
        if pages_per_file == 0 {
            return Err(EngineError::Validation(
                "pages_per_file must be at least 1".to_string(),
            ));
        }

        let source = self.backend().open(input)?;
        let total = source.page_count();
        if total == 0 {
            return Err(EngineError::Validation(format!(
                "document has no pages: {}",
                input.display()
            )));
        }

        let num_files = total.div_ceil(pages_per_file);
        let (stem, ext) = stem_and_ext(input);
        let mut outputs = Vec::with_capacity(num_files);

        tracing::info!(input = %input.display(), total, num_files, "splitting by count");

        for chunk in 0..num_files {
            self.check_cancelled()?;

            let start = chunk * pages_per_file;
            let end = ((chunk + 1) * pages_per_file).min(total);

            let mut out = self.backend().start_output();
            for index in start..end {
                out.copy_page(&source, index)?;
            }

            let path = out_dir.join(format!("{stem}_part_{:03}.{ext}", chunk + 1));
            out.save(&path)?;
            tracing::debug!(output = %path.display(), pages = end - start, "wrote chunk");
            outputs.push(path);
        }

        Ok(outputs)
    }

    /// Write one file per 1-indexed inclusive range. Every range is
    /// validated against the page total before any output is written; an
    /// invalid range fails naming the offending pair. Outputs are named
    /// `{base}_range_{start:03}-{end:03}.{ext}`.
    pub fn split_by_ranges(
        &mut self,
        input: &Path,
        out_dir: &Path,
        ranges: &[PageSpan],
    ) -> Result<Vec<PathBuf>> {
        let source = self.backend().open(input)?;
        let total = source.page_count();

        for span in ranges {
            span.validate(total)?;
        }

        let (stem, ext) = stem_and_ext(input);
        let mut outputs = Vec::with_capacity(ranges.len());

        tracing::info!(input = %input.display(), ranges = ranges.len(), "splitting by ranges");

        for span in ranges {
            self.check_cancelled()?;

            let mut out = self.backend().start_output();
            for index in span.indices() {
                out.copy_page(&source, index)?;
            }

            let path = out_dir.join(format!(
                "{stem}_range_{:03}-{:03}.{ext}",
                span.start, span.end
            ));
            out.save(&path)?;
            outputs.push(path);
        }

        Ok(outputs)
    }

    /// First-with-last symmetric pairing: page `i` with page
    /// `total - 1 - i`, two pages per output. Requires an even page count,
    /// validated before any write. Outputs are named
    /// `{base}_pair_{index:03}.{ext}`.
    pub fn split_pairs(&mut self, input: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let source = self.backend().open(input)?;
        let total = source.page_count();

        if total % 2 != 0 {
            return Err(EngineError::Validation(format!(
                "pair mode requires an even page count, document has {total} pages"
            )));
        }

        let (stem, ext) = stem_and_ext(input);
        let num_pairs = total / 2;
        let mut outputs = Vec::with_capacity(num_pairs);

        tracing::info!(input = %input.display(), num_pairs, "splitting into pairs");

        for pair in 0..num_pairs {
            self.check_cancelled()?;

            let mut out = self.backend().start_output();
            out.copy_page(&source, pair)?;
            out.copy_page(&source, total - 1 - pair)?;

            let path = out_dir.join(format!("{stem}_pair_{:03}.{ext}", pair + 1));
            out.save(&path)?;
            outputs.push(path);
        }

        Ok(outputs)
    }

    /// Copy the pages selected by `page_spec` into a single output
    /// document, in spec order with duplicates preserved. `None` extracts
    /// every page. Cancellation is checked per copied page.
    pub fn extract_pages(
        &mut self,
        input: &Path,
        output: &Path,
        page_spec: Option<&str>,
    ) -> Result<()> {
        let source = self.backend().open(input)?;
        let total = source.page_count();
        let indices = match page_spec {
            Some(spec) => resolve_page_spec(spec, total)?,
            None => (0..total).collect(),
        };

        tracing::info!(input = %input.display(), pages = indices.len(), "extracting pages");

        let mut out = self.backend().start_output();
        for index in indices {
            self.check_cancelled()?;
            out.copy_page(&source, index)?;
        }

        out.save(output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::CancellingBackend;
    use crate::backend::MemoryBackend;

    fn engine_with(path: &str, pages: usize) -> (PageEngine<MemoryBackend>, MemoryBackend) {
        let backend = MemoryBackend::new();
        backend.insert(path, pages);
        (PageEngine::new(backend.clone()), backend)
    }

    #[test]
    fn test_split_by_count_chunk_sizes() {
        let (mut engine, backend) = engine_with("doc.pdf", 25);

        let outputs = engine
            .split_by_count(Path::new("doc.pdf"), Path::new("out"), 10)
            .unwrap();

        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/doc_part_001.pdf"),
                PathBuf::from("out/doc_part_002.pdf"),
                PathBuf::from("out/doc_part_003.pdf"),
            ]
        );

        let counts: Vec<usize> = outputs
            .iter()
            .map(|p| backend.document(p).unwrap().page_count())
            .collect();
        assert_eq!(counts, vec![10, 10, 5]);

        // Pages stay in original order across chunks.
        let last = backend.document("out/doc_part_003.pdf").unwrap();
        assert_eq!(last.labels(), vec!["doc:21", "doc:22", "doc:23", "doc:24", "doc:25"]);
    }

    #[test]
    fn test_split_by_count_exact_multiple() {
        let (mut engine, backend) = engine_with("doc.pdf", 6);

        let outputs = engine
            .split_by_count(Path::new("doc.pdf"), Path::new("out"), 3)
            .unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(backend.document(&outputs[1]).unwrap().page_count(), 3);
    }

    #[test]
    fn test_split_by_count_rejects_zero_chunk() {
        let (mut engine, _) = engine_with("doc.pdf", 5);
        assert!(engine
            .split_by_count(Path::new("doc.pdf"), Path::new("out"), 0)
            .is_err());
    }

    #[test]
    fn test_split_by_count_missing_input() {
        let mut engine = PageEngine::new(MemoryBackend::new());
        let err = engine
            .split_by_count(Path::new("absent.pdf"), Path::new("out"), 5)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_split_by_count_cancelled_before_first_chunk() {
        let (mut engine, backend) = engine_with("doc.pdf", 10);
        engine.cancel_flag().cancel();

        let err = engine
            .split_by_count(Path::new("doc.pdf"), Path::new("out"), 5)
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(!backend.exists("out/doc_part_001.pdf"));
    }

    #[test]
    fn test_split_by_ranges_names_and_contents() {
        let (mut engine, backend) = engine_with("doc.pdf", 10);

        let outputs = engine
            .split_by_ranges(
                Path::new("doc.pdf"),
                Path::new("out"),
                &[PageSpan::new(1, 3), PageSpan::new(8, 10)],
            )
            .unwrap();

        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/doc_range_001-003.pdf"),
                PathBuf::from("out/doc_range_008-010.pdf"),
            ]
        );
        let second = backend.document(&outputs[1]).unwrap();
        assert_eq!(second.labels(), vec!["doc:8", "doc:9", "doc:10"]);
    }

    #[test]
    fn test_split_by_ranges_invalid_pair_names_offender() {
        let (mut engine, backend) = engine_with("doc.pdf", 5);

        let err = engine
            .split_by_ranges(
                Path::new("doc.pdf"),
                Path::new("out"),
                &[PageSpan::new(1, 2), PageSpan::new(3, 9)],
            )
            .unwrap_err();
        assert!(err.to_string().contains("3-9"));
        // Validation happens up front; nothing was written.
        assert!(!backend.exists("out/doc_range_001-002.pdf"));
    }

    #[test]
    fn test_split_pairs_symmetric() {
        let (mut engine, backend) = engine_with("doc.pdf", 6);

        let outputs = engine
            .split_pairs(Path::new("doc.pdf"), Path::new("out"))
            .unwrap();
        assert_eq!(outputs.len(), 3);

        let first = backend.document("out/doc_pair_001.pdf").unwrap();
        assert_eq!(first.labels(), vec!["doc:1", "doc:6"]);
        let last = backend.document("out/doc_pair_003.pdf").unwrap();
        assert_eq!(last.labels(), vec!["doc:3", "doc:4"]);
    }

    #[test]
    fn test_split_pairs_odd_count_fails_before_writing() {
        let (mut engine, backend) = engine_with("doc.pdf", 7);

        let err = engine
            .split_pairs(Path::new("doc.pdf"), Path::new("out"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(!backend.exists("out/doc_pair_001.pdf"));
    }

    #[test]
    fn test_split_by_count_cancelled_mid_run_keeps_earlier_chunks() {
        let inner = MemoryBackend::new();
        inner.insert("doc.pdf", 10);

        // The flag rises while the first chunk is being written, so the
        // second chunk's check aborts the operation.
        let backend = CancellingBackend::new(inner.clone(), 2);
        let mut engine = PageEngine::new(backend.clone());
        backend.arm(engine.cancel_flag());

        let err = engine
            .split_by_count(Path::new("doc.pdf"), Path::new("out"), 5)
            .unwrap_err();
        assert!(err.is_cancelled());

        // Outputs written before the abort stay; nothing cleans them up.
        assert!(inner.exists("out/doc_part_001.pdf"));
        assert!(!inner.exists("out/doc_part_002.pdf"));
    }

    #[test]
    fn test_extract_pages_spec_order_and_duplicates() {
        let (mut engine, backend) = engine_with("doc.pdf", 6);

        engine
            .extract_pages(Path::new("doc.pdf"), Path::new("out.pdf"), Some("5,1-2,5"))
            .unwrap();

        let out = backend.document("out.pdf").unwrap();
        assert_eq!(out.labels(), vec!["doc:5", "doc:1", "doc:2", "doc:5"]);
    }

    #[test]
    fn test_extract_pages_without_spec_copies_all() {
        let (mut engine, backend) = engine_with("doc.pdf", 3);

        engine
            .extract_pages(Path::new("doc.pdf"), Path::new("out.pdf"), None)
            .unwrap();

        assert_eq!(
            backend.document("out.pdf").unwrap(),
            backend.document("doc.pdf").unwrap()
        );
    }

    #[test]
    fn test_extract_pages_malformed_spec_fails() {
        let (mut engine, backend) = engine_with("doc.pdf", 3);

        let err = engine
            .extract_pages(Path::new("doc.pdf"), Path::new("out.pdf"), Some("1-x"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(!backend.exists("out.pdf"));
    }
}
