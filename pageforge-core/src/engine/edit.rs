//! Page editing: delete, insert, replace and reorder.

use super::PageEngine;
use crate::backend::{DocumentBackend, OutputDocument, SourceDocument};
use crate::error::{EngineError, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Outcome of a [`PageEngine::replace_pages`] call. A replacement shortfall
/// is not an error; the unreplaced page numbers are reported here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceReport {
    /// Number of target pages actually replaced.
    pub replaced: usize,
    /// Requested 1-indexed target pages left unreplaced because the
    /// replacement document ran out of pages.
    pub unreplaced: Vec<usize>,
}

impl ReplaceReport {
    pub fn is_complete(&self) -> bool {
        self.unreplaced.is_empty()
    }
}

impl<B: DocumentBackend> PageEngine<B> {
    /// Copy every page whose 1-indexed number is not in `page_numbers`,
    /// preserving original order. Each number must be within
    /// `[1, total_pages]`.
    pub fn delete_pages(
        &mut self,
        input: &Path,
        output: &Path,
        page_numbers: &[usize],
    ) -> Result<()> {
        let source = self.backend().open(input)?;
        let total = source.page_count();
        let doomed = validated_page_set(page_numbers, total)?;

        tracing::info!(input = %input.display(), pages = ?page_numbers, "deleting pages");

        let mut out = self.backend().start_output();
        for index in 0..total {
            if !doomed.contains(&(index + 1)) {
                out.copy_page(&source, index)?;
            }
        }

        out.save(output)?;
        Ok(())
    }

    /// Insert all pages of `insert` into `target` before the 1-indexed
    /// `position`. Valid positions are `[1, target_total + 1]`; the latter
    /// appends.
    pub fn insert_pages(
        &mut self,
        target: &Path,
        insert: &Path,
        output: &Path,
        position: usize,
    ) -> Result<()> {
        let target_doc = self.backend().open(target)?;
        let target_total = target_doc.page_count();

        if position < 1 || position > target_total + 1 {
            return Err(EngineError::Validation(format!(
                "invalid insert position: {position} (valid range 1-{})",
                target_total + 1
            )));
        }

        let insert_doc = self.backend().open(insert)?;

        tracing::info!(
            target = %target.display(),
            insert = %insert.display(),
            position,
            "inserting pages"
        );

        let mut out = self.backend().start_output();
        for index in 0..position - 1 {
            out.copy_page(&target_doc, index)?;
        }
        for index in 0..insert_doc.page_count() {
            out.copy_page(&insert_doc, index)?;
        }
        for index in position - 1..target_total {
            out.copy_page(&target_doc, index)?;
        }

        out.save(output)?;
        Ok(())
    }

    /// Replace the target pages named in `page_numbers` (consumed in
    /// ascending target order) with the replacement document's pages in
    /// file order. If the replacement runs short, the remaining requested
    /// pages keep their original content; that shortfall is a warning, not
    /// an error.
    pub fn replace_pages(
        &mut self,
        target: &Path,
        replacement: &Path,
        output: &Path,
        page_numbers: &[usize],
    ) -> Result<ReplaceReport> {
        let target_doc = self.backend().open(target)?;
        let total = target_doc.page_count();
        let requested = validated_page_set(page_numbers, total)?;

        let replacement_doc = self.backend().open(replacement)?;
        let available = replacement_doc.page_count();

        if available < requested.len() {
            tracing::warn!(
                requested = requested.len(),
                available,
                "replacement has fewer pages than requested; extra pages left unreplaced"
            );
        }

        let mut out = self.backend().start_output();
        let mut next_replacement = 0;
        let mut unreplaced = Vec::new();

        for index in 0..total {
            let page_number = index + 1;
            if requested.contains(&page_number) {
                if next_replacement < available {
                    out.copy_page(&replacement_doc, next_replacement)?;
                    next_replacement += 1;
                } else {
                    unreplaced.push(page_number);
                    out.copy_page(&target_doc, index)?;
                }
            } else {
                out.copy_page(&target_doc, index)?;
            }
        }

        out.save(output)?;
        Ok(ReplaceReport {
            replaced: next_replacement,
            unreplaced,
        })
    }

    /// Rebuild the document in the order given by `new_order` (1-indexed).
    /// The list length must equal the page total and every entry must be
    /// within `[1, total_pages]`; repeats are permitted and duplicate that
    /// source page.
    pub fn reorder_pages(
        &mut self,
        input: &Path,
        output: &Path,
        new_order: &[usize],
    ) -> Result<()> {
        let source = self.backend().open(input)?;
        let total = source.page_count();

        if new_order.len() != total {
            return Err(EngineError::Validation(format!(
                "page order has {} entries, document has {} pages",
                new_order.len(),
                total
            )));
        }
        for &page_number in new_order {
            if page_number < 1 || page_number > total {
                return Err(EngineError::Validation(format!(
                    "invalid page number: {page_number} (document has {total} pages)"
                )));
            }
        }

        tracing::info!(input = %input.display(), "reordering pages");

        let mut out = self.backend().start_output();
        for &page_number in new_order {
            out.copy_page(&source, page_number - 1)?;
        }

        out.save(output)?;
        Ok(())
    }
}

fn validated_page_set(page_numbers: &[usize], total: usize) -> Result<BTreeSet<usize>> {
    for &page_number in page_numbers {
        if page_number < 1 || page_number > total {
            return Err(EngineError::Validation(format!(
                "invalid page number: {page_number} (document has {total} pages)"
            )));
        }
    }
    Ok(page_numbers.iter().copied().collect())
}
