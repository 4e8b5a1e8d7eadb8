//! Page-range parsing and validation
//!
//! User-facing page specs are comma-separated lists of 1-indexed tokens,
//! either a single page number or an inclusive `start-end` pair, e.g.
//! `"1-3,5,7-10"`. Resolution produces 0-indexed page indices in token
//! order, without deduplication.

use crate::error::{EngineError, Result};
use std::fmt;

/// An inclusive 1-indexed page range, as given by callers of range-mode
/// splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub start: usize,
    pub end: usize,
}

impl PageSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check `1 <= start <= end <= total_pages`, naming the offending pair
    /// on failure.
    pub fn validate(&self, total_pages: usize) -> Result<()> {
        if self.start < 1 || self.end > total_pages || self.start > self.end {
            return Err(EngineError::Validation(format!(
                "invalid page range: {}-{} (document has {} pages)",
                self.start, self.end, total_pages
            )));
        }
        Ok(())
    }

    /// The 0-indexed page indices covered by this span.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        (self.start - 1)..self.end
    }
}

impl fmt::Display for PageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Resolve a page spec string against a document's page total.
///
/// Rules, carried from the original behavior:
/// - pair tokens are emitted ascending, with `end` clipped to `total_pages`;
///   a reversed pair (`start > end`) contributes nothing
/// - a single page number beyond `total_pages` is silently skipped
/// - output preserves token order and duplicates
///
/// Only syntactically malformed tokens fail: non-numeric text, empty
/// tokens, and page number 0 (pages are 1-indexed).
pub fn resolve_page_spec(spec: &str, total_pages: usize) -> Result<Vec<usize>> {
    let mut pages = Vec::new();

    for token in spec.split(',') {
        let token = token.trim();
        if let Some((start, end)) = token.split_once('-') {
            let start = parse_page_number(start.trim(), token)?;
            let end = parse_page_number(end.trim(), token)?;
            // Reversed pairs yield an empty contribution rather than an error.
            for page in start..=end.min(total_pages) {
                pages.push(page - 1);
            }
        } else {
            let page = parse_page_number(token, token)?;
            if page <= total_pages {
                pages.push(page - 1);
            } else {
                tracing::debug!(page, total_pages, "skipping out-of-range page");
            }
        }
    }

    Ok(pages)
}

fn parse_page_number(text: &str, token: &str) -> Result<usize> {
    let page: usize = text
        .parse()
        .map_err(|_| EngineError::Validation(format!("malformed page token: '{token}'")))?;
    if page == 0 {
        return Err(EngineError::Validation(format!(
            "page numbers start at 1: '{token}'"
        )));
    }
    Ok(page)
}
