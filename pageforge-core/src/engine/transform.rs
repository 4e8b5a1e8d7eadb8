//! Page attribute transforms: crop and rotate.

use super::PageEngine;
use crate::backend::{DocumentBackend, Margins, OutputDocument, SourceDocument};
use crate::error::{EngineError, Result};
use crate::range::resolve_page_spec;
use std::collections::HashSet;
use std::path::Path;

/// Clockwise rotation angle. Only quarter turns are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAngle {
    Clockwise90,
    Rotate180,
    Clockwise270,
}

impl RotationAngle {
    /// Validate a caller-supplied angle. Accepts exactly 90, 180 and 270.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees {
            90 => Ok(RotationAngle::Clockwise90),
            180 => Ok(RotationAngle::Rotate180),
            270 => Ok(RotationAngle::Clockwise270),
            _ => Err(EngineError::Validation(format!(
                "invalid rotation angle: {degrees} (must be 90, 180, or 270)"
            ))),
        }
    }

    pub fn to_degrees(self) -> u16 {
        match self {
            RotationAngle::Clockwise90 => 90,
            RotationAngle::Rotate180 => 180,
            RotationAngle::Clockwise270 => 270,
        }
    }
}

impl<B: DocumentBackend> PageEngine<B> {
    /// Shrink the visible box of the targeted pages inward by `margins`.
    /// `page_spec` selects targets through the range resolver; `None`
    /// applies to all pages. A page named more than once is cropped once.
    pub fn crop_pages(
        &mut self,
        input: &Path,
        output: &Path,
        margins: &Margins,
        page_spec: Option<&str>,
    ) -> Result<()> {
        let source = self.backend().open(input)?;
        let total = source.page_count();
        let targets = resolve_targets(page_spec, total)?;

        tracing::info!(input = %input.display(), targets = targets.len(), "cropping pages");

        let mut out = self.backend().start_output();
        for index in 0..total {
            out.copy_page(&source, index)?;
            if targets.contains(&index) {
                out.crop_page(index, margins)?;
            }
        }

        out.save(output)?;
        Ok(())
    }

    /// Rotate the targeted pages clockwise by `degrees` (90, 180 or 270;
    /// anything else fails validation). Rotation is added to whatever
    /// rotation a page already carries. A page named more than once is
    /// rotated once.
    pub fn rotate_pages(
        &mut self,
        input: &Path,
        output: &Path,
        degrees: i32,
        page_spec: Option<&str>,
    ) -> Result<()> {
        let angle = RotationAngle::from_degrees(degrees)?;

        let source = self.backend().open(input)?;
        let total = source.page_count();
        let targets = resolve_targets(page_spec, total)?;

        tracing::info!(input = %input.display(), degrees, targets = targets.len(), "rotating pages");

        let mut out = self.backend().start_output();
        for index in 0..total {
            out.copy_page(&source, index)?;
            if targets.contains(&index) {
                out.rotate_page(index, angle.to_degrees())?;
            }
        }

        out.save(output)?;
        Ok(())
    }
}

fn resolve_targets(page_spec: Option<&str>, total: usize) -> Result<HashSet<usize>> {
    match page_spec {
        Some(spec) => Ok(resolve_page_spec(spec, total)?.into_iter().collect()),
        None => Ok((0..total).collect()),
    }
}
