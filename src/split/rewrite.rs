//! Single-pass text rewriting
//!
//! Edits are computed against the original byte offsets, validated to be
//! pairwise disjoint, and applied in reverse offset order so no edit ever
//! invalidates another's offsets.

use std::ops::Range;

use crate::split::anchor::Anchor;
use crate::split::error::SplitError;

/// One replacement of a byte range with new text.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// An ordered set of edits applied to the document in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewritePlan {
    edits: Vec<Edit>,
}

impl RewritePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Net byte delta of applying the plan.
    pub fn delta(&self) -> i64 {
        self.edits
            .iter()
            .map(|e| e.replacement.len() as i64 - e.range.len() as i64)
            .sum()
    }

    /// Apply every edit to `text` in one pass.
    ///
    /// Edits are sorted by start offset, checked for overlap and bounds,
    /// then applied highest-offset first.
    pub fn apply(&self, text: &str) -> Result<String, SplitError> {
        let mut sorted: Vec<&Edit> = self.edits.iter().collect();
        sorted.sort_by_key(|e| e.range.start);

        for edit in &sorted {
            if edit.range.start > edit.range.end || edit.range.end > text.len() {
                return Err(SplitError::InvalidBoundary {
                    anchor: "rewrite-plan".into(),
                    start: edit.range.start,
                    end: edit.range.end,
                });
            }
        }
        for pair in sorted.windows(2) {
            if pair[0].range.end > pair[1].range.start {
                return Err(SplitError::InvalidBoundary {
                    anchor: "rewrite-plan".into(),
                    start: pair[1].range.start,
                    end: pair[0].range.end,
                });
            }
        }

        let mut out = text.to_string();
        for edit in sorted.iter().rev() {
            out.replace_range(edit.range.clone(), &edit.replacement);
        }
        Ok(out)
    }
}

/// Build the edit that replaces the legacy header prologue.
///
/// The anchor must resolve uniquely; on an already-split document it no
/// longer matches and the run aborts here, before the document write.
pub fn header_edit(
    text: &str,
    header: &Anchor,
    replacement: &str,
    warnings: &mut Vec<String>,
) -> Result<Edit, SplitError> {
    let hit = header.resolve(text, warnings)?;
    Ok(Edit {
        range: hit.range,
        replacement: replacement.to_string(),
    })
}

/// Build the edit that replaces the located method span with the
/// composed template.
pub fn method_edit(method_span: Range<usize>, template: &str) -> Edit {
    Edit {
        range: method_span,
        replacement: template.to_string(),
    }
}
