//! Anchor resolution over the source document
//!
//! An anchor is a named, compiled pattern plus the policy applied when the
//! pattern matches more than once. Boundary detection never guesses: zero
//! matches is always an error, and ambiguity is resolved by an explicit
//! policy rather than whatever the pattern engine happens to return.

use std::ops::Range;

use regex::Regex;

use crate::split::error::SplitError;

/// How an anchor resolves when its pattern matches more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Use the first match and record a warning.
    FirstMatchWins,
    /// More than one match is an error. Used for the header prologue,
    /// where the unique match doubles as the idempotency guard.
    RequireUnique,
}

/// A named pattern used to resolve a boundary in the document.
///
/// If the pattern declares a capture group, group 1 is the resolved
/// range; otherwise the whole match is.
#[derive(Debug, Clone)]
pub struct Anchor {
    name: String,
    pattern: Regex,
    policy: MatchPolicy,
}

/// The byte range an anchor resolved to, plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorHit {
    pub range: Range<usize>,
    pub matches: usize,
}

impl Anchor {
    pub fn new(name: impl Into<String>, pattern: Regex, policy: MatchPolicy) -> Self {
        Self {
            name: name.into(),
            pattern,
            policy,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the anchor against `text`.
    pub fn resolve(&self, text: &str, warnings: &mut Vec<String>) -> Result<AnchorHit, SplitError> {
        let mut captures = self.pattern.captures_iter(text);
        let first = captures.next().ok_or_else(|| SplitError::PatternNotFound {
            anchor: self.name.clone(),
            matches: 0,
        })?;
        let matches = 1 + captures.count();

        if matches > 1 {
            match self.policy {
                MatchPolicy::FirstMatchWins => warnings.push(format!(
                    "anchor '{}' matched {} times; using the first match",
                    self.name, matches
                )),
                MatchPolicy::RequireUnique => {
                    return Err(SplitError::PatternNotFound {
                        anchor: self.name.clone(),
                        matches,
                    })
                }
            }
        }

        let group = first.get(1).unwrap_or_else(|| {
            first.get(0).expect("capture group 0 always present")
        });
        Ok(AnchorHit {
            range: group.range(),
            matches,
        })
    }
}

/// Spans resolved for a delimited block: the full span covering both
/// anchor matches, and the interior between them.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedSpan {
    pub full: Range<usize>,
    pub interior: Range<usize>,
}

/// Resolve an open/close anchor pair into the block they delimit.
///
/// Both anchors must match; the close match must not start before the
/// open match ends, otherwise the boundary is inconsistent.
pub fn locate(
    text: &str,
    open: &Anchor,
    close: &Anchor,
    warnings: &mut Vec<String>,
) -> Result<LocatedSpan, SplitError> {
    let open_hit = open.resolve(text, warnings)?;
    let close_hit = close.resolve(text, warnings)?;

    if close_hit.range.start < open_hit.range.end {
        return Err(SplitError::InvalidBoundary {
            anchor: close.name().to_string(),
            start: open_hit.range.end,
            end: close_hit.range.start,
        });
    }

    Ok(LocatedSpan {
        full: open_hit.range.start..close_hit.range.end,
        interior: open_hit.range.end..close_hit.range.start,
    })
}
