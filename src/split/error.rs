//! Fatal error types shared by the split components

use std::fmt;
use std::path::PathBuf;

use crate::split::region::RegionKind;

/// Errors that abort a split run.
///
/// Missing optional regions are not represented here; they are recovered
/// locally with empty content and surfaced as warnings in the report.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitError {
    /// A required pattern had zero matches, or a unique-match pattern had
    /// more than one.
    PatternNotFound { anchor: String, matches: usize },
    /// Resolved offsets are inconsistent (the start is not before the end).
    InvalidBoundary {
        anchor: String,
        start: usize,
        end: usize,
    },
    /// Two extracted regions overlap.
    RegionConflict {
        first: RegionKind,
        second: RegionKind,
    },
    /// A filesystem read or write failed.
    Io { path: PathBuf, message: String },
}

impl SplitError {
    /// Build an `Io` error from any displayable cause.
    pub fn io(path: impl Into<PathBuf>, cause: impl fmt::Display) -> Self {
        SplitError::Io {
            path: path.into(),
            message: cause.to_string(),
        }
    }
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::PatternNotFound { anchor, matches: 0 } => {
                write!(f, "pattern '{}' not found", anchor)
            }
            SplitError::PatternNotFound { anchor, matches } => {
                write!(
                    f,
                    "pattern '{}' matched {} times, expected exactly one",
                    anchor, matches
                )
            }
            SplitError::InvalidBoundary { anchor, start, end } => {
                write!(
                    f,
                    "invalid boundary for '{}': start {} is not before end {}",
                    anchor, start, end
                )
            }
            SplitError::RegionConflict { first, second } => {
                write!(f, "regions '{}' and '{}' overlap", first, second)
            }
            SplitError::Io { path, message } => {
                write!(f, "io error on {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for SplitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_not_found_display() {
        let err = SplitError::PatternNotFound {
            anchor: "method-open".into(),
            matches: 0,
        };
        assert_eq!(format!("{}", err), "pattern 'method-open' not found");

        let err = SplitError::PatternNotFound {
            anchor: "header-prologue".into(),
            matches: 3,
        };
        assert_eq!(
            format!("{}", err),
            "pattern 'header-prologue' matched 3 times, expected exactly one"
        );
    }

    #[test]
    fn test_region_conflict_display() {
        let err = SplitError::RegionConflict {
            first: RegionKind::Style,
            second: RegionKind::Body,
        };
        assert_eq!(format!("{}", err), "regions 'style' and 'body' overlap");
    }
}
