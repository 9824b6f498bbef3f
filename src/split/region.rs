//! Region extraction from the embedded HTML blob
//!
//! The blob is segmented with a fixed delimiter grammar rather than ad hoc
//! substring splicing. Resolution order matters:
//!
//! 1. the style element (self-contained, resolved first)
//! 2. the script element
//! 3. the body interior, with the script element's span subtracted when it
//!    falls inside
//!
//! The body's boundaries are defined against the whole blob, so the style
//! and script spans must be known before the body can be carved out.
//! Absent elements produce empty regions with a warning; overlapping
//! resolved spans are a structural error.

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::split::error::SplitError;

static STYLE_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<style[^>]*>").unwrap());
static STYLE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</style>").unwrap());
static SCRIPT_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<script[^>]*>").unwrap());
static SCRIPT_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</script>").unwrap());
static BODY_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<body[^>]*>").unwrap());
static BODY_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</body>").unwrap());

/// Names of the sub-regions carried by the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Style,
    Body,
    Script,
}

impl RegionKind {
    pub fn all() -> [RegionKind; 3] {
        [RegionKind::Style, RegionKind::Body, RegionKind::Script]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RegionKind::Style => "style",
            RegionKind::Body => "body",
            RegionKind::Script => "script",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A named, contiguous sub-span of the blob.
///
/// A missing region keeps an empty span and empty content; it is never an
/// absent entry. Content is trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub kind: RegionKind,
    /// Byte range of the raw interior within the blob. Empty for absent
    /// regions.
    pub span: Range<usize>,
    pub content: String,
}

impl Region {
    fn absent(kind: RegionKind) -> Self {
        Self {
            kind,
            span: 0..0,
            content: String::new(),
        }
    }

    fn from_span(kind: RegionKind, blob: &str, span: Range<usize>) -> Self {
        let content = blob[span.clone()].trim().to_string();
        Self {
            kind,
            span,
            content,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.span.is_empty() && self.content.is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.content.len()
    }
}

/// Outcome of segmenting the blob: the three regions plus soft warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// All three regions, ordered by position in the blob; absent regions
    /// come last in structural order.
    pub regions: Vec<Region>,
    pub warnings: Vec<String>,
}

impl Extraction {
    pub fn region(&self, kind: RegionKind) -> &Region {
        self.regions
            .iter()
            .find(|r| r.kind == kind)
            .expect("extraction always carries all three regions")
    }
}

/// A delimiter pair resolved inside the blob.
struct PairSpan {
    /// Opening delimiter start through closing delimiter end.
    element: Range<usize>,
    /// Between the delimiters.
    interior: Range<usize>,
}

/// Find the first `open` delimiter and the first matching `close` after
/// it. A dangling open delimiter is reported and treated as absent.
fn find_pair(
    blob: &str,
    name: &str,
    open: &Regex,
    close: &Regex,
    warnings: &mut Vec<String>,
) -> Option<PairSpan> {
    let open_match = open.find(blob)?;
    match close.find_at(blob, open_match.end()) {
        Some(close_match) => Some(PairSpan {
            element: open_match.start()..close_match.end(),
            interior: open_match.end()..close_match.start(),
        }),
        None => {
            warnings.push(format!(
                "unterminated {} element at byte {}; treating the region as absent",
                name,
                open_match.start()
            ));
            None
        }
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Segment the blob into style, body and script regions.
pub fn extract(blob: &str) -> Result<Extraction, SplitError> {
    let mut warnings = Vec::new();

    let style_pair = find_pair(blob, "style", &STYLE_OPEN, &STYLE_CLOSE, &mut warnings);
    let script_pair = find_pair(blob, "script", &SCRIPT_OPEN, &SCRIPT_CLOSE, &mut warnings);
    let body_pair = find_pair(blob, "body", &BODY_OPEN, &BODY_CLOSE, &mut warnings);

    let style = match &style_pair {
        Some(pair) => Region::from_span(RegionKind::Style, blob, pair.interior.clone()),
        None => Region::absent(RegionKind::Style),
    };
    let script = match &script_pair {
        Some(pair) => Region::from_span(RegionKind::Script, blob, pair.interior.clone()),
        None => Region::absent(RegionKind::Script),
    };

    // The body region must stay contiguous, so when the script element sits
    // inside it the body ends where the script element starts. Anything
    // left between the script element and the body close marker cannot be
    // carried and is surfaced instead of dropped silently.
    let body = match &body_pair {
        Some(pair) => {
            let span = match &script_pair {
                Some(script_pair)
                    if pair.interior.start <= script_pair.element.start
                        && script_pair.element.end <= pair.interior.end =>
                {
                    let tail = &blob[script_pair.element.end..pair.interior.end];
                    if !tail.trim().is_empty() {
                        warnings.push(format!(
                            "{} bytes of content between the script element and the body \
                             close marker are outside every region",
                            tail.trim().len()
                        ));
                    }
                    pair.interior.start..script_pair.element.start
                }
                _ => pair.interior.clone(),
            };
            Region::from_span(RegionKind::Body, blob, span)
        }
        None => Region::absent(RegionKind::Body),
    };

    for region in [&style, &body, &script] {
        if region.is_absent() {
            warnings.push(format!(
                "region '{}' not found; continuing with empty content",
                region.kind
            ));
        }
    }

    let mut regions = vec![style, body, script];
    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            if !regions[i].is_absent()
                && !regions[j].is_absent()
                && overlaps(&regions[i].span, &regions[j].span)
            {
                return Err(SplitError::RegionConflict {
                    first: regions[i].kind,
                    second: regions[j].kind,
                });
            }
        }
    }

    // Present regions in blob order; absent ones keep structural order at
    // the end.
    regions.sort_by_key(|r| {
        if r.is_absent() {
            (usize::MAX, r.kind as usize)
        } else {
            (r.span.start, r.kind as usize)
        }
    });

    Ok(Extraction { regions, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB: &str = "<!DOCTYPE html>\n<html>\n<head>\n<style>\nA{color:red}\n</style>\n</head>\n<body>\n<p>hi</p>\n<script>\nconsole.log(1)\n</script>\n</body>\n";

    #[test]
    fn test_extract_all_three_regions() {
        let extraction = extract(BLOB).unwrap();

        assert_eq!(extraction.region(RegionKind::Style).content, "A{color:red}");
        assert_eq!(extraction.region(RegionKind::Body).content, "<p>hi</p>");
        assert_eq!(
            extraction.region(RegionKind::Script).content,
            "console.log(1)"
        );
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_regions_ordered_by_blob_position() {
        let extraction = extract(BLOB).unwrap();
        let kinds: Vec<_> = extraction.regions.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RegionKind::Style, RegionKind::Body, RegionKind::Script]
        );

        let starts: Vec<_> = extraction.regions.iter().map(|r| r.span.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_missing_script_is_soft() {
        let blob = "<style>\nA{}\n</style>\n<body>\n<p>hi</p>\n</body>\n";
        let extraction = extract(blob).unwrap();

        let script = extraction.region(RegionKind::Script);
        assert!(script.is_absent());
        assert_eq!(extraction.region(RegionKind::Body).content, "<p>hi</p>");
        assert!(extraction
            .warnings
            .iter()
            .any(|w| w.contains("region 'script' not found")));
    }

    #[test]
    fn test_missing_style_is_soft() {
        let blob = "<body>\n<p>hi</p>\n<script>\ngo()\n</script>\n</body>\n";
        let extraction = extract(blob).unwrap();

        assert!(extraction.region(RegionKind::Style).is_absent());
        assert_eq!(extraction.region(RegionKind::Script).content, "go()");
    }

    #[test]
    fn test_unterminated_script_warns_and_is_absent() {
        let blob = "<style>a{}</style>\n<body>\n<p>x</p>\n<script>\nrun(\n</body>\n";
        let extraction = extract(blob).unwrap();

        assert!(extraction.region(RegionKind::Script).is_absent());
        assert!(extraction
            .warnings
            .iter()
            .any(|w| w.contains("unterminated script element")));
    }

    #[test]
    fn test_style_inside_body_is_a_conflict() {
        let blob = "<body>\n<style>\na{}\n</style>\n<p>hi</p>\n</body>\n";
        let result = extract(blob);
        assert!(matches!(
            result,
            Err(SplitError::RegionConflict { .. })
        ));
    }

    #[test]
    fn test_content_after_script_inside_body_warns() {
        let blob = "<body>\n<p>a</p>\n<script>\ngo()\n</script>\n<p>tail</p>\n</body>\n";
        let extraction = extract(blob).unwrap();

        assert_eq!(extraction.region(RegionKind::Body).content, "<p>a</p>");
        assert!(extraction
            .warnings
            .iter()
            .any(|w| w.contains("outside every region")));
    }

    #[test]
    fn test_script_outside_body_keeps_whole_body_interior() {
        let blob = "<body>\n<p>hi</p>\n</body>\n<script>\ngo()\n</script>\n";
        let extraction = extract(blob).unwrap();

        assert_eq!(extraction.region(RegionKind::Body).content, "<p>hi</p>");
        assert_eq!(extraction.region(RegionKind::Script).content, "go()");
    }
}
