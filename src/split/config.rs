//! Parameters for a split run
//!
//! `SplitSpec` carries everything the pipeline needs: the source path, the
//! artifact destination, the anchor patterns and the per-region artifact
//! parameters. The defaults describe the standard panel layout: a
//! TypeScript class whose `_getHtmlContent` method returns the whole
//! webview HTML as one template literal, preceded by a prologue of inline
//! data-format declarations. Every field can be overridden for sources
//! that deviate from that layout, and tests run against temp directories.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::split::anchor::{Anchor, MatchPolicy};
use crate::split::region::RegionKind;

/// Opens the HTML-producing method: the signature through the backtick
/// that starts the template literal. The blob begins right after it.
static METHOD_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"private _getHtmlContent\(\): string \{\s*return `").unwrap());

/// Closes the method: the end of the template literal through the
/// method's closing brace. The blob ends right before it.
static METHOD_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</html>`;\s*\}").unwrap());

/// The legacy prologue: the data-format version constant through the last
/// inline interface, up to (but not including) the class declaration.
/// Group 1 is the replaced span. After a successful split the constant no
/// longer exists, so a second run cannot match; this is the idempotency
/// guard.
static HEADER_PROLOGUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(const CURRENT_DATA_VERSION = \d+;.*?\n\})\n\s*\n(?:export\s+)?class\s")
        .unwrap()
});

/// Per-region artifact parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSpec {
    pub kind: RegionKind,
    /// File name inside the destination directory.
    pub file_name: String,
    /// Name of the exported constant.
    pub export_name: String,
    /// First line of the generated module's banner comment.
    pub banner: String,
}

/// Full parameter set for one split run.
#[derive(Debug, Clone)]
pub struct SplitSpec {
    pub source: PathBuf,
    pub out_dir: PathBuf,
    pub dry_run: bool,
    pub method_open: Regex,
    pub method_close: Regex,
    pub header_pattern: Regex,
    pub header_replacement: String,
    pub artifacts: Vec<ArtifactSpec>,
}

impl SplitSpec {
    /// Parameters for the standard panel layout: artifacts under
    /// `webview/` beside the source, one TypeScript module per region.
    pub fn panel_defaults(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let out_dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .join("webview");

        let artifacts = vec![
            ArtifactSpec {
                kind: RegionKind::Style,
                file_name: "styles.ts".into(),
                export_name: "panelStyles".into(),
                banner: "Panel stylesheet".into(),
            },
            ArtifactSpec {
                kind: RegionKind::Body,
                file_name: "template.ts".into(),
                export_name: "panelTemplate".into(),
                banner: "Panel HTML template".into(),
            },
            ArtifactSpec {
                kind: RegionKind::Script,
                file_name: "scripts.ts".into(),
                export_name: "panelScripts".into(),
                banner: "Panel frontend script".into(),
            },
        ];

        let header_replacement = "\
import { Block, PanelState, CURRENT_DATA_VERSION } from './types';
import { panelStyles } from './webview/styles';
import { panelTemplate } from './webview/template';
import { panelScripts } from './webview/scripts';"
            .to_string();

        Self {
            source,
            out_dir,
            dry_run: false,
            method_open: METHOD_OPEN.clone(),
            method_close: METHOD_CLOSE.clone(),
            header_pattern: HEADER_PROLOGUE.clone(),
            header_replacement,
            artifacts,
        }
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_header_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.header_replacement = replacement.into();
        self
    }

    pub fn artifact_for(&self, kind: RegionKind) -> Option<&ArtifactSpec> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn method_open_anchor(&self) -> Anchor {
        Anchor::new(
            "method-open",
            self.method_open.clone(),
            MatchPolicy::FirstMatchWins,
        )
    }

    pub fn method_close_anchor(&self) -> Anchor {
        Anchor::new(
            "method-close",
            self.method_close.clone(),
            MatchPolicy::FirstMatchWins,
        )
    }

    pub fn header_anchor(&self) -> Anchor {
        Anchor::new(
            "header-prologue",
            self.header_pattern.clone(),
            MatchPolicy::RequireUnique,
        )
    }

    /// The export name composed at a region's structural position, or a
    /// placeholder comment when no artifact is configured for it.
    fn export_ref(&self, kind: RegionKind) -> String {
        match self.artifact_for(kind) {
            Some(artifact) => format!("${{{}}}", artifact.export_name),
            None => String::new(),
        }
    }

    /// The replacement method body: the outer document structure is kept,
    /// the interior becomes a composition of the artifact exports.
    pub fn method_template(&self) -> String {
        format!(
            "private _getHtmlContent(): string {{\n        return `<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>Panel</title>\n    <style>\n{}\n    </style>\n</head>\n<body>\n{}\n    <script>\n{}\n    </script>\n</body>\n</html>`;\n    }}",
            self.export_ref(RegionKind::Style),
            self.export_ref(RegionKind::Body),
            self.export_ref(RegionKind::Script),
        )
    }
}
