//! The split pipeline: orchestration, phase tracking and reporting
//!
//! Control flow is strictly linear:
//! Locate → Extract → Write artifacts → HeaderPatch → MethodPatch → Commit.
//! Every step validates its precondition before the next one runs. The
//! source document is written exactly once, at the very end; artifact
//! writes happen earlier and are not rolled back if a later phase aborts.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::split::anchor;
use crate::split::artifact::{self, Artifact};
use crate::split::config::SplitSpec;
use crate::split::document::SourceDocument;
use crate::split::error::SplitError;
use crate::split::region::{self, RegionKind};
use crate::split::rewrite::{self, RewritePlan};

/// Phases a fatal error can be attributed to, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Locate,
    Extract,
    Write,
    HeaderPatch,
    MethodPatch,
    Commit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Locate => "Locate",
            Phase::Extract => "Extract",
            Phase::Write => "Write",
            Phase::HeaderPatch => "HeaderPatch",
            Phase::MethodPatch => "MethodPatch",
            Phase::Commit => "Commit",
        };
        f.write_str(name)
    }
}

/// A fatal error tagged with the phase that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineError {
    pub phase: Phase,
    pub source: SplitError,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {} failed: {}", self.phase, self.source)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Progress of a run through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Located,
    Extracted,
    Written,
    HeaderPatched,
    MethodPatched,
    Done,
    Aborted,
}

/// Byte count of one extracted region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionStat {
    pub kind: RegionKind,
    pub bytes: usize,
}

/// One written (or, on a dry run, planned) artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactStat {
    pub kind: RegionKind,
    pub path: PathBuf,
    pub export_name: String,
    pub bytes: usize,
}

/// Human- and machine-readable outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub source: PathBuf,
    pub dry_run: bool,
    pub regions: Vec<RegionStat>,
    pub artifacts: Vec<ArtifactStat>,
    pub original_bytes: usize,
    pub rewritten_bytes: usize,
    pub delta: i64,
    pub warnings: Vec<String>,
}

impl SplitReport {
    /// Render the report for terminal output.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let heading = if self.dry_run {
            "would split"
        } else {
            "split"
        };
        out.push_str(&format!("{} {}\n", heading, self.source.display()));
        for stat in &self.artifacts {
            out.push_str(&format!(
                "  {:<6} {:>6} bytes -> {} ({})\n",
                stat.kind,
                region_bytes(&self.regions, stat.kind),
                stat.path.display(),
                stat.export_name
            ));
        }
        out.push_str(&format!(
            "document: {} -> {} bytes ({}{})\n",
            self.original_bytes,
            self.rewritten_bytes,
            if self.delta >= 0 { "+" } else { "" },
            self.delta
        ));
        if !self.warnings.is_empty() {
            out.push_str("warnings:\n");
            for warning in &self.warnings {
                out.push_str(&format!("  - {}\n", warning));
            }
        }
        out
    }
}

fn region_bytes(regions: &[RegionStat], kind: RegionKind) -> usize {
    regions
        .iter()
        .find(|r| r.kind == kind)
        .map(|r| r.bytes)
        .unwrap_or(0)
}

/// Runs one split from start to finish.
pub struct SplitPipeline {
    spec: SplitSpec,
    state: PipelineState,
}

impl SplitPipeline {
    pub fn new(spec: SplitSpec) -> Self {
        Self {
            spec,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn run(&mut self) -> Result<SplitReport, PipelineError> {
        let result = self.execute();
        if result.is_err() {
            self.state = PipelineState::Aborted;
        }
        result
    }

    fn execute(&mut self) -> Result<SplitReport, PipelineError> {
        let mut warnings = Vec::new();

        let document =
            SourceDocument::load(&self.spec.source).map_err(at_phase(Phase::Locate))?;

        // Locate
        let open = self.spec.method_open_anchor();
        let close = self.spec.method_close_anchor();
        let method_span = anchor::locate(document.text(), &open, &close, &mut warnings)
            .map_err(at_phase(Phase::Locate))?;
        self.state = PipelineState::Located;

        // Extract
        let blob = &document.text()[method_span.interior.clone()];
        let extraction = region::extract(blob).map_err(at_phase(Phase::Extract))?;
        warnings.extend(extraction.warnings.iter().cloned());
        self.state = PipelineState::Extracted;

        // Write artifacts
        let mut artifacts = Vec::new();
        for kind in RegionKind::all() {
            let Some(artifact_spec) = self.spec.artifact_for(kind) else {
                continue;
            };
            let region = extraction.region(kind);
            if region.content.contains('`') {
                warnings.push(format!(
                    "region '{}' contains a backtick; the generated template literal \
                     will not round-trip",
                    kind
                ));
            }
            artifacts.push((
                kind,
                Artifact::from_region(region, artifact_spec, &self.spec.out_dir, &self.spec.source),
            ));
        }

        let mut artifact_stats = Vec::new();
        for (kind, art) in &artifacts {
            let bytes = if self.spec.dry_run {
                art.render().len()
            } else {
                artifact::write(art).map_err(at_phase(Phase::Write))?.bytes
            };
            artifact_stats.push(ArtifactStat {
                kind: *kind,
                path: art.path.clone(),
                export_name: art.export_name.clone(),
                bytes,
            });
        }
        self.state = PipelineState::Written;

        // HeaderPatch
        let header = self.spec.header_anchor();
        let header_edit = rewrite::header_edit(
            document.text(),
            &header,
            &self.spec.header_replacement,
            &mut warnings,
        )
        .map_err(at_phase(Phase::HeaderPatch))?;
        self.state = PipelineState::HeaderPatched;

        // MethodPatch
        let template = self.spec.method_template();
        let mut plan = RewritePlan::new();
        plan.push(header_edit);
        plan.push(rewrite::method_edit(method_span.full.clone(), &template));
        let rewritten = plan
            .apply(document.text())
            .map_err(at_phase(Phase::MethodPatch))?;
        self.state = PipelineState::MethodPatched;

        // Commit
        if !self.spec.dry_run {
            document
                .commit(&rewritten)
                .map_err(at_phase(Phase::Commit))?;
        }
        self.state = PipelineState::Done;

        let region_stats = extraction
            .regions
            .iter()
            .map(|r| RegionStat {
                kind: r.kind,
                bytes: r.byte_len(),
            })
            .collect();

        Ok(SplitReport {
            source: self.spec.source.clone(),
            dry_run: self.spec.dry_run,
            regions: region_stats,
            artifacts: artifact_stats,
            original_bytes: document.len(),
            rewritten_bytes: rewritten.len(),
            delta: rewritten.len() as i64 - document.len() as i64,
            warnings,
        })
    }
}

fn at_phase(phase: Phase) -> impl Fn(SplitError) -> PipelineError {
    move |source| PipelineError { phase, source }
}

/// Convenience wrapper used by the CLI.
pub fn run(spec: SplitSpec) -> Result<SplitReport, PipelineError> {
    SplitPipeline::new(spec).run()
}

/// What a document looks like to the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentShape {
    /// Header prologue and method both present: ready to split.
    Pristine,
    /// The method is present but the prologue is gone and the artifact
    /// exports are referenced: a previous run already split this file.
    AlreadySplit,
    /// Neither shape fits.
    Unrecognized,
}

impl fmt::Display for DocumentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentShape::Pristine => "pristine",
            DocumentShape::AlreadySplit => "already-split",
            DocumentShape::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

/// Classify the document without touching the filesystem beyond the read.
pub fn check(spec: &SplitSpec) -> Result<DocumentShape, PipelineError> {
    let document = SourceDocument::load(&spec.source).map_err(at_phase(Phase::Locate))?;
    let mut warnings = Vec::new();

    let method_found = anchor::locate(
        document.text(),
        &spec.method_open_anchor(),
        &spec.method_close_anchor(),
        &mut warnings,
    )
    .is_ok();
    let header_found = spec
        .header_anchor()
        .resolve(document.text(), &mut warnings)
        .is_ok();
    let exports_referenced = spec
        .artifacts
        .iter()
        .all(|a| document.text().contains(a.export_name.as_str()));

    Ok(if method_found && header_found {
        DocumentShape::Pristine
    } else if method_found && !header_found && exports_referenced {
        DocumentShape::AlreadySplit
    } else {
        DocumentShape::Unrecognized
    })
}
