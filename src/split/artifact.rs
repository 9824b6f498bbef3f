//! Artifact module rendering and writing
//!
//! Each extracted region becomes one TypeScript module exporting a single
//! string constant. Writes are unconditional: an existing artifact is
//! replaced. Each write goes through a temporary file in the destination
//! directory and an atomic rename, so a crash never leaves a torn file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::split::config::ArtifactSpec;
use crate::split::error::SplitError;
use crate::split::region::Region;

/// A fully-rendered artifact ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub export_name: String,
    /// Banner comment lines, without the leading `//`.
    pub banner: Vec<String>,
    /// The region content, emitted verbatim inside the template literal.
    pub content: String,
}

/// Result of one artifact write.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactWriteResult {
    pub path: PathBuf,
    pub bytes: usize,
}

impl Artifact {
    /// Pair a region with its artifact parameters.
    pub fn from_region(region: &Region, spec: &ArtifactSpec, out_dir: &Path, source: &Path) -> Self {
        let source_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        Self {
            path: out_dir.join(&spec.file_name),
            export_name: spec.export_name.clone(),
            banner: vec![spec.banner.clone(), format!("Extracted from {}", source_name)],
            content: region.content.clone(),
        }
    }

    /// Render the module text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.banner {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str("export const ");
        out.push_str(&self.export_name);
        out.push_str(" = `\n");
        out.push_str(&self.content);
        out.push_str("\n`;\n");
        out
    }
}

/// Write the artifact under its destination directory, creating the
/// directory if absent and replacing any existing file.
pub fn write(artifact: &Artifact) -> Result<ArtifactWriteResult, SplitError> {
    let dir = artifact
        .path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| SplitError::io(dir, e))?;

    let rendered = artifact.render();
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SplitError::io(&artifact.path, e))?;
    tmp.write_all(rendered.as_bytes())
        .map_err(|e| SplitError::io(&artifact.path, e))?;
    tmp.persist(&artifact.path)
        .map_err(|e| SplitError::io(&artifact.path, e.error))?;

    Ok(ArtifactWriteResult {
        path: artifact.path.clone(),
        bytes: rendered.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::region::RegionKind;
    use tempfile::tempdir;

    fn style_artifact(dir: &Path) -> Artifact {
        let region = Region {
            kind: RegionKind::Style,
            span: 0..12,
            content: "A{color:red}".into(),
        };
        let spec = ArtifactSpec {
            kind: RegionKind::Style,
            file_name: "styles.ts".into(),
            export_name: "panelStyles".into(),
            banner: "Panel stylesheet".into(),
        };
        Artifact::from_region(&region, &spec, dir, Path::new("src/CanvasPanel.ts"))
    }

    #[test]
    fn render_emits_banner_and_single_export() {
        let artifact = style_artifact(Path::new("webview"));
        let rendered = artifact.render();

        assert!(rendered.starts_with("// Panel stylesheet\n// Extracted from CanvasPanel.ts\n"));
        assert!(rendered.contains("export const panelStyles = `\nA{color:red}\n`;\n"));
        assert_eq!(rendered.matches("export const").count(), 1);
    }

    #[test]
    fn write_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("webview");
        let artifact = style_artifact(&out_dir);

        let result = write(&artifact).unwrap();
        assert_eq!(result.path, out_dir.join("styles.ts"));

        let contents = fs::read_to_string(&result.path).unwrap();
        assert_eq!(contents.len(), result.bytes);
        assert!(contents.contains("A{color:red}"));
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let artifact = style_artifact(dir.path());
        fs::write(&artifact.path, "manual edits").unwrap();

        write(&artifact).unwrap();

        let contents = fs::read_to_string(&artifact.path).unwrap();
        assert!(!contents.contains("manual edits"));
        assert!(contents.contains("panelStyles"));
    }
}
