//! Output layout and source discovery.
//!
//! Every run writes into a single workspace root with fixed subdirectories:
//! `requirements/` for requirement documents, `gherkin/` for feature files,
//! `updated_code/` for revised sources, and user stories at the root.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::AuthoringResult;

/// The artifact families a run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Requirements,
    Feature,
    UpdatedCode,
    Story,
}

/// A created output directory tree.
pub struct OutputWorkspace {
    root: PathBuf,
}

impl OutputWorkspace {
    /// Create the workspace root and its subdirectories. Existing
    /// directories are left as they are.
    pub fn create(root: impl AsRef<Path>) -> AuthoringResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join("requirements"))?;
        std::fs::create_dir_all(root.join("gherkin"))?;
        std::fs::create_dir_all(root.join("updated_code"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where an artifact for `filename` lives. The stem drops a `.py`
    /// suffix; updated code keeps the full filename so it stays importable.
    pub fn artifact_path(&self, kind: ArtifactKind, filename: &str) -> PathBuf {
        let base = filename.strip_suffix(".py").unwrap_or(filename);
        match kind {
            ArtifactKind::Requirements => self
                .root
                .join("requirements")
                .join(format!("{base}_requirements.md")),
            ArtifactKind::Feature => self.root.join("gherkin").join(format!("{base}.feature")),
            ArtifactKind::UpdatedCode => self.root.join("updated_code").join(filename),
            ArtifactKind::Story => self.root.join(format!("{base}_story.md")),
        }
    }

    /// Write one artifact and return its path.
    pub fn write_artifact(
        &self,
        kind: ArtifactKind,
        filename: &str,
        content: &str,
    ) -> AuthoringResult<PathBuf> {
        let path = self.artifact_path(kind, filename);
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

/// Return all .py files under `root`, respecting .gitignore, sorted.
pub fn python_files(root: impl AsRef<Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkBuilder::new(root.as_ref())
        .hidden(true) // skip hidden dirs
        .git_ignore(true)
        .build();

    for entry in walker.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("py") {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files
}
