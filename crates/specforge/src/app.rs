//! Command handlers behind the CLI surface.
//!
//! Each handler returns the text its command prints; argument parsing and
//! stdout routing stay in [`crate::cli`]. Single-document commands persist
//! their artifact to the deterministic workspace path (or `--out`) and
//! report where it landed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use authoring::{
    jobs, ArtifactKind, AuthoringConfig, OpenAiGenerator, OutputWorkspace, Pipeline, PromptKind,
    PromptStore, SourceUnit, TracingSink,
};

/// Application context shared by every command.
pub struct App {
    config: AuthoringConfig,
    store: PromptStore,
}

impl App {
    pub fn new() -> Self {
        Self::with_config(AuthoringConfig::default())
    }

    /// Build an app over an explicit configuration.
    pub fn with_config(config: AuthoringConfig) -> Self {
        let store = PromptStore::load(&config.prompt_store);
        Self { config, store }
    }

    // Built on demand; prompt management commands never construct it, so
    // they work without an API key.
    fn generator(&self) -> Result<OpenAiGenerator> {
        Ok(OpenAiGenerator::from_config(&self.config)?)
    }

    pub async fn requirements(&self, file: &Path, out: Option<&Path>) -> Result<String> {
        let generator = self.generator()?;
        let unit = load_unit(file)?;
        let text = jobs::requirements(&self.store, &generator, &unit).await?;
        self.persist(ArtifactKind::Requirements, &unit.filename, &text, out)
    }

    pub async fn story(&self, file: &Path, out: Option<&Path>) -> Result<String> {
        let generator = self.generator()?;
        let unit = load_unit(file)?;
        let text = jobs::story(&self.store, &generator, &unit).await?;
        self.persist(ArtifactKind::Story, &unit.filename, &text, out)
    }

    pub async fn feature(
        &self,
        file: &Path,
        requirements: Option<&Path>,
        out: Option<&Path>,
    ) -> Result<String> {
        let generator = self.generator()?;
        let unit = load_unit(file)?;
        let requirements_text = match requirements {
            Some(path) => read_document(path)?,
            None => String::new(),
        };
        let text = jobs::feature(&self.store, &generator, &unit, &requirements_text).await?;
        self.persist(ArtifactKind::Feature, &unit.filename, &text, out)
    }

    pub async fn update(
        &self,
        file: &Path,
        requirements: Option<&Path>,
        out: Option<&Path>,
    ) -> Result<String> {
        let generator = self.generator()?;
        let unit = load_unit(file)?;
        let requirements_text = match requirements {
            Some(path) => read_document(path)?,
            None => jobs::requirements(&self.store, &generator, &unit).await?,
        };
        let text = jobs::code_update(&self.store, &generator, &unit, &requirements_text).await?;
        self.persist(ArtifactKind::UpdatedCode, &unit.filename, &text, out)
    }

    /// Generated tests have no fixed home in the output layout; the caller
    /// routes the returned text to stdout or `--out`.
    pub async fn tests(&self, file: &Path) -> Result<String> {
        let generator = self.generator()?;
        let unit = load_unit(file)?;
        Ok(jobs::test_cases(&self.store, &generator, &unit).await?)
    }

    fn persist(
        &self,
        kind: ArtifactKind,
        filename: &str,
        content: &str,
        out: Option<&Path>,
    ) -> Result<String> {
        let path = match out {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                path.to_path_buf()
            }
            None => {
                let workspace = OutputWorkspace::create(&self.config.output_dir)?;
                workspace.write_artifact(kind, filename, content)?
            }
        };
        Ok(format!("Saved to {}", path.display()))
    }

    /// Run the batch pipeline over explicit files plus any discovered under
    /// `input_dir`. Returns the per-file report.
    pub async fn run_batch(
        &self,
        mut files: Vec<PathBuf>,
        input_dir: Option<&Path>,
    ) -> Result<String> {
        if let Some(dir) = input_dir {
            files.extend(authoring::python_files(dir));
        }
        if files.is_empty() {
            return Ok("No files processed.".to_string());
        }

        let generator = self.generator()?;
        let workspace = OutputWorkspace::create(&self.config.output_dir)?;
        info!(output_dir = %workspace.root().display(), "Writing artifacts");

        let sink = TracingSink;
        let pipeline = Pipeline::new(&self.store, &generator, &workspace, &sink);
        let summary = pipeline.process_all(&files).await;
        Ok(summary.render())
    }

    /// One line per template name: where it resolves from.
    pub fn prompts_list(&self) -> String {
        let mut lines = Vec::new();
        for kind in PromptKind::ALL {
            let source = if self.store.is_overridden(kind.name()) {
                "override"
            } else {
                "default"
            };
            lines.push(format!("{:<12} {source}", kind.name()));
        }
        for name in self.store.override_names() {
            if PromptKind::from_name(&name).is_none() {
                lines.push(format!("{name:<12} override (no default)"));
            }
        }
        lines.join("\n")
    }

    pub fn prompts_show(&self, name: &str) -> String {
        self.store.get(name)
    }

    pub fn prompts_import(&mut self, file: &Path) -> Result<String> {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let mapping: BTreeMap<String, String> = serde_json::from_str(&content)
            .context("Prompt mapping must be a JSON object of name to template text")?;

        let count = mapping.len();
        self.store.set_all(mapping)?;
        Ok(format!(
            "Imported {count} templates into {}",
            self.config.prompt_store.display()
        ))
    }

    pub fn prompts_export(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.store.effective())?)
    }

    pub fn prompts_reset(&mut self) -> Result<String> {
        self.store.set_all(BTreeMap::new())?;
        Ok("Prompt overrides cleared.".to_string())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn load_unit(file: &Path) -> Result<SourceUnit> {
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .map(String::from)
        .unwrap_or_else(|| file.display().to_string());
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(SourceUnit::new(filename, text))
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
