//! Batch pipeline: requirements, feature file, and updated code per source
//! file.
//!
//! Files are processed independently; one file failing never stops the
//! batch. Artifacts written before a failure stay on disk, and the per-file
//! stage machine records where each file stopped.

mod state;

pub use state::{FileStage, IllegalTransition, StageMachine, StageTransition};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::client::TextGenerator;
use crate::error::AuthoringResult;
use crate::extract::SourceUnit;
use crate::jobs;
use crate::prompts::PromptStore;
use crate::status::StatusSink;
use crate::workspace::{ArtifactKind, OutputWorkspace};

/// What happened to one file in a batch run.
#[derive(Debug)]
pub struct FileOutcome {
    pub filename: String,
    /// Terminal stage the file reached (`Done` or `Failed`).
    pub stage: FileStage,
    /// Artifacts written before the run ended, complete or not.
    pub artifacts: Vec<PathBuf>,
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of a whole batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.processed()
    }

    /// Render the per-file report: one glyph line per file, plus the
    /// artifact paths for successes. Empty batches render as empty text.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for outcome in &self.outcomes {
            match &outcome.error {
                None => {
                    lines.push(format!("✅ {} processed successfully", outcome.filename));
                    for path in &outcome.artifacts {
                        lines.push(format!("   → {}", path.display()));
                    }
                }
                Some(message) => {
                    lines.push(format!(
                        "❌ Error processing {}: {}",
                        outcome.filename, message
                    ));
                }
            }
        }
        lines.join("\n")
    }
}

/// Drives the per-file stage sequence over a set of source files.
pub struct Pipeline<'a> {
    store: &'a PromptStore,
    generator: &'a dyn TextGenerator,
    workspace: &'a OutputWorkspace,
    sink: &'a dyn StatusSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        store: &'a PromptStore,
        generator: &'a dyn TextGenerator,
        workspace: &'a OutputWorkspace,
        sink: &'a dyn StatusSink,
    ) -> Self {
        Self {
            store,
            generator,
            workspace,
            sink,
        }
    }

    /// Process every file in order. An empty input yields an empty summary.
    pub async fn process_all(&self, paths: &[PathBuf]) -> BatchSummary {
        info!(files = paths.len(), "Batch run started");

        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            outcomes.push(self.process_file(path).await);
        }

        let summary = BatchSummary { outcomes };
        info!(
            processed = summary.processed(),
            failed = summary.failed(),
            "Batch run finished"
        );
        summary
    }

    /// Process a single file through all stages. Failures are captured in
    /// the outcome, never propagated.
    pub async fn process_file(&self, path: &Path) -> FileOutcome {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(String::from)
            .unwrap_or_else(|| path.display().to_string());

        let mut machine = StageMachine::new();
        let mut artifacts = Vec::new();

        match self
            .run_stages(&filename, path, &mut machine, &mut artifacts)
            .await
        {
            Ok(()) => {
                self.sink.record(&filename, "Completed");
                FileOutcome {
                    filename,
                    stage: machine.current(),
                    artifacts,
                    error: None,
                    finished_at: Utc::now(),
                }
            }
            Err(e) => {
                let message = e.to_string();
                if !machine.is_terminal() {
                    let _ = machine.fail(&message);
                }
                self.sink.record(&filename, &format!("Error: {message}"));
                FileOutcome {
                    filename,
                    stage: machine.current(),
                    artifacts,
                    error: Some(message),
                    finished_at: Utc::now(),
                }
            }
        }
    }

    async fn run_stages(
        &self,
        filename: &str,
        path: &Path,
        machine: &mut StageMachine,
        artifacts: &mut Vec<PathBuf>,
    ) -> AuthoringResult<()> {
        let text = std::fs::read_to_string(path)?;
        let unit = SourceUnit::new(filename, text);

        self.sink.record(filename, "Generating requirements");
        let requirements_text = jobs::requirements(self.store, self.generator, &unit).await?;
        artifacts.push(self.workspace.write_artifact(
            ArtifactKind::Requirements,
            filename,
            &requirements_text,
        )?);
        machine.advance(FileStage::Feature, None)?;

        self.sink.record(filename, "Generating feature file");
        let feature_text =
            jobs::feature(self.store, self.generator, &unit, &requirements_text).await?;
        artifacts.push(self.workspace.write_artifact(
            ArtifactKind::Feature,
            filename,
            &feature_text,
        )?);
        machine.advance(FileStage::CodeUpdate, None)?;

        self.sink.record(filename, "Updating code");
        let updated_code =
            jobs::code_update(self.store, self.generator, &unit, &requirements_text).await?;
        artifacts.push(self.workspace.write_artifact(
            ArtifactKind::UpdatedCode,
            filename,
            &updated_code,
        )?);
        machine.advance(FileStage::Done, None)?;

        Ok(())
    }
}
