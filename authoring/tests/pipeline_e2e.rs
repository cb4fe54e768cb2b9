//! End-to-end batch pipeline tests with deterministic scripted generators
//! (no LLM calls).
//!
//! Covers: extraction ↔ prompt store ↔ jobs ↔ stage machine ↔ workspace
//! running together over real temp directories:
//! - Full happy-path batch over multiple files
//! - Per-file failure isolation
//! - Partial artifacts surviving a mid-file failure
//! - Status announcements in stage order

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use authoring::{
    AuthoringError, AuthoringResult, FileStage, MemorySink, OutputWorkspace, Pipeline,
    PromptStore, StatusSink, TextGenerator,
};
use tempfile::tempdir;

/// Generator that echoes prompts back, failing when a prompt contains the
/// configured marker.
struct ScriptedGenerator {
    fail_marker: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn ok() -> Self {
        Self {
            fail_marker: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> AuthoringResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(marker) = &self.fail_marker {
            if prompt.contains(marker) {
                return Err(AuthoringError::generation(format!(
                    "scripted failure on '{marker}'"
                )));
            }
        }
        Ok(format!("GENERATED\n{prompt}"))
    }
}

/// Sink that records every (file, message) pair in order.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    fn messages_for(&self, filename: &str) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(file, _)| file == filename)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn record(&self, filename: &str, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push((filename.to_string(), message.to_string()));
    }
}

const CALC_PY: &str = "\"\"\"Calculator helpers.\"\"\"\n\ndef add(a, b):\n    \"\"\"Add two numbers.\"\"\"\n    return a + b\n";

const INVENTORY_PY: &str = "\"\"\"Inventory checks.\"\"\"\n\ndef validate(order):\n    \"\"\"Checks an order against stock.\"\"\"\n    return True\n";

fn setup() -> (tempfile::TempDir, PromptStore, OutputWorkspace) {
    let dir = tempdir().unwrap();
    let store = PromptStore::load(dir.path().join("prompt_store.json"));
    let workspace = OutputWorkspace::create(dir.path().join("out")).unwrap();
    (dir, store, workspace)
}

fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_batch_happy_path() {
    let (dir, store, workspace) = setup();
    let generator = ScriptedGenerator::ok();
    let sink = MemorySink::new();
    let pipeline = Pipeline::new(&store, &generator, &workspace, &sink);

    let paths = vec![
        write_source(dir.path(), "calc.py", CALC_PY),
        write_source(dir.path(), "inventory.py", INVENTORY_PY),
    ];
    let summary = pipeline.process_all(&paths).await;

    assert_eq!(summary.processed(), 2);
    assert_eq!(summary.failed(), 0);
    // Three prompts per file, in file order.
    assert_eq!(generator.prompt_count(), 6);

    for outcome in &summary.outcomes {
        assert_eq!(outcome.stage, FileStage::Done);
        assert_eq!(outcome.artifacts.len(), 3);
        for artifact in &outcome.artifacts {
            let content = std::fs::read_to_string(artifact).unwrap();
            assert!(content.starts_with("GENERATED\n"));
        }
    }
    // Files are processed strictly in order.
    assert!(summary.outcomes[0].finished_at <= summary.outcomes[1].finished_at);

    let out = workspace.root();
    assert!(out.join("requirements/calc_requirements.md").is_file());
    assert!(out.join("gherkin/calc.feature").is_file());
    assert!(out.join("updated_code/calc.py").is_file());
    assert!(out.join("requirements/inventory_requirements.md").is_file());

    let report = summary.render();
    assert!(report.contains("✅ calc.py processed successfully"));
    assert!(report.contains("✅ inventory.py processed successfully"));
    assert!(report.contains("→ "));

    assert_eq!(sink.latest("calc.py").unwrap().message, "Completed");
    assert_eq!(sink.latest("inventory.py").unwrap().message, "Completed");
}

#[tokio::test]
async fn test_status_messages_follow_stage_order() {
    let (dir, store, workspace) = setup();
    let generator = ScriptedGenerator::ok();
    let sink = RecordingSink::default();
    let pipeline = Pipeline::new(&store, &generator, &workspace, &sink);

    let path = write_source(dir.path(), "calc.py", CALC_PY);
    pipeline.process_file(&path).await;

    assert_eq!(
        sink.messages_for("calc.py"),
        vec![
            "Generating requirements",
            "Generating feature file",
            "Updating code",
            "Completed",
        ]
    );
}

// ── Failure isolation ───────────────────────────────────────────────

#[tokio::test]
async fn test_one_file_failing_never_stops_the_batch() {
    let (dir, store, workspace) = setup();
    // The requirements prompt names its module, so this marker only fires
    // for inventory.py.
    let generator = ScriptedGenerator::failing_on("inventory.py");
    let sink = MemorySink::new();
    let pipeline = Pipeline::new(&store, &generator, &workspace, &sink);

    let paths = vec![
        write_source(dir.path(), "calc.py", CALC_PY),
        write_source(dir.path(), "inventory.py", INVENTORY_PY),
    ];
    let summary = pipeline.process_all(&paths).await;

    assert_eq!(summary.processed(), 1);
    assert_eq!(summary.failed(), 1);

    let calc = &summary.outcomes[0];
    assert_eq!(calc.stage, FileStage::Done);
    assert_eq!(calc.artifacts.len(), 3);

    let inventory = &summary.outcomes[1];
    assert_eq!(inventory.stage, FileStage::Failed);
    assert!(inventory.artifacts.is_empty());
    assert!(inventory.error.as_deref().unwrap().contains("scripted failure"));

    let report = summary.render();
    assert!(report.contains("✅ calc.py processed successfully"));
    assert!(report.contains("❌ Error processing inventory.py:"));

    assert!(!workspace
        .root()
        .join("requirements/inventory_requirements.md")
        .exists());
    assert!(sink
        .latest("inventory.py")
        .unwrap()
        .message
        .starts_with("Error:"));
}

#[tokio::test]
async fn test_partial_artifacts_survive_mid_file_failure() {
    let (dir, store, workspace) = setup();
    // "Gherkin" appears in the feature prompt but not the requirements
    // prompt, so the file fails at the feature stage.
    let generator = ScriptedGenerator::failing_on("Gherkin");
    let sink = MemorySink::new();
    let pipeline = Pipeline::new(&store, &generator, &workspace, &sink);

    let path = write_source(dir.path(), "calc.py", CALC_PY);
    let outcome = pipeline.process_file(&path).await;

    assert_eq!(outcome.stage, FileStage::Failed);
    assert_eq!(outcome.artifacts.len(), 1);
    assert!(workspace
        .root()
        .join("requirements/calc_requirements.md")
        .is_file());
    assert!(!workspace.root().join("gherkin/calc.feature").exists());
    assert!(!workspace.root().join("updated_code/calc.py").exists());
}

#[tokio::test]
async fn test_missing_source_file_is_a_per_file_error() {
    let (dir, store, workspace) = setup();
    let generator = ScriptedGenerator::ok();
    let sink = MemorySink::new();
    let pipeline = Pipeline::new(&store, &generator, &workspace, &sink);

    let outcome = pipeline.process_file(&dir.path().join("missing.py")).await;

    assert_eq!(outcome.stage, FileStage::Failed);
    assert!(outcome.artifacts.is_empty());
    assert!(outcome.error.as_deref().unwrap().contains("IO error"));
    assert_eq!(generator.prompt_count(), 0);
}

// ── Edge cases ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_batch_yields_empty_summary() {
    let (_dir, store, workspace) = setup();
    let generator = ScriptedGenerator::ok();
    let sink = MemorySink::new();
    let pipeline = Pipeline::new(&store, &generator, &workspace, &sink);

    let summary = pipeline.process_all(&[]).await;

    assert!(summary.outcomes.is_empty());
    assert_eq!(summary.render(), "");
}

#[tokio::test]
async fn test_unparseable_source_still_produces_artifacts() {
    let (dir, store, workspace) = setup();
    let generator = ScriptedGenerator::ok();
    let sink = MemorySink::new();
    let pipeline = Pipeline::new(&store, &generator, &workspace, &sink);

    let path = write_source(dir.path(), "broken.py", "def broken(:\n");
    let outcome = pipeline.process_file(&path).await;

    assert_eq!(outcome.stage, FileStage::Done);
    let requirements = std::fs::read_to_string(&outcome.artifacts[0]).unwrap();
    assert!(requirements.contains("⚠️ Failed to parse code"));
    assert!(requirements.contains("No functions found."));
}

#[tokio::test]
async fn test_prompt_override_reaches_generated_artifacts() {
    let (dir, mut store, workspace) = setup();
    store
        .set_all(BTreeMap::from([(
            "requirements".to_string(),
            "CUSTOM SPEC for {{ filename }}".to_string(),
        )]))
        .unwrap();

    let generator = ScriptedGenerator::ok();
    let sink = MemorySink::new();
    let pipeline = Pipeline::new(&store, &generator, &workspace, &sink);

    let path = write_source(dir.path(), "calc.py", CALC_PY);
    let outcome = pipeline.process_file(&path).await;

    assert_eq!(outcome.stage, FileStage::Done);
    let requirements = std::fs::read_to_string(&outcome.artifacts[0]).unwrap();
    assert!(requirements.contains("CUSTOM SPEC for calc.py"));
}
