//! Persisted template overrides.
//!
//! The store loads a JSON mapping of template name → template text once at
//! construction. `get` falls back to the built-in default for well-known
//! names; `set_all` replaces the whole persisted mapping atomically (temp
//! file + rename) and the in-memory copy only after the rename lands.
//! External edits are picked up by an explicit [`PromptStore::reload`],
//! never by implicit re-reads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AuthoringError, AuthoringResult};
use crate::prompts::{render_template, PromptKind};

pub struct PromptStore {
    path: PathBuf,
    overrides: BTreeMap<String, String>,
}

impl PromptStore {
    /// Load the store from `path`. A missing file means no overrides; an
    /// unreadable or invalid file is logged and treated the same way.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let overrides = Self::read_overrides(&path);
        debug!(
            path = %path.display(),
            overrides = overrides.len(),
            "Prompt store loaded"
        );
        Self { path, overrides }
    }

    fn read_overrides(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Prompt store unreadable, using defaults");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(mapping) => mapping,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Prompt store is not valid JSON, using defaults");
                BTreeMap::new()
            }
        }
    }

    /// Re-read the persisted mapping, picking up external edits.
    pub fn reload(&mut self) {
        self.overrides = Self::read_overrides(&self.path);
    }

    /// Resolve a template: override if present, else built-in default, else
    /// a warning placeholder for names unknown to both.
    pub fn get(&self, name: &str) -> String {
        if let Some(text) = self.overrides.get(name) {
            return text.clone();
        }
        if let Some(kind) = PromptKind::from_name(name) {
            return kind.default_template().to_string();
        }
        format!("⚠️ Prompt '{name}' not found.")
    }

    /// Replace the entire persisted mapping. Either the full new mapping is
    /// durably stored or the previous one remains on disk and in memory;
    /// failures are surfaced, never absorbed.
    pub fn set_all(&mut self, mapping: BTreeMap<String, String>) -> AuthoringResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AuthoringError::prompt_store(format!(
                        "create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&mapping)
            .map_err(|e| AuthoringError::prompt_store(format!("serialize mapping: {e}")))?;
        std::fs::write(&temp_path, &content).map_err(|e| {
            AuthoringError::prompt_store(format!("write {}: {e}", temp_path.display()))
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            AuthoringError::prompt_store(format!(
                "rename {} → {}: {e}",
                temp_path.display(),
                self.path.display()
            ))
        })?;

        self.overrides = mapping;
        Ok(())
    }

    /// Render the effective template for `kind` with a typed context.
    pub fn render<C: Serialize>(&self, kind: PromptKind, ctx: &C) -> AuthoringResult<String> {
        let template = self.get(kind.name());
        render_template(kind.name(), &template, ctx)
    }

    /// Whether `name` currently has a persisted override.
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.contains_key(name)
    }

    /// Names present in the override mapping, in sorted order.
    pub fn override_names(&self) -> Vec<String> {
        self.overrides.keys().cloned().collect()
    }

    /// The effective mapping: every well-known name resolved through `get`,
    /// plus any extra override keys.
    pub fn effective(&self) -> BTreeMap<String, String> {
        let mut mapping = BTreeMap::new();
        for kind in PromptKind::ALL {
            mapping.insert(kind.name().to_string(), self.get(kind.name()));
        }
        for (name, text) in &self.overrides {
            mapping.entry(name.clone()).or_insert_with(|| text.clone());
        }
        mapping
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
