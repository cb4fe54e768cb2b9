//! Prompt templates — well-known names, typed contexts, and the persisted
//! override store.
//!
//! Each document kind has a fixed template name, a built-in default text
//! ([`defaults`]), and a context struct enumerating exactly the fields its
//! template may reference. Rendering is strict: a template referencing a
//! placeholder outside its context fails at call time instead of emitting
//! an empty string.

pub mod defaults;
mod store;

pub use store::PromptStore;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AuthoringError, AuthoringResult};

/// Fixed stand-in text the feature prompt is filled with instead of real
/// extraction output.
pub const FEATURE_MODULE_DOC: &str = "Extracted module documentation.";

/// Fixed stand-in for the feature prompt's function summary.
pub const FEATURE_FUNCTIONS_SUMMARY: &str = "List of functions and logical flows.";

/// The well-known template kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptKind {
    Requirements,
    Feature,
    Story,
    CodeUpdate,
    Test,
}

impl PromptKind {
    pub const ALL: [PromptKind; 5] = [
        Self::Requirements,
        Self::Feature,
        Self::Story,
        Self::CodeUpdate,
        Self::Test,
    ];

    /// Store key for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Requirements => "requirements",
            Self::Feature => "feature",
            Self::Story => "story",
            Self::CodeUpdate => "code-update",
            Self::Test => "test",
        }
    }

    /// Built-in template text for this kind.
    pub fn default_template(self) -> &'static str {
        match self {
            Self::Requirements => defaults::REQUIREMENTS_TEMPLATE,
            Self::Feature => defaults::FEATURE_TEMPLATE,
            Self::Story => defaults::STORY_TEMPLATE,
            Self::CodeUpdate => defaults::CODE_UPDATE_TEMPLATE,
            Self::Test => defaults::TEST_TEMPLATE,
        }
    }

    /// Reverse lookup from a store key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Context for the requirements template. `constants` is always empty in
/// the current extraction but stays a template field.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementsContext {
    pub filename: String,
    pub module_doc: String,
    pub functions_summary: String,
    pub constants: Vec<String>,
}

/// Context for the story template.
#[derive(Debug, Clone, Serialize)]
pub struct StoryContext {
    pub filename: String,
    pub module_doc: String,
    pub functions_summary: String,
}

/// Context for the feature template. The module fields carry fixed
/// stand-in text rather than extraction output.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureContext {
    pub filename: String,
    pub module_doc: String,
    pub functions_summary: String,
}

impl FeatureContext {
    pub fn for_file(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            module_doc: FEATURE_MODULE_DOC.to_string(),
            functions_summary: FEATURE_FUNCTIONS_SUMMARY.to_string(),
        }
    }
}

/// Context for the code-update template.
#[derive(Debug, Clone, Serialize)]
pub struct CodeUpdateContext {
    pub filename: String,
    pub requirements: String,
    pub source: String,
}

/// Context for the test template.
#[derive(Debug, Clone, Serialize)]
pub struct TestContext {
    pub filename: String,
    pub functions_summary: String,
}

/// Render a template with strict undefined handling: any placeholder not
/// supplied by `ctx` fails the render.
pub(crate) fn render_template<C: Serialize>(
    name: &str,
    template: &str,
    ctx: &C,
) -> AuthoringResult<String> {
    let mut env = minijinja::Environment::new();
    env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
    env.render_named_str(name, template, ctx)
        .map_err(|e| AuthoringError::template(name, e.to_string()))
}
