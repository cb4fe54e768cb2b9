//! Generation jobs, one per artifact kind.
//!
//! A job renders the effective template for its kind with a typed context
//! built from the source unit, then hands the prompt to a [`TextGenerator`].
//! Jobs do not touch the filesystem; persistence belongs to the pipeline
//! and the CLI.

use crate::client::TextGenerator;
use crate::error::AuthoringResult;
use crate::extract::SourceUnit;
use crate::prompts::{
    CodeUpdateContext, FeatureContext, PromptKind, PromptStore, RequirementsContext, StoryContext,
    TestContext,
};

/// Produce a functional requirements document for one module.
pub async fn requirements(
    store: &PromptStore,
    generator: &dyn TextGenerator,
    unit: &SourceUnit,
) -> AuthoringResult<String> {
    let ctx = RequirementsContext {
        filename: unit.filename.clone(),
        module_doc: unit.summary.module_doc.clone(),
        functions_summary: unit.summary.functions_block(),
        constants: Vec::new(),
    };
    let prompt = store.render(PromptKind::Requirements, &ctx)?;
    generator.generate(&prompt).await
}

/// Produce a JIRA-style user story for one module.
pub async fn story(
    store: &PromptStore,
    generator: &dyn TextGenerator,
    unit: &SourceUnit,
) -> AuthoringResult<String> {
    let ctx = StoryContext {
        filename: unit.filename.clone(),
        module_doc: unit.summary.module_doc.clone(),
        functions_summary: unit.summary.functions_block(),
    };
    let prompt = store.render(PromptKind::Story, &ctx)?;
    generator.generate(&prompt).await
}

/// Produce a Gherkin feature file with step definitions.
///
/// The requirements text is accepted but not substituted into the prompt:
/// the feature template renders fixed stand-in descriptions of the module
/// rather than extraction output.
pub async fn feature(
    store: &PromptStore,
    generator: &dyn TextGenerator,
    unit: &SourceUnit,
    _requirements_text: &str,
) -> AuthoringResult<String> {
    let ctx = FeatureContext::for_file(&unit.filename);
    let prompt = store.render(PromptKind::Feature, &ctx)?;
    generator.generate(&prompt).await
}

/// Produce an updated version of the module satisfying a requirements
/// document.
pub async fn code_update(
    store: &PromptStore,
    generator: &dyn TextGenerator,
    unit: &SourceUnit,
    requirements_text: &str,
) -> AuthoringResult<String> {
    let ctx = CodeUpdateContext {
        filename: unit.filename.clone(),
        requirements: requirements_text.to_string(),
        source: unit.text.clone(),
    };
    let prompt = store.render(PromptKind::CodeUpdate, &ctx)?;
    generator.generate(&prompt).await
}

/// Produce pytest unit tests for the module's functions.
pub async fn test_cases(
    store: &PromptStore,
    generator: &dyn TextGenerator,
    unit: &SourceUnit,
) -> AuthoringResult<String> {
    let ctx = TestContext {
        filename: unit.filename.clone(),
        functions_summary: unit.summary.functions_block(),
    };
    let prompt = store.render(PromptKind::Test, &ctx)?;
    generator.generate(&prompt).await
}
