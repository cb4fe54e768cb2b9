//! Authoring Library
//!
//! This library turns Python source files into engineering artifacts via
//! prompt-driven generation:
//! - Syntax-tree extraction of module docstrings, functions, and signatures
//! - A persisted prompt template store with strict placeholder rendering
//! - Generation jobs for requirements documents, user stories, Gherkin
//!   features, updated code, and pytest suites
//! - A batch pipeline that writes one artifact set per file, with per-file
//!   stage tracking and isolated failures
//!
//! # Usage
//!
//! ```bash
//! # Generate every artifact for a directory of Python sources
//! specforge run --input-dir ./src
//!
//! # Single documents
//! specforge requirements app.py
//! specforge story app.py
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod jobs;
pub mod pipeline;
pub mod prompts;
pub mod status;
pub mod workspace;

// Re-export key error types
pub use error::{AuthoringError, AuthoringResult};

// Re-export extraction types
pub use extract::{FunctionInfo, ModuleSummary, SourceUnit};

// Re-export prompt types
pub use prompts::{PromptKind, PromptStore};

// Re-export generation client types
pub use client::{OpenAiGenerator, TextGenerator};

// Re-export pipeline types
pub use pipeline::{BatchSummary, FileOutcome, FileStage, Pipeline, StageMachine};

// Re-export status types
pub use status::{MemorySink, StatusEntry, StatusSink, TracingSink};

// Re-export workspace types
pub use workspace::{python_files, ArtifactKind, OutputWorkspace};

// Re-export configuration
pub use config::{AuthoringConfig, API_KEY_VAR};
