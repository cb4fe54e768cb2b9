//! Per-file stage machine with explicit transition guards.
//!
//! Each file moves through the fixed stage order as its artifacts are
//! generated. `advance()` validates every move against the transition
//! table and records it, so a batch run can report exactly where a file
//! stopped.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The stages a file passes through during a batch run.
///
/// Every file starts at `Requirements` and terminates at either `Done`
/// or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStage {
    /// Generating the requirements document.
    Requirements,
    /// Generating the Gherkin feature file.
    Feature,
    /// Generating the updated source file.
    CodeUpdate,
    /// All artifacts written — terminal stage.
    Done,
    /// A stage failed — terminal stage.
    Failed,
}

impl FileStage {
    /// Whether this is a terminal stage (no further transitions allowed).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requirements => write!(f, "Requirements"),
            Self::Feature => write!(f, "Feature"),
            Self::CodeUpdate => write!(f, "CodeUpdate"),
            Self::Done => write!(f, "Done"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Legal transitions between stages.
///
/// ```text
/// Requirements → Feature
/// Feature → CodeUpdate
/// CodeUpdate → Done
/// ```
fn is_legal_transition(from: FileStage, to: FileStage) -> bool {
    use FileStage::*;

    // Any non-terminal stage can transition to Failed.
    if to == Failed && !from.is_terminal() {
        return true;
    }

    matches!(
        (from, to),
        (Requirements, Feature) | (Feature, CodeUpdate) | (CodeUpdate, Done)
    )
}

/// A single recorded stage transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: FileStage,
    pub to: FileStage,
    /// When the transition happened.
    pub at: DateTime<Utc>,
    /// Optional context about why this transition happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Error returned when an illegal transition is attempted.
#[derive(Debug, Clone)]
pub struct IllegalTransition {
    pub from: FileStage,
    pub to: FileStage,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Illegal stage transition: {} → {}", self.from, self.to)
    }
}

impl std::error::Error for IllegalTransition {}

/// Tracks one file's current stage, enforces legal transitions, and keeps
/// the full transition log for reporting.
pub struct StageMachine {
    current: FileStage,
    transitions: Vec<StageTransition>,
}

impl StageMachine {
    /// Create a new machine starting at `Requirements`.
    pub fn new() -> Self {
        Self {
            current: FileStage::Requirements,
            transitions: Vec::new(),
        }
    }

    pub fn current(&self) -> FileStage {
        self.current
    }

    /// Attempt to advance to the next stage.
    pub fn advance(&mut self, to: FileStage, note: Option<&str>) -> Result<(), IllegalTransition> {
        if !is_legal_transition(self.current, to) {
            return Err(IllegalTransition {
                from: self.current,
                to,
            });
        }

        tracing::debug!(from = %self.current, to = %to, "Stage transition");

        self.transitions.push(StageTransition {
            from: self.current,
            to,
            at: Utc::now(),
            note: note.map(String::from),
        });
        self.current = to;
        Ok(())
    }

    /// Transition to `Failed` — always legal from non-terminal stages.
    pub fn fail(&mut self, note: &str) -> Result<(), IllegalTransition> {
        self.advance(FileStage::Failed, Some(note))
    }

    /// Whether the machine is in a terminal stage.
    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    /// Full transition log.
    pub fn transitions(&self) -> &[StageTransition] {
        &self.transitions
    }
}

impl Default for StageMachine {
    fn default() -> Self {
        Self::new()
    }
}
