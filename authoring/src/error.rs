//! Error types for authoring operations.

use thiserror::Error;

/// Result type alias for authoring operations
pub type AuthoringResult<T> = Result<T, AuthoringError>;

/// Errors that can occur while generating documents.
///
/// Parse degradation and unknown template names are deliberately NOT here:
/// both produce placeholder values and let the job continue.
#[derive(Error, Debug)]
pub enum AuthoringError {
    /// API key environment variable unset or empty. Fatal at generator
    /// construction; never retried.
    #[error("API key not configured: set {var}")]
    MissingApiKey { var: String },

    /// A template failed to render, usually an undefined placeholder.
    #[error("Template '{name}' failed to render: {message}")]
    Template { name: String, message: String },

    /// The completion request failed (transport error or non-success status).
    #[error("Generation request failed: {message}")]
    Generation { message: String },

    /// The API answered but carried no usable completion text.
    #[error("Model response contained no completion")]
    EmptyCompletion,

    /// Prompt store persistence failed; the in-memory mapping is unchanged.
    #[error("Prompt store error: {message}")]
    PromptStore { message: String },

    /// A stage transition the per-file machine refuses.
    #[error(transparent)]
    Stage(#[from] crate::pipeline::IllegalTransition),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthoringError {
    /// Create a missing API key error
    pub fn missing_api_key(var: impl Into<String>) -> Self {
        Self::MissingApiKey { var: var.into() }
    }

    /// Create a template error
    pub fn template(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create a prompt store error
    pub fn prompt_store(message: impl Into<String>) -> Self {
        Self::PromptStore {
            message: message.into(),
        }
    }
}
