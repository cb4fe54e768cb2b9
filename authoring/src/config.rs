use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the OpenAI API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Top-level authoring configuration.
#[derive(Debug, Clone)]
pub struct AuthoringConfig {
    /// API key for the completion endpoint (None = not configured).
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Chat model used for every generation job.
    pub model: String,
    /// Per-request timeout (None = reqwest default).
    pub timeout: Option<Duration>,
    /// Root directory for generated artifacts.
    pub output_dir: PathBuf,
    /// Location of the persisted prompt override mapping.
    pub prompt_store: PathBuf,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var(API_KEY_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: std::env::var("SPECFORGE_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model: std::env::var("SPECFORGE_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".into()),
            timeout: Self::timeout_from_env(),
            output_dir: std::env::var("SPECFORGE_OUTPUT_DIR")
                .unwrap_or_else(|_| "generated_outputs".into())
                .into(),
            prompt_store: std::env::var("SPECFORGE_PROMPT_STORE")
                .unwrap_or_else(|_| "outputs/prompt_store.json".into())
                .into(),
        }
    }
}

impl AuthoringConfig {
    fn timeout_from_env() -> Option<Duration> {
        let secs: u64 = std::env::var("SPECFORGE_TIMEOUT_SECS").ok()?.parse().ok()?;
        Some(Duration::from_secs(secs))
    }
}
