//! Configuration
//!
//! Environment-driven settings for the store location and the document
//! being viewed. A missing write token is not an error: the engine runs
//! in read-only mode and creation is disabled up front.

use thiserror::Error;

use crate::annotations::CATEGORY_LABEL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store repository owner.
    pub owner: String,
    /// Store repository name.
    pub repo: String,
    /// Store API base URL.
    pub api_base: String,
    /// Write credential. `None` means read-only mode.
    pub token: Option<String>,
    /// Category label entries are filed under.
    pub label: String,
    /// Display title for the document.
    pub title: String,
    /// Where the rendered document is served from.
    pub document_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: "YOUR_GITHUB_USERNAME".to_string(),
            repo: "papershare".to_string(),
            api_base: "https://api.github.com".to_string(),
            token: None,
            label: CATEGORY_LABEL.to_string(),
            title: "PaperShare".to_string(),
            document_url: "paper.pdf".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment (and a `.env` file when
    /// present). Only the store coordinates are required; everything
    /// else falls back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let config = Self {
            owner: std::env::var("PAPERSHARE_OWNER")
                .map_err(|_| ConfigError::MissingVar("PAPERSHARE_OWNER"))?,
            repo: std::env::var("PAPERSHARE_REPO")
                .map_err(|_| ConfigError::MissingVar("PAPERSHARE_REPO"))?,
            api_base: std::env::var("PAPERSHARE_API_BASE").unwrap_or(defaults.api_base),
            token: std::env::var("PAPERSHARE_TOKEN").ok().filter(|t| !t.is_empty()),
            label: std::env::var("PAPERSHARE_LABEL").unwrap_or(defaults.label),
            title: std::env::var("PAPERSHARE_TITLE").unwrap_or(defaults.title),
            document_url: std::env::var("PAPERSHARE_DOCUMENT_URL").unwrap_or(defaults.document_url),
        };

        if config.token.is_none() {
            tracing::info!("no write token configured; store is read-only");
        }
        Ok(config)
    }

    /// Whether creation is disabled for lack of a write credential.
    pub fn read_only(&self) -> bool {
        self.token.is_none()
    }
}
