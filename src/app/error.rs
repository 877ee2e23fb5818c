use thiserror::Error;

use crate::config::ConfigError;

/// Longest response-body excerpt carried in an error message.
pub const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum DiarioError {
    #[error("Error {} fetching section \"{section}\". Body: {body_excerpt}", status_label(.status))]
    Fetch {
        section: String,
        status: Option<u16>,
        body_excerpt: String,
    },

    #[error("Feed parsing error in section \"{section}\": {cause}")]
    Parse { section: String, cause: String },

    #[error("Store error {}. Body: {body_excerpt}", status_label(.status))]
    Store {
        status: Option<u16>,
        body_excerpt: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiarioError {
    /// HTTP status of the failed request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            DiarioError::Fetch { status, .. } | DiarioError::Store { status, .. } => *status,
            _ => None,
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "(no response)".to_string(),
    }
}

/// First [`BODY_EXCERPT_CHARS`] characters of a response body.
pub fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

pub type Result<T> = std::result::Result<T, DiarioError>;
