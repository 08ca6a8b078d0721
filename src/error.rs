use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while measuring collaboration on a repository.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("duplicate identity in org data: '{0}' collides with another entry ignoring case")]
    DuplicateIdentity(String),

    #[error(
        "original commit author '{0}' not found in org chart; cannot determine team boundaries"
    )]
    AuthorNotInOrgChart(String),

    #[error("oldest commit has no linked GitHub account; cannot determine team boundaries")]
    UnattributedOldestCommit,

    #[error("repository has no commits; cannot infer the owning team")]
    EmptyCommitHistory,

    #[error("no org data found at {}; InnerSource collaboration cannot be measured", .0.display())]
    OrgDataMissing(PathBuf),

    #[error("invalid org data in {}: {reason}", .path.display())]
    OrgData { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("GitHub API error ({status}) for {url}")]
    Api { status: u16, url: String },

    #[error("GitHub App JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MeasureError>;
