//! Run configuration, read from environment variables (optionally seeded
//! from a `.env` file).
//!
//! Parsing goes through an injectable lookup so the rules can be exercised
//! without touching the process environment.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{MeasureError, Result};
use crate::team::parse_roster;

pub const DEFAULT_CHUNK_SIZE: usize = 100;
pub const MIN_CHUNK_SIZE: usize = 10;
pub const DEFAULT_REPORT_TITLE: &str = "InnerSource Report";
pub const DEFAULT_OUTPUT_FILE: &str = "innersource_report.md";
pub const DEFAULT_ORG_DATA: &str = "org-data.json";
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub App credentials for installation-token authentication.
#[derive(Clone)]
pub struct AppCredentials {
    pub app_id: u64,
    pub installation_id: u64,
    pub private_key: String,
}

/// How the client authenticates to GitHub.
#[derive(Clone)]
pub enum Auth {
    Token(String),
    App(AppCredentials),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Token(_) => f.write_str("Token(..)"),
            Auth::App(app) => f
                .debug_struct("App")
                .field("app_id", &app.app_id)
                .field("installation_id", &app.installation_id)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub auth: Auth,
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub report_title: String,
    pub output_file: PathBuf,
    pub org_data: PathBuf,
    pub owning_team: Option<Vec<String>>,
    pub chunk_size: usize,
}

impl Config {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let int = |key: &str| get(key).and_then(|v| v.trim().parse::<u64>().ok());

        // App credentials win over a token when the set is complete.
        let auth = match (
            int("GH_APP_ID"),
            int("GH_APP_INSTALLATION_ID"),
            get("GH_APP_PRIVATE_KEY"),
        ) {
            (Some(app_id), Some(installation_id), Some(private_key)) => Auth::App(AppCredentials {
                app_id,
                installation_id,
                private_key,
            }),
            (Some(_), _, _) => {
                return Err(MeasureError::Config(
                    "GH_APP_ID set and GH_APP_INSTALLATION_ID or GH_APP_PRIVATE_KEY variable not set"
                        .into(),
                ));
            }
            _ => Auth::Token(get("GH_TOKEN").ok_or_else(|| {
                MeasureError::Config("GH_TOKEN environment variable not set".into())
            })?),
        };

        let repository = get("REPOSITORY").ok_or_else(|| {
            MeasureError::Config("REPOSITORY environment variable not set".into())
        })?;
        let (owner, repo) = split_repository(&repository)?;

        // An App registered on github.com talks to github.com even when an
        // enterprise URL is configured, unless it is marked enterprise-only.
        let enterprise_only = get("GITHUB_APP_ENTERPRISE_ONLY").is_some_and(|v| is_true(&v));
        let api_url = match auth {
            Auth::App(_) if !enterprise_only => GITHUB_API_URL.to_string(),
            _ => api_url(get("GH_ENTERPRISE_URL").as_deref()),
        };

        Ok(Self {
            auth,
            api_url,
            owner,
            repo,
            report_title: get("REPORT_TITLE").unwrap_or_else(|| DEFAULT_REPORT_TITLE.into()),
            output_file: get("OUTPUT_FILE")
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.into())
                .into(),
            org_data: get("ORG_DATA")
                .unwrap_or_else(|| DEFAULT_ORG_DATA.into())
                .into(),
            owning_team: get("OWNING_TEAM").and_then(|raw| parse_roster(&raw)),
            chunk_size: parse_chunk_size(get("CHUNK_SIZE").as_deref()),
        })
    }

    /// `owner/repo`, as shown in reports.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Load a `.env` file from the working directory or one of its parents into
/// the process environment. Variables that are already set are kept.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome(loaded: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>> {
    match loaded {
        Ok(path) => {
            debug!("Loaded environment from {}", path.display());
            Ok(Some(path))
        }
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(MeasureError::Config(format!("invalid .env file: {err}"))),
    }
}

/// Only `true` (any case) is true.
fn is_true(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Split `owner/repo`. Everything after the first slash is the repo name.
pub fn split_repository(repository: &str) -> Result<(String, String)> {
    match repository.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(MeasureError::Config(format!(
            "REPOSITORY must be in the format 'owner/repo', got '{repository}'"
        ))),
    }
}

/// Chunk size, clamped to the minimum. Missing or non-numeric values use the
/// default.
pub fn parse_chunk_size(raw: Option<&str>) -> usize {
    match raw.map(|r| r.trim().parse::<i64>()) {
        Some(Ok(n)) => usize::try_from(n).unwrap_or(0).max(MIN_CHUNK_SIZE),
        _ => DEFAULT_CHUNK_SIZE,
    }
}

/// REST API root for github.com or a GitHub Enterprise Server host.
pub fn api_url(enterprise_url: Option<&str>) -> String {
    match enterprise_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => format!("{}/api/v3", url.trim_end_matches('/')),
        None => GITHUB_API_URL.to_string(),
    }
}
