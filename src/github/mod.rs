//! GitHub REST client: repository metadata, contributors, and paged
//! activity cursors for commits, pull requests and issues.

mod app;

use std::collections::VecDeque;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::{debug, info};

use crate::activity::{ActivityCursor, ActivitySource, Author, Chunk};
use crate::config::{AppCredentials, Auth};
use crate::error::{MeasureError, Result};

const PER_PAGE: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("innersource/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

#[derive(Deserialize)]
struct Account {
    login: String,
}

#[derive(Deserialize)]
struct RepoInfo {
    full_name: String,
}

#[derive(Deserialize)]
struct CommitItem {
    author: Option<Account>,
}

#[derive(Deserialize)]
struct IssueItem {
    user: Option<Account>,
    pull_request: Option<IgnoredAny>,
}

impl GitHubClient {
    /// Client for `api_url`, authenticated with a personal access token or
    /// as a GitHub App installation.
    pub fn connect(api_url: &str, auth: &Auth) -> Result<Self> {
        match auth {
            Auth::Token(token) => Self::new(api_url, token),
            Auth::App(credentials) => {
                let mut client = Self::new(api_url, "")?;
                client.token = client.installation_token(credentials)?;
                info!(
                    "Authenticated as GitHub App {} (installation {})",
                    credentials.app_id, credentials.installation_id
                );
                Ok(client)
            }
        }
    }

    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Look up `owner/repo` and return a source over its activity.
    pub fn repository(&self, owner: &str, repo: &str) -> Result<Repository<'_>> {
        let path = format!("/repos/{owner}/{repo}");
        let info: RepoInfo = self.get(&path, &[])?.json()?;
        Ok(Repository {
            client: self,
            path,
            full_name: info.full_name,
        })
    }

    /// Exchange a JWT signed with the App's private key for an installation
    /// access token.
    fn installation_token(&self, credentials: &AppCredentials) -> Result<String> {
        let jwt = app::sign_jwt(
            credentials.app_id,
            &credentials.private_key,
            app::unix_now()?,
        )?;
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_url, credentials.installation_id
        );
        debug!("POST {url}");
        let resp = self.send(self.http.post(&url).bearer_auth(jwt), url)?;
        let body: app::InstallationToken = resp.json()?;
        Ok(body.token)
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{path}", self.api_url);
        debug!("GET {url} {query:?}");
        let request = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query);
        self.send(request, url)
    }

    fn send(&self, request: RequestBuilder, url: String) -> Result<Response> {
        let resp = request
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MeasureError::Api {
                status: status.as_u16(),
                url,
            });
        }
        Ok(resp)
    }
}

/// Fetches one raw page of a list endpoint.
trait PageFetch {
    fn fetch(&self, path: &str, extra: &[(&str, String)], page: u32) -> Result<String>;
}

impl PageFetch for GitHubClient {
    /// `204 No Content` (an empty repository) reads as an empty page.
    fn fetch(&self, path: &str, extra: &[(&str, String)], page: u32) -> Result<String> {
        let mut query = vec![("per_page", PER_PAGE.to_string()), ("page", page.to_string())];
        query.extend(extra.iter().cloned());
        let resp = self.get(path, &query)?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok("[]".to_string());
        }
        Ok(resp.text()?)
    }
}

/// A repository on GitHub, read through the REST API.
pub struct Repository<'a> {
    client: &'a GitHubClient,
    path: String,
    full_name: String,
}

impl Repository<'_> {
    fn cursor(&self, kind: StreamKind) -> Box<dyn ActivityCursor + '_> {
        Box::new(PageCursor::new(
            self.client,
            format!("{}/{}", self.path, kind.endpoint()),
            kind,
        ))
    }
}

impl ActivitySource for Repository<'_> {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn contributors(&mut self) -> Result<Vec<String>> {
        let path = format!("{}/contributors", self.path);
        let mut logins = Vec::new();
        for page in 1.. {
            let body = self.client.fetch(&path, &[], page)?;
            let accounts: Vec<Account> = serde_json::from_str(&body)?;
            let received = accounts.len();
            logins.extend(accounts.into_iter().map(|a| a.login));
            if received < PER_PAGE {
                break;
            }
        }
        Ok(logins)
    }

    fn commits(&mut self) -> Box<dyn ActivityCursor + '_> {
        self.cursor(StreamKind::Commits)
    }

    fn pull_requests(&mut self) -> Box<dyn ActivityCursor + '_> {
        self.cursor(StreamKind::PullRequests)
    }

    fn issues(&mut self) -> Box<dyn ActivityCursor + '_> {
        self.cursor(StreamKind::Issues)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamKind {
    Commits,
    PullRequests,
    Issues,
}

impl StreamKind {
    fn endpoint(&self) -> &'static str {
        match self {
            StreamKind::Commits => "commits",
            StreamKind::PullRequests => "pulls",
            StreamKind::Issues => "issues",
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            StreamKind::Commits => Vec::new(),
            StreamKind::PullRequests | StreamKind::Issues => vec![("state", "all".to_string())],
        }
    }

    /// Parse one page. Returns the raw item count (for end-of-stream
    /// detection) and the authors of the items that belong to this stream;
    /// the issues endpoint also lists pull requests, which are dropped.
    fn parse(&self, body: &str) -> Result<(usize, Vec<Author>)> {
        match self {
            StreamKind::Commits => {
                let items: Vec<CommitItem> = serde_json::from_str(body)?;
                let authors = items
                    .into_iter()
                    .map(|c| Author::from(c.author.map(|a| a.login)))
                    .collect::<Vec<_>>();
                Ok((authors.len(), authors))
            }
            StreamKind::PullRequests => {
                let items: Vec<IssueItem> = serde_json::from_str(body)?;
                let authors = items
                    .into_iter()
                    .map(|i| Author::from(i.user.map(|u| u.login)))
                    .collect::<Vec<_>>();
                Ok((authors.len(), authors))
            }
            StreamKind::Issues => {
                let items: Vec<IssueItem> = serde_json::from_str(body)?;
                let raw = items.len();
                let authors = items
                    .into_iter()
                    .filter(|i| i.pull_request.is_none())
                    .map(|i| Author::from(i.user.map(|u| u.login)))
                    .collect();
                Ok((raw, authors))
            }
        }
    }
}

/// Buffers at most one API page beyond the requested chunk.
struct PageCursor<'a> {
    pages: &'a dyn PageFetch,
    path: String,
    kind: StreamKind,
    next_page: Option<u32>,
    buffer: VecDeque<Author>,
}

impl<'a> PageCursor<'a> {
    fn new(pages: &'a dyn PageFetch, path: String, kind: StreamKind) -> Self {
        Self {
            pages,
            path,
            kind,
            next_page: Some(1),
            buffer: VecDeque::new(),
        }
    }
}

impl ActivityCursor for PageCursor<'_> {
    fn next_chunk(&mut self, size: usize) -> Result<Chunk> {
        while self.buffer.len() < size {
            let Some(page) = self.next_page else {
                break;
            };
            let body = self.pages.fetch(&self.path, &self.kind.query(), page)?;
            let (raw, authors) = self.kind.parse(&body)?;
            self.buffer.extend(authors);
            self.next_page = (raw >= PER_PAGE).then_some(page + 1);
        }

        let take = size.min(self.buffer.len());
        let items: Vec<Author> = self.buffer.drain(..take).collect();
        Ok(Chunk {
            items,
            has_more: !self.buffer.is_empty() || self.next_page.is_some(),
        })
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
