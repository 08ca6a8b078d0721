use std::cell::RefCell;

use super::*;
use crate::activity::tally;

fn login(name: &str) -> Author {
    Author::Login(name.to_string())
}

#[test]
fn parse_commits_with_unlinked_author() {
    let body = r#"[
        {"sha": "a1", "author": {"login": "alice", "id": 1}},
        {"sha": "b2", "author": null},
        {"sha": "c3"}
    ]"#;
    let (raw, authors) = StreamKind::Commits.parse(body).unwrap();
    assert_eq!(raw, 3);
    assert_eq!(authors, vec![login("alice"), Author::Unknown, Author::Unknown]);
}

#[test]
fn parse_pull_requests() {
    let body = r#"[
        {"number": 2, "user": {"login": "bob"}},
        {"number": 1, "user": null}
    ]"#;
    let (raw, authors) = StreamKind::PullRequests.parse(body).unwrap();
    assert_eq!(raw, 2);
    assert_eq!(authors, vec![login("bob"), Author::Unknown]);
}

#[test]
fn parse_issues_drops_pull_requests() {
    let body = r#"[
        {"number": 3, "user": {"login": "carol"}},
        {"number": 2, "user": {"login": "bob"}, "pull_request": {"url": "x"}},
        {"number": 1, "user": {"login": "dave"}, "pull_request": null}
    ]"#;
    let (raw, authors) = StreamKind::Issues.parse(body).unwrap();
    assert_eq!(raw, 3, "raw count drives pagination");
    assert_eq!(authors, vec![login("carol"), login("dave")]);
}

#[test]
fn parse_rejects_non_array() {
    let err = StreamKind::Commits
        .parse(r#"{"message": "Not Found"}"#)
        .unwrap_err();
    assert!(matches!(err, MeasureError::Json(_)));
}

#[test]
fn endpoints_and_queries() {
    assert_eq!(StreamKind::Commits.endpoint(), "commits");
    assert_eq!(StreamKind::PullRequests.endpoint(), "pulls");
    assert_eq!(StreamKind::Issues.endpoint(), "issues");
    assert!(StreamKind::Commits.query().is_empty());
    assert_eq!(
        StreamKind::Issues.query(),
        vec![("state", "all".to_string())]
    );
}

#[test]
fn client_trims_trailing_slash() {
    let client = GitHubClient::new("https://ghe.example.com/api/v3/", "t").unwrap();
    assert_eq!(client.api_url, "https://ghe.example.com/api/v3");
}

/// Serves fixed page bodies and records which pages were requested.
struct CannedPages {
    pages: Vec<String>,
    requested: RefCell<Vec<u32>>,
}

impl CannedPages {
    fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            requested: RefCell::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<u32> {
        self.requested.borrow().clone()
    }
}

impl PageFetch for CannedPages {
    fn fetch(&self, _path: &str, _extra: &[(&str, String)], page: u32) -> Result<String> {
        self.requested.borrow_mut().push(page);
        let index = page as usize - 1;
        Ok(self.pages.get(index).cloned().unwrap_or_else(|| "[]".to_string()))
    }
}

fn commit_page(n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| format!(r#"{{"author": {{"login": "user{}"}}}}"#, i % 4))
        .collect();
    format!("[{}]", items.join(","))
}

/// `issues` plain issues followed by `pulls` pull requests.
fn issue_page(issues: usize, pulls: usize) -> String {
    let plain = (0..issues).map(|_| r#"{"user": {"login": "reporter"}}"#.to_string());
    let prs = (0..pulls)
        .map(|_| r#"{"user": {"login": "coder"}, "pull_request": {"url": "u"}}"#.to_string());
    format!("[{}]", plain.chain(prs).collect::<Vec<_>>().join(","))
}

fn chunk_sizes(cursor: &mut PageCursor<'_>, size: usize) -> Vec<usize> {
    let mut sizes = Vec::new();
    loop {
        let chunk = cursor.next_chunk(size).unwrap();
        sizes.push(chunk.items.len());
        if !chunk.has_more {
            return sizes;
        }
    }
}

#[test]
fn cursor_chunks_smaller_than_a_page() {
    let pages = CannedPages::new(vec![commit_page(100), commit_page(100), commit_page(50)]);
    let mut cursor = PageCursor::new(&pages, "/c".to_string(), StreamKind::Commits);

    assert_eq!(
        chunk_sizes(&mut cursor, 30),
        vec![30, 30, 30, 30, 30, 30, 30, 30, 10]
    );
    assert_eq!(pages.requested(), vec![1, 2, 3]);
}

#[test]
fn cursor_chunk_larger_than_a_page() {
    let pages = CannedPages::new(vec![commit_page(100), commit_page(100), commit_page(50)]);
    let mut cursor = PageCursor::new(&pages, "/c".to_string(), StreamKind::Commits);

    let chunk = cursor.next_chunk(250).unwrap();
    assert_eq!(chunk.items.len(), 250);
    assert!(!chunk.has_more);
    assert_eq!(pages.requested(), vec![1, 2, 3]);
}

#[test]
fn cursor_full_last_page_needs_one_more_request() {
    let pages = CannedPages::new(vec![commit_page(100), commit_page(100)]);
    let mut cursor = PageCursor::new(&pages, "/c".to_string(), StreamKind::Commits);

    let result = tally(&mut cursor, 100, "commits").unwrap();
    assert_eq!(result.items, 200);
    assert_eq!(result.counts.get("user0"), 50);
    assert_eq!(pages.requested(), vec![1, 2, 3]);
}

#[test]
fn cursor_keeps_paging_past_filtered_pull_requests() {
    // A full page of which 40 items are pull requests: the stream must not
    // end just because fewer than 100 issues came back.
    let pages = CannedPages::new(vec![issue_page(60, 40), issue_page(10, 0)]);
    let mut cursor = PageCursor::new(&pages, "/i".to_string(), StreamKind::Issues);

    let result = tally(&mut cursor, 100, "issues").unwrap();
    assert_eq!(result.items, 70);
    assert_eq!(result.counts.get("reporter"), 70);
    assert_eq!(result.counts.get("coder"), 0);
    assert_eq!(pages.requested(), vec![1, 2]);
}

#[test]
fn cursor_empty_stream() {
    let pages = CannedPages::new(Vec::new());
    let mut cursor = PageCursor::new(&pages, "/p".to_string(), StreamKind::PullRequests);

    let chunk = cursor.next_chunk(100).unwrap();
    assert!(chunk.items.is_empty());
    assert!(!chunk.has_more);
    assert_eq!(pages.requested(), vec![1]);
}

#[test]
fn app_connect_fails_when_github_is_unreachable() {
    let auth = Auth::App(AppCredentials {
        app_id: 1,
        installation_id: 2,
        private_key: include_str!("testdata/app_key.pem").to_string(),
    });
    // Nothing listens on the discard port.
    let err = GitHubClient::connect("http://127.0.0.1:9", &auth)
        .err()
        .unwrap();
    assert!(matches!(err, MeasureError::Http(_)));
}
