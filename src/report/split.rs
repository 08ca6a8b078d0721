use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// GitHub rejects issue bodies longer than this many characters.
pub const ISSUE_BODY_MAX_CHARS: usize = 65_535;

pub fn too_large_for_issue_body(path: &Path, max_chars: usize) -> Result<bool> {
    let content = fs::read_to_string(path)?;
    Ok(content.chars().count() > max_chars)
}

/// Write `path`'s content into `<stem>_0.md`, `<stem>_1.md`, ... next to it,
/// each holding at most `max_chars` characters. The original is untouched.
pub fn split_markdown_file(path: &Path, max_chars: usize) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(path)?;
    let chars: Vec<char> = content.chars().collect();

    let mut parts = Vec::new();
    for (i, piece) in chars.chunks(max_chars.max(1)).enumerate() {
        let part = sibling(path, &i.to_string());
        fs::write(&part, piece.iter().collect::<String>())?;
        parts.push(part);
    }
    Ok(parts)
}

/// Where the unsplit report is kept after splitting.
pub fn full_path(path: &Path) -> PathBuf {
    sibling(path, "full")
}

/// Split `path` when it exceeds `max_chars`: the whole report moves to
/// `<stem>_full.md` and the first part takes its place. Returns the parts
/// (empty when nothing was split).
pub fn fit_issue_body(path: &Path, max_chars: usize) -> Result<Vec<PathBuf>> {
    if !too_large_for_issue_body(path, max_chars)? {
        return Ok(Vec::new());
    }
    let mut parts = split_markdown_file(path, max_chars)?;
    fs::rename(path, full_path(path))?;
    fs::rename(&parts[0], path)?;
    parts[0] = path.to_path_buf();
    Ok(parts)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}_{suffix}.md"))
}
