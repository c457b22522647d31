//! Document sources: plaintext files, directories, stdin and crawler feeds.
//!
//! Reading is part of the per-document unit of work. A source is cheap to
//! enumerate and only touches the filesystem in [`DocumentSource::load`], so
//! an unreadable file fails on its own without affecting the rest of a batch.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::{NormalizeError, Result};

/// Raw text of one document, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub id: String,
    pub text: String,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// Something that can produce one raw document.
pub trait DocumentSource: Send + Sync {
    /// Identifier used in records and diagnostics.
    fn id(&self) -> String;

    /// Read the document.
    fn load(&self) -> Result<RawDocument>;
}

impl DocumentSource for RawDocument {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn load(&self) -> Result<RawDocument> {
        Ok(self.clone())
    }
}

/// A plaintext document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<RawDocument> {
        let text = read_file(&self.path)?;
        Ok(RawDocument::new(self.id(), text))
    }
}

/// Reads a UTF-8 text file, folding CRLF line endings to `\n`.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(NormalizeError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| NormalizeError::InvalidEncoding)?;
    Ok(unix_newlines(text))
}

fn unix_newlines(text: String) -> String {
    if text.contains("\r\n") { text.replace("\r\n", "\n") } else { text }
}

/// Reads all of standard input until EOF.
pub fn read_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|e| {
        if e.kind() == io::ErrorKind::InvalidData { NormalizeError::InvalidEncoding } else { NormalizeError::from(e) }
    })?;

    Ok(unix_newlines(buffer))
}

/// Lists the documents in `dir` whose extension equals `extension`
/// (case-insensitive), sorted by path. Subdirectories are not descended.
///
/// A missing directory is an error: without it there is nothing to process.
pub fn list_documents(dir: impl AsRef<Path>, extension: &str) -> Result<Vec<FileSource>> {
    let dir = dir.as_ref();

    if !dir.is_dir() {
        return Err(NormalizeError::FileNotFound(dir.to_path_buf()));
    }

    let wanted = extension.trim_start_matches('.').to_lowercase();
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.to_lowercase() == wanted);

        if path.is_file() && matches {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths.into_iter().map(FileSource::new).collect())
}

/// One page yielded by the crawling collaborator.
///
/// The crawler's own output keys (`title`, `content`, `commands`) are
/// accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrawledPage {
    pub url: String,

    #[serde(default, alias = "title")]
    pub title_hint: Option<String>,

    #[serde(default, alias = "content")]
    pub raw_text: Option<String>,

    #[serde(default, alias = "commands")]
    pub code_blocks: Option<Vec<String>>,
}

impl CrawledPage {
    /// Rejects pages whose URL does not parse.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.url).map_err(|e| NormalizeError::InvalidUrl(format!("{}: {}", self.url, e)))?;
        Ok(())
    }
}

/// One non-blank line of a crawler feed, parsed lazily by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLine {
    /// 1-based line number in the feed file
    pub line: usize,
    pub text: String,
}

impl FeedLine {
    pub fn id(&self) -> String {
        format!("line {}", self.line)
    }

    /// Decode and validate the page on this line.
    pub fn parse(&self) -> Result<CrawledPage> {
        let page: CrawledPage = serde_json::from_str(&self.text)
            .map_err(|e| NormalizeError::MalformedRecord { line: self.line, message: e.to_string() })?;
        page.validate()?;
        Ok(page)
    }
}

/// Splits a crawler feed into its non-blank lines.
pub fn feed_lines(content: &str) -> Vec<FeedLine> {
    content
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| FeedLine { line: index + 1, text: text.to_string() })
        .collect()
}

/// Reads a JSON-lines crawler feed from disk.
pub fn read_feed(path: impl AsRef<Path>) -> Result<Vec<FeedLine>> {
    let content = read_file(path)?;
    Ok(feed_lines(&content))
}
