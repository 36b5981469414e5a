//! Result Model
//!
//! Every repository, search configuration and match flows through these
//! types between the backends and the TSV renderer.

use std::fmt;
use std::path::{Path, PathBuf};

/// The only hosting provider links are generated for
pub const GITHUB_HOST: &str = "github.com";

/// Branch embedded in links when none can be determined (e.g. detached HEAD)
pub const FALLBACK_BRANCH: &str = "main";

/// Canonical path of a git repository's top-level directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRoot(PathBuf);

impl RepositoryRoot {
    /// Wrap an already canonicalized, validated path
    pub(crate) fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RepositoryRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RepositoryRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// GitHub coordinates of a repository root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl RepositoryContext {
    /// Repository identifier in "owner/name" form
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Blob URL pointing at one line of a file
    ///
    /// The path is emitted with '/' separators and without percent-encoding;
    /// GitHub accepts raw spaces and other characters in this position.
    pub fn blob_url(&self, rel_path: &str, line_number: u64) -> String {
        format!(
            "https://{}/{}/{}/blob/{}/{}#L{}",
            GITHUB_HOST,
            self.owner,
            self.name,
            self.branch,
            rel_path.replace('\\', "/"),
            line_number
        )
    }
}

/// Text encoding hint forwarded to rg
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Let rg detect BOM-delimited encodings on its own
    #[default]
    Auto,
    Named(String),
}

impl Encoding {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("auto") {
            Encoding::Auto
        } else {
            Encoding::Named(value.to_string())
        }
    }
}

/// Immutable search configuration shared by every repository in a run
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub ignore_case: bool,
    /// Include/exclude globs in caller order; exclusions start with '!'
    pub globs: Vec<String>,
    pub hidden: bool,
    pub fixed_strings: bool,
    /// 0 disables truncation
    pub max_line_length: usize,
    pub encoding: Encoding,
}

/// One match, relative to its repository root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMatch {
    /// Path relative to the repository root, using '/' as separator
    pub rel_path: String,
    /// 1-indexed
    pub line_number: u64,
    /// Line content with the line ending removed, possibly truncated.
    /// Kept as bytes so content rg could not decode passes through verbatim.
    pub line: Vec<u8>,
}

/// The four TSV columns, in output order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub repository: String,
    pub local_path: String,
    pub matched_line: Vec<u8>,
    pub github_url: String,
}

impl OutputRecord {
    pub fn new(m: &NormalizedMatch, ctx: &RepositoryContext) -> Self {
        Self {
            repository: ctx.full_name(),
            local_path: format!("{}:{}", m.rel_path, m.line_number),
            matched_line: m.line.clone(),
            github_url: ctx.blob_url(&m.rel_path, m.line_number),
        }
    }
}
