//! Error taxonomy
//!
//! Every fatal condition the pipeline can hit maps to exactly one variant.
//! Malformed event lines are not errors and never reach this type.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while resolving, searching or writing
#[derive(Debug, Error)]
pub enum ReporgError {
    #[error("not a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    #[error(
        "path is not a repository root (subdirectory detected): {} (root is {})",
        path.display(),
        root.display()
    )]
    NotARepositoryRoot { path: PathBuf, root: PathBuf },

    #[error("no remote named 'origin' configured in {}", root.display())]
    NoRemoteConfigured { root: PathBuf },

    #[error("not a GitHub repository: unsupported remote URL {url}")]
    UnsupportedRemote { url: String },

    #[error(
        "ripgrep (rg) not found: please install it from https://github.com/BurntSushi/ripgrep#installation"
    )]
    SearchToolUnavailable,

    #[error("failed to start ripgrep")]
    SearchToolSpawnFailed(#[source] std::io::Error),

    #[error("error reading ripgrep output")]
    SearchToolReadFailed(#[source] std::io::Error),

    #[error("failed to wait for ripgrep to exit")]
    SearchToolWaitFailed(#[source] std::io::Error),

    #[error("ripgrep output line exceeds {limit} bytes")]
    OutputLineTooLong { limit: usize },

    #[error("ripgrep failed ({})", describe_exit(*code))]
    SearchToolFailed { code: Option<i32> },

    #[error("failed to create output file {}", path.display())]
    OutputOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output")]
    OutputWriteFailed(#[source] std::io::Error),
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ReporgError>;
