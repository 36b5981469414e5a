//! git integration
//!
//! Validates repository roots and derives the GitHub owner/name/branch used in links.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::error::{ReporgError, Result};
use crate::core::model::{RepositoryContext, RepositoryRoot, FALLBACK_BRANCH};

/// `https://github.com/<owner>/<name>(.git)`
static HTTPS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://github\.com/([^/]+)/([^/]+?)(?:\.git)?$").expect("Invalid HTTPS_RE regex")
});

/// `git@github.com:<owner>/<name>(.git)`
static SSH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^git@github\.com:([^/]+)/([^/]+?)(?:\.git)?$").expect("Invalid SSH_RE regex")
});

/// Run `git -C <dir> <args>` and return trimmed stdout, or None on any failure
fn git_output(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Top-level directory of the repository containing `path`
pub fn show_toplevel(path: &Path) -> Option<PathBuf> {
    git_output(path, &["rev-parse", "--show-toplevel"])
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Validate that `path` is exactly a repository's top-level directory
///
/// Both sides are canonicalized before comparing, so trailing slashes,
/// `..` segments and symlinks do not matter.
pub fn validate_root(path: &Path) -> Result<RepositoryRoot> {
    let not_a_repo = || ReporgError::NotARepository {
        path: path.to_path_buf(),
    };

    let toplevel = show_toplevel(path).ok_or_else(not_a_repo)?;
    let canonical = path.canonicalize().map_err(|_| not_a_repo())?;
    let canonical_toplevel = toplevel.canonicalize().map_err(|_| not_a_repo())?;

    if canonical != canonical_toplevel {
        return Err(ReporgError::NotARepositoryRoot {
            path: path.to_path_buf(),
            root: canonical_toplevel,
        });
    }

    Ok(RepositoryRoot::new(canonical))
}

/// Validate every path and drop duplicates, keeping first-occurrence order
///
/// Fails on the first invalid path.
pub fn resolve_roots(paths: &[impl AsRef<Path>]) -> Result<Vec<RepositoryRoot>> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for path in paths {
        let root = validate_root(path.as_ref())?;
        if seen.insert(root.clone()) {
            tracing::debug!(root = %root, "resolved repository root");
            unique.push(root);
        } else {
            tracing::debug!(root = %root, "skipping duplicate repository root");
        }
    }

    Ok(unique)
}

/// URL of the `origin` remote
pub fn origin_url(root: &Path) -> Result<String> {
    git_output(root, &["remote", "get-url", "origin"])
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ReporgError::NoRemoteConfigured {
            root: root.to_path_buf(),
        })
}

/// Extract (owner, name) from a GitHub HTTPS or SSH remote URL
pub fn parse_github_remote(url: &str) -> Result<(String, String)> {
    [&*HTTPS_RE, &*SSH_RE]
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .ok_or_else(|| ReporgError::UnsupportedRemote {
            url: url.to_string(),
        })
}

/// Currently checked-out branch; None when detached or on failure
pub fn current_branch(root: &Path) -> Option<String> {
    git_output(root, &["branch", "--show-current"]).filter(|b| !b.is_empty())
}

/// Derive the link context for a repository root
///
/// Branch order: `branch_override`, then the checked-out branch, then `main`.
pub fn repo_context(root: &RepositoryRoot, branch_override: Option<&str>) -> Result<RepositoryContext> {
    let url = origin_url(root.path())?;
    let (owner, name) = parse_github_remote(&url)?;

    let branch = match branch_override.filter(|b| !b.is_empty()) {
        Some(branch) => branch.to_string(),
        None => current_branch(root.path()).unwrap_or_else(|| {
            tracing::warn!(
                root = %root,
                fallback = FALLBACK_BRANCH,
                "could not determine current branch, using fallback"
            );
            FALLBACK_BRANCH.to_string()
        }),
    };

    let ctx = RepositoryContext {
        owner,
        name,
        branch,
    };
    tracing::debug!(root = %root, repository = %ctx.full_name(), branch = %ctx.branch, "repository context");
    Ok(ctx)
}
