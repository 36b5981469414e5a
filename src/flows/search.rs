//! Search flow
//!
//! Resolve roots → derive each repository's context → stream rg matches → write TSV.
//! Repositories are processed one at a time, in argument order, and the first
//! failure ends the run.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::backends::git::{repo_context, resolve_roots};
use crate::backends::rg::MatchStream;
use crate::core::model::{OutputRecord, RepositoryRoot, SearchOptions};
use crate::core::render::{open_sink, TsvWriter};

/// Everything one invocation needs
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub pattern: String,
    pub repos: Vec<PathBuf>,
    pub options: SearchOptions,
    pub branch: Option<String>,
    /// None writes to stdout
    pub output: Option<PathBuf>,
}

/// Stream every match of one repository into `writer`; returns the match count
pub fn search_repo<W: Write>(
    pattern: &str,
    root: &RepositoryRoot,
    branch: Option<&str>,
    options: &SearchOptions,
    writer: &mut TsvWriter<W>,
) -> Result<u64> {
    let ctx = repo_context(root, branch).context("failed to get repository context")?;

    let mut count = 0;
    for m in MatchStream::spawn(pattern, root, options)? {
        writer.write(&OutputRecord::new(&m?, &ctx))?;
        count += 1;
    }

    Ok(count)
}

/// Run the search across all repositories, writing to `sink`
pub fn search_all<W: Write>(
    pattern: &str,
    roots: &[RepositoryRoot],
    branch: Option<&str>,
    options: &SearchOptions,
    sink: W,
) -> Result<u64> {
    let mut writer = TsvWriter::new(sink);

    for root in roots {
        let count = search_repo(pattern, root, branch, options, &mut writer)
            .with_context(|| format!("search failed in {}", root))?;
        tracing::debug!(root = %root, matches = count, "repository done");
    }

    Ok(writer.records())
}

/// Run the search flow
pub fn run_search(request: SearchRequest) -> Result<()> {
    let roots = resolve_roots(&request.repos).context("repository validation failed")?;

    // Opened only after validation so a bad argument leaves no file behind
    let sink = open_sink(request.output.as_deref())?;

    let total = search_all(
        &request.pattern,
        &roots,
        request.branch.as_deref(),
        &request.options,
        sink,
    )?;

    let destination = request
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    tracing::debug!(repositories = roots.len(), matches = total, %destination, "search complete");
    Ok(())
}
