//! ripgrep integration
//!
//! Spawns `rg --json` for one repository root and exposes its match events as a
//! lazy iterator of NormalizedMatch. Lines are read one at a time from the
//! child's stdout; nothing is collected.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use crate::core::error::{ReporgError, Result};
use crate::core::model::{Encoding, NormalizedMatch, RepositoryRoot, SearchOptions};
use crate::core::paths::relative_or_raw;
use crate::core::util::{command_exists, strip_line_ending, truncate_line};

/// Largest single JSON event line accepted from rg (10 MiB)
pub const MAX_EVENT_LINE_BYTES: usize = 10 * 1024 * 1024;

/// rg exit status for "no matches"
const EXIT_NO_MATCHES: i32 = 1;

/// Check if ripgrep is available
pub fn is_rg_available() -> bool {
    command_exists("rg")
}

/// rg's representation of possibly non-UTF-8 data
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ArbitraryData {
    Text { text: String },
    /// Base64-encoded raw bytes
    Bytes { bytes: String },
}

impl ArbitraryData {
    /// Raw bytes of the payload; undecodable base64 yields an empty line
    fn into_bytes(self) -> Vec<u8> {
        match self {
            ArbitraryData::Text { text } => text.into_bytes(),
            ArbitraryData::Bytes { bytes } => STANDARD.decode(bytes).unwrap_or_default(),
        }
    }
}

/// Payload of a `"type": "match"` event
#[derive(Debug, Clone, Deserialize)]
pub struct MatchData {
    #[serde(default)]
    pub path: Option<ArbitraryData>,
    #[serde(default)]
    pub lines: Option<ArbitraryData>,
    #[serde(default)]
    pub line_number: Option<u64>,
}

/// Envelope of every rg JSON line
#[derive(Debug, Deserialize)]
struct RgMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Parse one event line into match data; None for non-match or malformed lines
pub fn parse_event(line: &[u8]) -> Option<MatchData> {
    let msg: RgMessage = serde_json::from_slice(line).ok()?;
    if msg.kind != "match" {
        return None;
    }
    serde_json::from_value(msg.data).ok()
}

/// Turn match data into a NormalizedMatch relative to `root`
///
/// Returns None when the event cannot be attributed to a UTF-8 path or has no line number.
pub fn normalize_match(data: MatchData, root: &Path, opts: &SearchOptions) -> Option<NormalizedMatch> {
    let abs_path = match data.path? {
        ArbitraryData::Text { text } => text,
        ArbitraryData::Bytes { .. } => return None,
    };
    let line_number = data.line_number?;

    let mut line = data.lines.map(ArbitraryData::into_bytes).unwrap_or_default();
    strip_line_ending(&mut line);
    truncate_line(&mut line, opts.max_line_length);

    Some(NormalizedMatch {
        rel_path: relative_or_raw(&abs_path, root),
        line_number,
        line,
    })
}

/// Build the rg argument vector: flags, then `--`, pattern and root
pub fn build_args(pattern: &str, root: &Path, opts: &SearchOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--json".into()];

    if opts.ignore_case {
        args.push("-i".into());
    }

    for glob in &opts.globs {
        args.push("--glob".into());
        args.push(glob.into());
    }

    if opts.hidden {
        args.push("--hidden".into());
    }

    if opts.fixed_strings {
        args.push("-F".into());
    }

    if let Encoding::Named(name) = &opts.encoding {
        args.push("--encoding".into());
        args.push(name.into());
    }

    args.push("--".into());
    args.push(pattern.into());
    args.push(root.as_os_str().to_owned());
    args
}

/// How the search process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchExit {
    Matched,
    NoMatches,
    /// Exit code, or None when killed by a signal
    Failed(Option<i32>),
}

impl From<ExitStatus> for SearchExit {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => SearchExit::Matched,
            Some(EXIT_NO_MATCHES) => SearchExit::NoMatches,
            code => SearchExit::Failed(code),
        }
    }
}

impl SearchExit {
    pub fn into_result(self) -> Result<()> {
        match self {
            SearchExit::Matched | SearchExit::NoMatches => Ok(()),
            SearchExit::Failed(code) => Err(ReporgError::SearchToolFailed { code }),
        }
    }
}

/// Line reader with an upper bound on line length
pub struct EventLines<R> {
    reader: R,
    limit: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> EventLines<R> {
    pub fn new(reader: R, limit: usize) -> Self {
        Self {
            reader,
            limit,
            buf: Vec::new(),
        }
    }

    /// Next line including its terminator; Ok(None) at EOF
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        self.buf.clear();

        // One byte past the limit is enough to tell an oversized line apart
        let read = (&mut self.reader)
            .take(self.limit as u64 + 1)
            .read_until(b'\n', &mut self.buf)
            .map_err(ReporgError::SearchToolReadFailed)?;

        if read == 0 {
            return Ok(None);
        }

        let content_len = if self.buf.ends_with(b"\n") {
            self.buf.len() - 1
        } else {
            self.buf.len()
        };
        if content_len > self.limit {
            return Err(ReporgError::OutputLineTooLong { limit: self.limit });
        }

        Ok(Some(&self.buf))
    }
}

/// Lazy sequence of matches from one rg process
///
/// Yields matches in rg's emit order. After the last match the process is reaped and a
/// failing exit status is yielded as a final error. Dropping the stream early kills rg.
pub struct MatchStream {
    child: Child,
    lines: EventLines<BufReader<ChildStdout>>,
    root: RepositoryRoot,
    opts: SearchOptions,
    done: bool,
}

impl MatchStream {
    /// Spawn rg for `root`
    pub fn spawn(pattern: &str, root: &RepositoryRoot, opts: &SearchOptions) -> Result<Self> {
        if !is_rg_available() {
            return Err(ReporgError::SearchToolUnavailable);
        }

        let args = build_args(pattern, root.path(), opts);
        tracing::debug!(root = %root, ?args, "spawning rg");

        let mut child = Command::new("rg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(ReporgError::SearchToolSpawnFailed)?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ReporgError::SearchToolSpawnFailed(std::io::Error::other(
                    "failed to capture rg stdout",
                )));
            }
        };

        Ok(Self {
            child,
            lines: EventLines::new(BufReader::new(stdout), MAX_EVENT_LINE_BYTES),
            root: root.clone(),
            opts: opts.clone(),
            done: false,
        })
    }

    /// Kill and reap rg without reading further output
    fn abort(&mut self) {
        self.done = true;
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    fn finish(&mut self) -> Result<()> {
        self.done = true;
        let status = self
            .child
            .wait()
            .map_err(ReporgError::SearchToolWaitFailed)?;
        let exit = SearchExit::from(status);
        tracing::debug!(root = %self.root, ?exit, "rg exited");
        exit.into_result()
    }
}

impl Iterator for MatchStream {
    type Item = Result<NormalizedMatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let event = match self.lines.next_line() {
                Ok(Some(line)) => parse_event(line),
                Ok(None) => return self.finish().err().map(Err),
                Err(err) => {
                    self.abort();
                    return Some(Err(err));
                }
            };

            let Some(data) = event else {
                tracing::trace!("skipping non-match event line");
                continue;
            };

            match normalize_match(data, self.root.path(), &self.opts) {
                Some(m) => return Some(Ok(m)),
                None => tracing::trace!("skipping match event without usable path"),
            }
        }
    }
}

impl Drop for MatchStream {
    fn drop(&mut self) {
        if !self.done {
            self.abort();
        }
    }
}
