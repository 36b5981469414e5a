//! Common utilities

use std::path::PathBuf;

/// Resolve a command on PATH
pub fn find_command(cmd: &str) -> Option<PathBuf> {
    which::which(cmd).ok()
}

/// Check if a command is available in PATH
pub fn command_exists(cmd: &str) -> bool {
    find_command(cmd).is_some()
}

/// Remove one trailing line ending (LF, CRLF or CR)
pub fn strip_line_ending(line: &mut Vec<u8>) {
    if line.ends_with(b"\r\n") {
        line.truncate(line.len() - 2);
    } else if line.ends_with(b"\n") || line.ends_with(b"\r") {
        line.truncate(line.len() - 1);
    }
}

/// Marker appended to truncated lines
pub const ELLIPSIS: &str = "...";

/// Truncate a line to `max_len` and append `...`; returns whether it was cut.
///
/// Length is counted in characters for valid UTF-8 and in bytes otherwise.
/// 0 means unlimited.
pub fn truncate_line(line: &mut Vec<u8>, max_len: usize) -> bool {
    if max_len == 0 {
        return false;
    }

    let cut = match std::str::from_utf8(line) {
        Ok(s) => s.char_indices().nth(max_len).map(|(idx, _)| idx),
        Err(_) => (line.len() > max_len).then_some(max_len),
    };

    match cut {
        Some(end) => {
            line.truncate(end);
            line.extend_from_slice(ELLIPSIS.as_bytes());
            true
        }
        None => false,
    }
}

/// Test gate: true when every tool is on PATH, otherwise the skip is reported
///
/// With `REPORG_REQUIRE_TOOLS` set, a missing tool fails the test instead.
#[cfg(test)]
pub fn tools_or_skip(tools: &[&str]) -> bool {
    let missing: Vec<&str> = tools.iter().copied().filter(|t| !command_exists(t)).collect();
    if missing.is_empty() {
        return true;
    }

    let test = std::thread::current().name().unwrap_or("<unnamed>").to_string();
    if std::env::var_os("REPORG_REQUIRE_TOOLS").is_some() {
        panic!("{}: required tools missing: {}", test, missing.join(", "));
    }
    eprintln!("SKIPPED {}: {} not found on PATH", test, missing.join(", "));
    false
}
