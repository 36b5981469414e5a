//! TSV renderer
//!
//! Writes one OutputRecord per line as `repository \t local_path \t matched_line \t github_url`,
//! flushing after every record so partial output survives an aborted run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::error::{ReporgError, Result};
use crate::core::model::OutputRecord;

/// Replace tabs, LF and CR with spaces, then trim surrounding whitespace
pub fn sanitize_line(text: &[u8]) -> Vec<u8> {
    let replaced: Vec<u8> = text
        .iter()
        .map(|&b| match b {
            b'\t' | b'\n' | b'\r' => b' ',
            other => other,
        })
        .collect();

    match std::str::from_utf8(&replaced) {
        Ok(s) => s.trim().as_bytes().to_vec(),
        Err(_) => replaced.trim_ascii().to_vec(),
    }
}

/// Open the output destination: a freshly truncated file, or stdout
pub fn open_sink(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|source| ReporgError::OutputOpenFailed {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

/// Streaming TSV writer
pub struct TsvWriter<W: Write> {
    writer: BufWriter<W>,
    records: u64,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            records: 0,
        }
    }

    /// Write a single record and flush it
    pub fn write(&mut self, record: &OutputRecord) -> Result<()> {
        let line = Self::encode(record);
        self.writer
            .write_all(&line)
            .map_err(ReporgError::OutputWriteFailed)?;

        // Flush immediately for real-time output
        self.writer.flush().map_err(ReporgError::OutputWriteFailed)?;

        self.records += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records(&self) -> u64 {
        self.records
    }

    fn encode(record: &OutputRecord) -> Vec<u8> {
        let matched = sanitize_line(&record.matched_line);

        let mut line = Vec::with_capacity(
            record.repository.len()
                + record.local_path.len()
                + matched.len()
                + record.github_url.len()
                + 4,
        );
        line.extend_from_slice(record.repository.as_bytes());
        line.push(b'\t');
        line.extend_from_slice(record.local_path.as_bytes());
        line.push(b'\t');
        line.extend_from_slice(&matched);
        line.push(b'\t');
        line.extend_from_slice(record.github_url.as_bytes());
        line.push(b'\n');
        line
    }
}
