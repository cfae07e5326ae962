//! Per-run transcript file.
//!
//! One plain-text file per run, named by start timestamp and a sanitized
//! prefix of the topic. Every entry is flushed as soon as it is written so
//! the file never lags the in-memory history by more than the turn in
//! flight. The handle is released on drop, including on error paths.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use thiserror::Error;

use super::message::Speaker;

/// `strftime` pattern for the run timestamp (file name and header).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Characters of the raw topic considered for the file name.
pub const TOPIC_PREFIX_CHARS: usize = 20;

const HEADER_RULE_WIDTH: usize = 60;
const SUMMARY_RULE_WIDTH: usize = 50;

/// Errors writing the transcript.
#[derive(Debug, Error)]
#[error("transcript I/O failed for {}: {source}", .path.display())]
pub struct TranscriptError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Keep alphanumerics, space, `.`, `_` and `-` from the first 20 characters.
///
/// Truncation happens before filtering, so dropped characters still count
/// toward the 20. Never fails.
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .chars()
        .take(TOPIC_PREFIX_CHARS)
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .collect()
}

/// `debate_log_<timestamp>_<sanitized topic>.txt`
pub fn transcript_file_name(timestamp: &str, topic: &str) -> String {
    format!("debate_log_{}_{}.txt", timestamp, sanitize_topic(topic))
}

/// Append-only writer for one run's transcript.
pub struct TranscriptLogger {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TranscriptLogger {
    /// Create the transcript in `dir` and write the header.
    pub fn create<Tz>(
        dir: &Path,
        topic: &str,
        started_at: &DateTime<Tz>,
    ) -> Result<Self, TranscriptError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let timestamp = started_at.format(TIMESTAMP_FORMAT).to_string();
        let path = dir.join(transcript_file_name(&timestamp, topic));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| TranscriptError {
                path: path.clone(),
                source,
            })?;

        let mut logger = Self {
            path,
            writer: BufWriter::new(file),
        };
        logger.write_entry(&format!(
            "DEBATE LOG: {}\nTIMESTAMP: {}\n{}\n",
            topic,
            timestamp,
            "-".repeat(HEADER_RULE_WIDTH)
        ))?;
        Ok(logger)
    }

    /// Path of the file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `[ROUND n]` marker, preceded by a blank line.
    pub fn round_marker(&mut self, round: u32) -> Result<(), TranscriptError> {
        self.write_entry(&format!("\n[ROUND {}]\n", round))
    }

    /// One `LABEL: text` turn line.
    pub fn turn(&mut self, speaker: Speaker, content: &str) -> Result<(), TranscriptError> {
        self.write_entry(&format!("{}: {}\n", speaker.transcript_label(), content))
    }

    /// Final judicial summary section.
    pub fn summary(&mut self, summary: &str) -> Result<(), TranscriptError> {
        let rule = "=".repeat(SUMMARY_RULE_WIDTH);
        self.write_entry(&format!(
            "\n{}\nFINAL JUDICIAL SUMMARY\n{}\n{}",
            rule, rule, summary
        ))
    }

    /// Flush and close, returning the file path.
    pub fn finish(mut self) -> Result<PathBuf, TranscriptError> {
        self.writer.flush().map_err(|source| TranscriptError {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }

    fn write_entry(&mut self, text: &str) -> Result<(), TranscriptError> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| TranscriptError {
                path: self.path.clone(),
                source,
            })
    }
}
