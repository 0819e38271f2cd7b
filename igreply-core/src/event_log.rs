//! Append-only daily audit log of inbound webhook deliveries.
//!
//! Every delivery is written to `<dir>/webhook_<YYYY-MM-DD>.txt` (UTC date) as
//! a self-delimited record:
//!
//! ```text
//!
//! === Webhook Event 2024-05-01T12:00:00.123Z ===
//! {
//!   "object": "instagram"
//! }
//! =====================================
//!
//! ```

use serde_json::Value;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const RECORD_HEADER_PREFIX: &str = "=== Webhook Event ";
const RECORD_HEADER_SUFFIX: &str = " ===";
const RECORD_FOOTER: &str = "=====================================";

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("failed to write event log: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error("event log writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Writes webhook deliveries to dated files under a fixed directory.
///
/// Appends from concurrent requests are serialized through an in-process lock
/// and each record goes out in a single `write_all` on an `O_APPEND` handle,
/// so records never interleave.
#[derive(Debug, Clone)]
pub struct EventLogger {
    dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl EventLogger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Log file for the UTC calendar day containing `at`.
    pub fn file_path(&self, at: OffsetDateTime) -> Result<PathBuf, EventLogError> {
        let date = at
            .to_offset(UtcOffset::UTC)
            .format(format_description!("[year]-[month]-[day]"))?;
        Ok(self.dir.join(format!("webhook_{date}.txt")))
    }

    /// Append `event` stamped with the current time.
    pub async fn append(&self, event: &Value) -> Result<PathBuf, EventLogError> {
        self.append_at(event, OffsetDateTime::now_utc()).await
    }

    /// Append `event` stamped with `at`. Returns the file written to.
    ///
    /// The future resolves only after the record has been handed to the OS.
    pub async fn append_at(
        &self,
        event: &Value,
        at: OffsetDateTime,
    ) -> Result<PathBuf, EventLogError> {
        let record = render_record(event, at)?;
        let path = self.file_path(at)?;

        let dir = self.dir.clone();
        let target = path.clone();
        let write_lock = Arc::clone(&self.write_lock);
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let _guard = write_lock.lock().unwrap_or_else(PoisonError::into_inner);
            std::fs::create_dir_all(&dir)?;
            let mut file = OpenOptions::new().create(true).append(true).open(&target)?;
            file.write_all(record.as_bytes())
        })
        .await??;

        Ok(path)
    }
}

/// Render one record: blank line, header with ISO-8601 UTC timestamp,
/// pretty-printed JSON, footer, blank line.
pub fn render_record(event: &Value, at: OffsetDateTime) -> Result<String, EventLogError> {
    let timestamp = at.to_offset(UtcOffset::UTC).format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))?;
    let body = serde_json::to_string_pretty(event)?;
    Ok(format!(
        "\n{RECORD_HEADER_PREFIX}{timestamp}{RECORD_HEADER_SUFFIX}\n{body}\n{RECORD_FOOTER}\n\n"
    ))
}
