use crate::error::ScribeError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// One complete line of the log, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// 1-based position in the source.
    pub number: u64,
    pub text: String,
}

/// Follows a growing log file from its first byte.
///
/// History already in the file is replayed, then the reader waits for new
/// data by polling. A line is handed out only once its newline has been
/// written, and never twice.
pub struct LogReader {
    path: PathBuf,
    reader: BufReader<File>,
    partial: Vec<u8>,
    poll_interval: Duration,
    lines_read: u64,
}

impl LogReader {
    pub async fn open(path: &Path, poll_interval: Duration) -> Result<Self, ScribeError> {
        let file = File::open(path)
            .await
            .map_err(|e| ScribeError::source_unavailable(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            partial: Vec::new(),
            poll_interval,
            lines_read: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Next complete line, waiting for the file to grow if needed.
    ///
    /// Returns `Ok(None)` only once `cancel` has fired.
    pub async fn next_line(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Option<LogLine>, ScribeError> {
        loop {
            if cancel.is_cancelled() {
                return Ok(None);
            }

            self.reader
                .read_until(b'\n', &mut self.partial)
                .await
                .map_err(|e| ScribeError::source_unavailable(&self.path, e))?;

            if self.partial.last() == Some(&b'\n') {
                let raw = std::mem::take(&mut self.partial);
                self.lines_read += 1;
                return Ok(Some(LogLine {
                    number: self.lines_read,
                    text: decode_line(&raw),
                }));
            }

            // End of data for now; anything in `partial` waits for its newline.
            self.ensure_available().await?;
            tokio::select! {
                _ = cancel.cancelled() => return Ok(None),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    async fn ensure_available(&self) -> Result<(), ScribeError> {
        tokio::fs::metadata(&self.path)
            .await
            .map(|_| ())
            .map_err(|e| ScribeError::source_unavailable(&self.path, e))
    }
}

fn decode_line(raw: &[u8]) -> String {
    let trimmed = raw.strip_suffix(b"\n").unwrap_or(raw);
    let trimmed = trimmed.strip_suffix(b"\r").unwrap_or(trimmed);
    String::from_utf8_lossy(trimmed).into_owned()
}

/// Make sure the log exists so the reader can open it before the driver has
/// written anything. Existing content is left untouched.
pub async fn ensure_log_source(path: &Path) -> Result<(), ScribeError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ScribeError::source_unavailable(path, e))?;
    }
    tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map(|_| ())
        .map_err(|e| ScribeError::source_unavailable(path, e))
}
