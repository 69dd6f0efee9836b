//! Follows a single append-only file.
//!
//! # Responsibilities
//! - Wait (by polling) until the watched file exists
//! - Start at end-of-file on the first open, so only new lines are observed
//! - Hand out complete, newline-terminated lines one at a time
//! - Reopen from offset 0 when the file is rotated or truncated

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader, SeekFrom};
use tokio::time::sleep;

/// Device and inode of an open file. `None` on platforms without them.
type FileIdentity = Option<(u64, u64)>;

#[cfg(unix)]
fn file_identity(meta: &Metadata) -> FileIdentity {
    use std::os::unix::fs::MetadataExt;
    Some((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn file_identity(_meta: &Metadata) -> FileIdentity {
    None
}

pub struct Tailer {
    path: PathBuf,
    poll_interval: Duration,
    reader: BufReader<File>,
    identity: FileIdentity,
    /// Byte offset of the cursor, including any buffered partial line.
    offset: u64,
    /// Bytes of a line whose newline has not been written yet.
    pending: Vec<u8>,
}

impl Tailer {
    /// Wait for `path` to exist, then open it positioned at end-of-file.
    ///
    /// Polls every `poll_interval` with no upper bound.
    pub async fn open(path: impl Into<PathBuf>, poll_interval: Duration) -> io::Result<Self> {
        let path = path.into();

        let mut file = loop {
            match File::open(&path).await {
                Ok(file) => break file,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::info!(path = %path.display(), "Waiting for log file to be created...");
                    sleep(poll_interval).await;
                }
                Err(e) => return Err(e),
            }
        };

        let identity = file_identity(&file.metadata().await?);
        let offset = file.seek(SeekFrom::End(0)).await?;
        tracing::info!(path = %path.display(), offset, "Log file found, starting to tail");

        Ok(Self {
            path,
            poll_interval,
            reader: BufReader::new(file),
            identity,
            offset,
            pending: Vec::new(),
        })
    }

    /// Wait for and return the next complete line, without its terminator.
    pub async fn next_line(&mut self) -> io::Result<String> {
        loop {
            let read = self.reader.read_until(b'\n', &mut self.pending).await?;
            self.offset += read as u64;

            if self.pending.last() == Some(&b'\n') {
                let raw = std::mem::take(&mut self.pending);
                let line = String::from_utf8_lossy(&raw);
                return Ok(line.trim_end_matches(['\n', '\r']).to_string());
            }

            // At end-of-file without a complete line.
            if self.reopen_if_replaced().await? {
                continue;
            }
            sleep(self.poll_interval).await;
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current cursor position in the open file.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    async fn reopen_if_replaced(&mut self) -> io::Result<bool> {
        let meta = match fs::metadata(&self.path).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "Log file unavailable; keeping current handle");
                return Ok(false);
            }
        };

        let rotated = file_identity(&meta) != self.identity;
        let truncated = meta.len() < self.offset;
        if !rotated && !truncated {
            return Ok(false);
        }

        tracing::warn!(
            path = %self.path.display(),
            previous_offset = self.offset,
            current_size = meta.len(),
            rotated,
            truncated,
            "Log file replaced; reopening from the start"
        );

        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        self.identity = file_identity(&file.metadata().await?);
        self.reader = BufReader::new(file);
        self.offset = 0;
        self.pending.clear();
        Ok(true)
    }
}
