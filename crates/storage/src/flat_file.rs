//! CSV-backed leaderboard: one `Name,Score,Game` table, loaded in full on read.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::LeaderboardEntry;
use thiserror::Error;

use crate::repository::{LeaderboardRepository, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CsvInitError {
    #[error("cannot prepare leaderboard directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Leaderboard stored in a flat CSV file.
///
/// Writers in this process are serialized by a lock, and each row is
/// written with a single append so concurrent processes do not interleave
/// partial records. File access runs on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct CsvLeaderboard {
    file: Arc<CsvFile>,
}

#[derive(Debug)]
struct CsvFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

fn csv_err(e: csv::Error) -> StorageError {
    if e.is_io_error() {
        StorageError::Io(e.to_string())
    } else {
        StorageError::Serialization(e.to_string())
    }
}

fn io_err(e: std::io::Error) -> StorageError {
    StorageError::Io(e.to_string())
}

fn join_err(e: tokio::task::JoinError) -> StorageError {
    StorageError::Io(e.to_string())
}

/// Whether a non-empty file's last byte is something other than `\n`.
fn missing_final_newline(file: &mut File, len: u64) -> std::io::Result<bool> {
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl CsvLeaderboard {
    /// Prepare a CSV leaderboard at `path`. The file itself is created on first write.
    ///
    /// # Errors
    ///
    /// Returns `CsvInitError::Directory` if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CsvInitError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CsvInitError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self {
            file: Arc::new(CsvFile {
                path,
                write_lock: Mutex::new(()),
            }),
        })
    }
}

impl CsvFile {
    fn encode_row(entry: &LeaderboardEntry, with_header: bool) -> Result<Vec<u8>, StorageError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(with_header)
            .from_writer(Vec::new());
        writer.serialize(entry).map_err(csv_err)?;
        writer
            .into_inner()
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn append(&self, entry: &LeaderboardEntry) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();

        // A hand-edited file may lack its final newline; the row must not
        // be glued onto the last record.
        let mut row = Vec::new();
        if missing_final_newline(&mut file, len).map_err(io_err)? {
            row.push(b'\n');
        }
        row.extend(Self::encode_row(entry, len == 0)?);
        file.write_all(&row).map_err(io_err)?;
        file.flush().map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), "appended leaderboard row");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(csv_err)?;
        let mut out = Vec::new();
        for row in reader.deserialize::<LeaderboardEntry>() {
            let entry = row.map_err(csv_err)?;
            if entry.is_valid() {
                out.push(entry);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl LeaderboardRepository for CsvLeaderboard {
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StorageError> {
        let file = Arc::clone(&self.file);
        let entry = entry.clone();
        tokio::task::spawn_blocking(move || file.append(&entry))
            .await
            .map_err(join_err)?
    }

    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.read_all())
            .await
            .map_err(join_err)?
    }
}
