use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::model::SubmissionRecord;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Fs(#[from] fsutil::Error),

    #[error("Storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Append-only history of judged submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn append(&self, record: SubmissionRecord) -> Result<()>;

    /// Most recent first.
    async fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>>;
}

fn most_recent_first(mut records: Vec<SubmissionRecord>, limit: usize) -> Vec<SubmissionRecord> {
    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    records.truncate(limit);
    records
}

/// One JSON record per line in a single file.
#[derive(Debug)]
pub struct JsonlStore {
    filepath: PathBuf,
    lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }
}

#[async_trait]
impl SubmissionStore for JsonlStore {
    async fn append(&self, record: SubmissionRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let filepath = self.filepath.clone();
        tokio::task::spawn_blocking(move || {
            fsutil::append_json_line_with_mkdir(&filepath, &record)
        })
        .await??;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>> {
        let _guard = self.lock.lock().await;
        let filepath = self.filepath.clone();
        let records: Vec<SubmissionRecord> =
            tokio::task::spawn_blocking(move || fsutil::read_json_lines(&filepath)).await??;
        Ok(most_recent_first(records, limit))
    }
}

/// Keeps records in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SubmissionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn append(&self, record: SubmissionRecord) -> Result<()> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>> {
        let records = self.records.lock().await.clone();
        Ok(most_recent_first(records, limit))
    }
}
