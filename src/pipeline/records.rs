//! Description records and the newest-first store that holds them.
//!
//! [`RecordStatus`] is each record's lifecycle:
//!
//! ```text
//! Pending ──description arrived──▶ Ready
//!         ──request failed───────▶ Failed
//! ```
//!
//! Both arrows fire at most once per record. [`RecordStore`] keeps records
//! in submission order, newest first, and only ever updates a record found
//! by its [`RecordId`], never by position, so concurrent completions cannot
//! land on the wrong record.
//!
//! [`SharedRecords`] is a type alias for `Arc<Mutex<RecordStore>>`, owned by
//! the pipeline; the host only sees cloned snapshots.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// Opaque, unique record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// RecordStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RecordStatus {
    /// Waiting for the vision service.
    #[default]
    Pending,
    /// The description text is available.
    Ready,
    /// The request failed; the description holds a readable explanation.
    Failed,
}

impl RecordStatus {
    /// `true` once the record can no longer change.
    ///
    /// ```
    /// use image_narrator::pipeline::RecordStatus;
    ///
    /// assert!(!RecordStatus::Pending.is_terminal());
    /// assert!(RecordStatus::Ready.is_terminal());
    /// assert!(RecordStatus::Failed.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RecordStatus::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "Analysing",
            RecordStatus::Ready => "Ready",
            RecordStatus::Failed => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// DescriptionRecord
// ---------------------------------------------------------------------------

/// One submitted image and what became of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptionRecord {
    /// Assigned at creation, never changes.
    pub id: RecordId,
    /// Name of the submitted file.
    pub file_name: String,
    /// Empty while pending; the description or a failure message afterwards.
    pub description: String,
    /// When the file was accepted.
    pub timestamp: DateTime<Utc>,
    pub status: RecordStatus,
}

impl DescriptionRecord {
    /// A fresh `Pending` record stamped with the current time.
    pub fn pending(file_name: &str) -> Self {
        Self {
            id: RecordId::new(),
            file_name: file_name.to_string(),
            description: String::new(),
            timestamp: Utc::now(),
            status: RecordStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }
}

// ---------------------------------------------------------------------------
// RecordError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("no record with id {0}")]
    NotFound(RecordId),

    #[error("record {id} already completed as {status:?}")]
    AlreadyCompleted { id: RecordId, status: RecordStatus },
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// Newest-first collection of records, updated in place by id.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: VecDeque<DescriptionRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a record at the front of the collection.
    pub fn insert(&mut self, record: DescriptionRecord) -> RecordId {
        debug_assert!(self.get(record.id).is_none(), "duplicate record id");
        let id = record.id;
        self.records.push_front(record);
        id
    }

    /// `Pending → Ready` with the description text.
    pub fn mark_ready(&mut self, id: RecordId, description: &str) -> Result<(), RecordError> {
        self.resolve(id, RecordStatus::Ready, description)
    }

    /// `Pending → Failed` with a readable message.
    pub fn mark_failed(&mut self, id: RecordId, message: &str) -> Result<(), RecordError> {
        self.resolve(id, RecordStatus::Failed, message)
    }

    fn resolve(
        &mut self,
        id: RecordId,
        status: RecordStatus,
        description: &str,
    ) -> Result<(), RecordError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RecordError::NotFound(id))?;

        if record.status.is_terminal() {
            return Err(RecordError::AlreadyCompleted {
                id,
                status: record.status,
            });
        }

        record.status = status;
        record.description = description.to_string();
        Ok(())
    }

    pub fn get(&self, id: RecordId) -> Option<&DescriptionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The most recently submitted record.
    pub fn latest(&self) -> Option<&DescriptionRecord> {
        self.records.front()
    }

    /// Records, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &DescriptionRecord> {
        self.records.iter()
    }

    /// Owned copy of every record, newest first.
    pub fn snapshot(&self) -> Vec<DescriptionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records still waiting on the service.
    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_pending()).count()
    }
}

// ---------------------------------------------------------------------------
// SharedRecords
// ---------------------------------------------------------------------------

/// Handle to the record store shared by in-flight requests.
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedRecords = Arc<Mutex<RecordStore>>;

pub fn new_shared_records() -> SharedRecords {
    Arc::new(Mutex::new(RecordStore::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
