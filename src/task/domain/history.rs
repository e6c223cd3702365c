//! Append-only status history entries.

use super::{HistoryEntryId, TaskId, TaskStatus};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};

/// One recorded status change. Entries are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistoryEntry {
    id: HistoryEntryId,
    task_id: TaskId,
    from_status: TaskStatus,
    to_status: TaskStatus,
    changed_by: UserId,
    changed_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted entry identifier.
    pub id: HistoryEntryId,
    /// Task the entry belongs to.
    pub task_id: TaskId,
    /// Status before the change.
    pub from_status: TaskStatus,
    /// Status after the change.
    pub to_status: TaskStatus,
    /// Acting user.
    pub changed_by: UserId,
    /// Time of the change.
    pub changed_at: DateTime<Utc>,
}

impl StatusHistoryEntry {
    pub(super) fn record(
        task_id: TaskId,
        from_status: TaskStatus,
        to_status: TaskStatus,
        changed_by: UserId,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            task_id,
            from_status,
            to_status,
            changed_by,
            changed_at,
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            from_status: data.from_status,
            to_status: data.to_status,
            changed_by: data.changed_by,
            changed_at: data.changed_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the task the entry belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the status before the change.
    #[must_use]
    pub const fn from_status(&self) -> TaskStatus {
        self.from_status
    }

    /// Returns the status after the change.
    #[must_use]
    pub const fn to_status(&self) -> TaskStatus {
        self.to_status
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn changed_by(&self) -> UserId {
        self.changed_by
    }

    /// Returns the time of the change.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}
