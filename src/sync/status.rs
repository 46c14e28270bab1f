// src/sync/status.rs
// Shared SyncStatus enum used by the sync subsystem. Kept out of the UI module
// so sync logic doesn't depend on UI code.

#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Idle,
    Fetching,
    Saving,
    Deleting,
    Error(String),
}

impl Default for SyncStatus {
    fn default() -> Self {
        SyncStatus::Idle
    }
}

impl SyncStatus {
    pub fn label(&self) -> &str {
        match self {
            SyncStatus::Idle => "Idle",
            SyncStatus::Fetching => "Fetching",
            SyncStatus::Saving => "Saving",
            SyncStatus::Deleting => "Deleting",
            SyncStatus::Error(_) => "Error",
        }
    }
}
