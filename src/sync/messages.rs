// src/sync/messages.rs

//! Defines the message types used for communication between the sync manager and UI

use crate::sync::api::NodePayload;
use crate::sync::status::SyncStatus;
use crate::tree::OrgRow;

/// Commands that can be sent from the UI to the Sync Manager
#[derive(Debug)]
pub enum SyncCommand {
    /// Fetch the full flat row set from the server
    Reload,

    /// Create a node under the given parent (None for a new root)
    AddChild {
        parent_id: Option<String>,
        payload: NodePayload,
    },

    /// Patch an existing node
    UpdateNode { id: String, payload: NodePayload },

    /// Delete a node and its whole subtree
    DeleteSubtree { id: String },
}

/// Events that can be sent from the Sync Manager to the UI
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A fetch completed. Stamped so the UI can drop stale responses that
    /// arrive out of order.
    RowsLoaded { generation: u64, rows: Vec<OrgRow> },

    /// A fetch failed; the UI keeps whatever rows it already has
    LoadFailed(String),

    /// A create succeeded; a refetch has already been scheduled
    NodeAdded { parent_id: Option<String> },

    /// A patch succeeded; a refetch has already been scheduled
    NodeUpdated { id: String },

    /// A delete succeeded, removing `deleted` rows server-side
    SubtreeDeleted { id: String, deleted: u64 },

    /// A create/patch/delete failed; no refetch is scheduled
    MutationFailed(String),

    /// Update about the overall sync status
    StatusUpdate(SyncStatus),
}
