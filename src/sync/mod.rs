// src/sync/mod.rs

// Declare sub-modules for sync logic
pub mod api;
pub mod http;
pub mod manager;
pub mod messages;
pub mod slug;
pub mod status;

pub use api::{NodePayload, OrgApi, OrgStore};
pub use manager::run_sync_manager;
pub use messages::{SyncCommand, SyncEvent};
pub use status::SyncStatus;
