// src/sync/manager.rs

//! Main manager for the organisation data lifecycle.
//!
//! Owns the only path to the server: the UI sends [`SyncCommand`]s over a
//! channel and receives [`SyncEvent`]s back. Mutations are awaited inline so
//! they apply in the order the user issued them; each successful mutation is
//! followed by a full refetch rather than a local patch. Fetches run as
//! spawned tasks and are stamped with a generation counter so the UI can
//! discard responses that arrive out of order.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use tokio::sync::mpsc;

use super::api::OrgStore;
use super::messages::{SyncCommand, SyncEvent};
use super::status::SyncStatus;

fn send_status(ui_tx: &mpsc::UnboundedSender<SyncEvent>, status: SyncStatus) {
    let _ = ui_tx.send(SyncEvent::StatusUpdate(status));
}

fn spawn_fetch(
    store: &Arc<dyn OrgStore>,
    ui_tx: &mpsc::UnboundedSender<SyncEvent>,
    generation: &mut u64,
) {
    *generation += 1;
    let gen = *generation;
    let store = Arc::clone(store);
    let ui_tx = ui_tx.clone();
    send_status(&ui_tx, SyncStatus::Fetching);
    tokio::spawn(async move {
        match store.fetch_rows().await {
            Ok(rows) => {
                info!("Sync: Fetched {} rows (generation {})", rows.len(), gen);
                let _ = ui_tx.send(SyncEvent::RowsLoaded {
                    generation: gen,
                    rows,
                });
                send_status(&ui_tx, SyncStatus::Idle);
            }
            Err(e) => {
                let err_msg = format!("Failed to fetch organisation rows: {:#}", e);
                error!("Sync: {}", err_msg);
                let _ = ui_tx.send(SyncEvent::LoadFailed(err_msg.clone()));
                send_status(&ui_tx, SyncStatus::Error(err_msg));
            }
        }
    });
}

pub async fn run_sync_manager(
    store: Arc<dyn OrgStore>,
    ui_tx: mpsc::UnboundedSender<SyncEvent>,
    mut cmd_rx: mpsc::UnboundedReceiver<SyncCommand>,
) -> Result<()> {
    let mut generation: u64 = 0;

    info!("Sync: Manager started");

    // Load rows immediately so the UI has a tree before the first keypress.
    spawn_fetch(&store, &ui_tx, &mut generation);

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            SyncCommand::Reload => {
                info!("Sync: Reload requested");
                spawn_fetch(&store, &ui_tx, &mut generation);
            }
            SyncCommand::AddChild { parent_id, payload } => {
                info!(
                    "Sync: Add child requested under parent {:?}",
                    parent_id.as_deref().unwrap_or("<root>")
                );
                send_status(&ui_tx, SyncStatus::Saving);
                match store.create_node(&payload).await {
                    Ok(created) => {
                        info!("Sync: Created node {}", created.id);
                        let _ = ui_tx.send(SyncEvent::NodeAdded { parent_id });
                        spawn_fetch(&store, &ui_tx, &mut generation);
                    }
                    Err(e) => {
                        let err_msg = format!("Failed to create node: {:#}", e);
                        error!("Sync: {}", err_msg);
                        let _ = ui_tx.send(SyncEvent::MutationFailed(err_msg.clone()));
                        send_status(&ui_tx, SyncStatus::Error(err_msg));
                    }
                }
            }
            SyncCommand::UpdateNode { id, payload } => {
                info!("Sync: Update requested for node {}", id);
                send_status(&ui_tx, SyncStatus::Saving);
                match store.update_node(&id, &payload).await {
                    Ok(()) => {
                        let _ = ui_tx.send(SyncEvent::NodeUpdated { id });
                        spawn_fetch(&store, &ui_tx, &mut generation);
                    }
                    Err(e) => {
                        let err_msg = format!("Failed to update node {}: {:#}", id, e);
                        error!("Sync: {}", err_msg);
                        let _ = ui_tx.send(SyncEvent::MutationFailed(err_msg.clone()));
                        send_status(&ui_tx, SyncStatus::Error(err_msg));
                    }
                }
            }
            SyncCommand::DeleteSubtree { id } => {
                info!("Sync: Delete requested for node {} and its subtree", id);
                send_status(&ui_tx, SyncStatus::Deleting);
                match store.delete_subtree(&id).await {
                    Ok(deleted) => {
                        info!("Sync: Deleted {} rows under {}", deleted, id);
                        let _ = ui_tx.send(SyncEvent::SubtreeDeleted { id, deleted });
                        spawn_fetch(&store, &ui_tx, &mut generation);
                    }
                    Err(e) => {
                        let err_msg = format!("Failed to delete node {}: {:#}", id, e);
                        error!("Sync: {}", err_msg);
                        let _ = ui_tx.send(SyncEvent::MutationFailed(err_msg.clone()));
                        send_status(&ui_tx, SyncStatus::Error(err_msg));
                    }
                }
            }
        }
    }

    info!("Sync: Command channel closed, manager exiting");
    Ok(())
}
