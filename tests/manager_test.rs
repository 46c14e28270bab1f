// tests/manager_test.rs

//! Drives the sync manager end to end against an in-memory store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use petasync::sync::api::{NodePayload, OrgStore};
use petasync::sync::manager::run_sync_manager;
use petasync::sync::messages::{SyncCommand, SyncEvent};
use petasync::tree::OrgRow;
use tokio::sync::mpsc;

struct MemStore {
    rows: Mutex<Vec<OrgRow>>,
    next_id: AtomicUsize,
    fail_mutations: AtomicBool,
}

impl MemStore {
    fn new(rows: Vec<OrgRow>) -> Arc<Self> {
        Arc::new(MemStore {
            rows: Mutex::new(rows),
            next_id: AtomicUsize::new(100),
            fail_mutations: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl OrgStore for MemStore {
    async fn fetch_rows(&self) -> Result<Vec<OrgRow>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create_node(&self, payload: &NodePayload) -> Result<OrgRow> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            bail!("store rejected the write");
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let row = OrgRow {
            id: id.clone(),
            parent_id: payload.parent_id.clone(),
            name: payload.name.clone(),
            slug: payload.slug.clone(),
            level: payload.level,
            ..OrgRow::default()
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update_node(&self, id: &str, payload: &NodePayload) -> Result<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            bail!("store rejected the write");
        }
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.name = payload.name.clone();
                row.slug = payload.slug.clone();
                row.parent_id = payload.parent_id.clone();
                Ok(())
            }
            None => bail!("no such row: {}", id),
        }
    }

    async fn delete_subtree(&self, id: &str) -> Result<u64> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            bail!("store rejected the write");
        }
        let mut rows = self.rows.lock().unwrap();
        let mut doomed = vec![id.to_string()];
        // Children are discovered breadth-first off the parent pointers.
        let mut frontier = vec![id.to_string()];
        while let Some(cur) = frontier.pop() {
            for row in rows.iter() {
                if row.parent_id.as_deref() == Some(cur.as_str()) {
                    doomed.push(row.id.clone());
                    frontier.push(row.id.clone());
                }
            }
        }
        let before = rows.len();
        rows.retain(|r| !doomed.contains(&r.id));
        Ok((before - rows.len()) as u64)
    }
}

fn row(id: &str, parent: Option<&str>, name: &str) -> OrgRow {
    OrgRow {
        id: id.to_string(),
        parent_id: parent.map(|p| p.to_string()),
        name: name.to_string(),
        slug: id.to_string(),
        ..OrgRow::default()
    }
}

fn start(
    store: Arc<MemStore>,
) -> (
    mpsc::UnboundedSender<SyncCommand>,
    mpsc::UnboundedReceiver<SyncEvent>,
) {
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_sync_manager(store, ui_tx, cmd_rx));
    (cmd_tx, ui_rx)
}

// Skip status chatter and return the next substantive event.
async fn next_event(rx: &mut mpsc::UnboundedReceiver<SyncEvent>) -> SyncEvent {
    loop {
        let ev = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for sync event")
            .expect("manager hung up");
        if !matches!(ev, SyncEvent::StatusUpdate(_)) {
            return ev;
        }
    }
}

async fn next_rows(rx: &mut mpsc::UnboundedReceiver<SyncEvent>) -> (u64, Vec<OrgRow>) {
    loop {
        if let SyncEvent::RowsLoaded { generation, rows } = next_event(rx).await {
            return (generation, rows);
        }
    }
}

#[tokio::test]
async fn manager_fetches_on_startup() {
    let store = MemStore::new(vec![row("1", None, "Root"), row("2", Some("1"), "Child")]);
    let (_cmd_tx, mut rx) = start(store);

    let (generation, rows) = next_rows(&mut rx).await;
    assert_eq!(generation, 1);
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn add_triggers_refetch_with_new_node() {
    let store = MemStore::new(vec![row("1", None, "Root")]);
    let (cmd_tx, mut rx) = start(Arc::clone(&store));
    let _ = next_rows(&mut rx).await;

    cmd_tx
        .send(SyncCommand::AddChild {
            parent_id: Some("1".to_string()),
            payload: NodePayload {
                parent_id: Some("1".to_string()),
                name: "Biro Baru".to_string(),
                slug: "biro-baru".to_string(),
                level: 2,
                ..NodePayload::default()
            },
        })
        .unwrap();

    match next_event(&mut rx).await {
        SyncEvent::NodeAdded { parent_id } => assert_eq!(parent_id.as_deref(), Some("1")),
        other => panic!("expected NodeAdded, got {:?}", other),
    }
    let (generation, rows) = next_rows(&mut rx).await;
    assert_eq!(generation, 2);
    assert!(rows.iter().any(|r| r.name == "Biro Baru"));
}

#[tokio::test]
async fn delete_removes_whole_subtree() {
    let store = MemStore::new(vec![
        row("1", None, "Root"),
        row("2", Some("1"), "Biro"),
        row("3", Some("2"), "Subbag"),
        row("4", Some("1"), "Biro Lain"),
    ]);
    let (cmd_tx, mut rx) = start(Arc::clone(&store));
    let _ = next_rows(&mut rx).await;

    cmd_tx
        .send(SyncCommand::DeleteSubtree {
            id: "2".to_string(),
        })
        .unwrap();

    match next_event(&mut rx).await {
        SyncEvent::SubtreeDeleted { id, deleted } => {
            assert_eq!(id, "2");
            assert_eq!(deleted, 2);
        }
        other => panic!("expected SubtreeDeleted, got {:?}", other),
    }

    // The refetched rows show no trace of the deleted branch.
    let (_, rows) = next_rows(&mut rx).await;
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "4"]);
}

#[tokio::test]
async fn failed_mutation_leaves_rows_untouched() {
    let store = MemStore::new(vec![row("1", None, "Root")]);
    let (cmd_tx, mut rx) = start(Arc::clone(&store));
    let _ = next_rows(&mut rx).await;

    store.fail_mutations.store(true, Ordering::SeqCst);
    cmd_tx
        .send(SyncCommand::DeleteSubtree {
            id: "1".to_string(),
        })
        .unwrap();

    match next_event(&mut rx).await {
        SyncEvent::MutationFailed(msg) => assert!(msg.contains("store rejected")),
        other => panic!("expected MutationFailed, got {:?}", other),
    }

    // A manual reload still sees the original row.
    store.fail_mutations.store(false, Ordering::SeqCst);
    cmd_tx.send(SyncCommand::Reload).unwrap();
    let (_, rows) = next_rows(&mut rx).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "1");
}

#[tokio::test]
async fn generations_increase_across_reloads() {
    let store = MemStore::new(vec![row("1", None, "Root")]);
    let (cmd_tx, mut rx) = start(store);

    let (g1, _) = next_rows(&mut rx).await;
    cmd_tx.send(SyncCommand::Reload).unwrap();
    let (g2, _) = next_rows(&mut rx).await;
    cmd_tx.send(SyncCommand::Reload).unwrap();
    let (g3, _) = next_rows(&mut rx).await;

    assert!(g1 < g2 && g2 < g3);
}
