// src/ui/app.rs

//! Event handling for the terminal UI.
//!
//! `App` owns the [`UiState`] and the command channel to the sync manager.
//! It never talks to the server itself: every mutation goes out as a
//! [`SyncCommand`] and comes back as a [`SyncEvent`] carrying fresh rows.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::warn;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::sync::messages::{SyncCommand, SyncEvent};
use crate::tree::parent_options;

use super::state::{FormField, ModalState, NodeForm, Pane, UiState};

pub struct App {
    pub state: UiState,
    pub config: Config,
    cmd_tx: mpsc::UnboundedSender<SyncCommand>,
}

impl App {
    pub fn new(config: Config, cmd_tx: mpsc::UnboundedSender<SyncCommand>) -> Self {
        App {
            state: UiState::default(),
            config,
            cmd_tx,
        }
    }

    fn send(&self, cmd: SyncCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("UI: Sync manager is gone, command dropped");
        }
    }

    /// Fold one manager event into the UI state.
    pub fn apply_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::RowsLoaded { generation, rows } => {
                self.state.commit_rows(
                    generation,
                    rows,
                    &self.config.path_prefix,
                    &self.config.depth_override_keyword,
                );
            }
            SyncEvent::LoadFailed(msg) => {
                self.state.loading = false;
                self.state.last_error = Some(msg);
            }
            SyncEvent::NodeAdded { parent_id } => {
                // Reveal the new child once the refetch lands.
                self.state.pending_expand = parent_id;
            }
            SyncEvent::NodeUpdated { .. } | SyncEvent::SubtreeDeleted { .. } => {
                // The follow-up refetch carries the real state.
            }
            SyncEvent::MutationFailed(msg) => {
                self.state.modal = ModalState::Error(msg);
            }
            SyncEvent::StatusUpdate(status) => {
                self.state.sync_status = status;
            }
        }
    }

    /// Debounced work; called once per poll interval.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.state.search_deadline {
            if now >= deadline {
                self.state.search_deadline = None;
                self.state.run_search();
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if !matches!(self.state.modal, ModalState::None) {
            self.handle_modal_key(key);
            return;
        }
        if self.state.search_open {
            self.handle_search_key(key);
            return;
        }
        if self.state.chart_filter_editing {
            self.handle_chart_filter_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Tab => {
                self.state.focus = match self.state.focus {
                    Pane::Tree => Pane::Chart,
                    Pane::Chart => Pane::Tree,
                };
            }
            KeyCode::Char('r') => self.send(SyncCommand::Reload),
            KeyCode::Char('s') => {
                self.state.scope = self.state.scope.next();
                self.rebuild_view();
            }
            KeyCode::Char('/') => match self.state.focus {
                Pane::Tree => {
                    self.state.search_open = true;
                    self.state.search_query.clear();
                    self.state.search_selected = 0;
                    // Empty query still shows the default first page.
                    self.state.run_search();
                }
                Pane::Chart => {
                    self.state.chart_filter_editing = true;
                }
            },
            _ => match self.state.focus {
                Pane::Tree => self.handle_tree_key(key),
                Pane::Chart => self.handle_chart_key(key),
            },
        }
    }

    fn rebuild_view(&mut self) {
        let prefix = self.config.path_prefix.clone();
        let keyword = self.config.depth_override_keyword.clone();
        self.state.rebuild_view(&prefix, &keyword);
    }

    fn handle_tree_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.state.selected = self.state.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let len = self.state.visible_rows().len();
                if self.state.selected + 1 < len {
                    self.state.selected += 1;
                }
            }
            KeyCode::Right | KeyCode::Enter => {
                if let Some(sel) = self.state.selected_row() {
                    if sel.has_children {
                        self.state.expansion.expand(&sel.id);
                    }
                }
            }
            KeyCode::Left => {
                if let Some(sel) = self.state.selected_row() {
                    if let Some(node) = self.state.find_node(&sel.id) {
                        let node = node.clone();
                        self.state.expansion.collapse(&node);
                    }
                }
            }
            KeyCode::Char(' ') => {
                if let Some(sel) = self.state.selected_row() {
                    if let Some(node) = self.state.find_node(&sel.id) {
                        let node = node.clone();
                        self.state.expansion.toggle(&node);
                    }
                }
            }
            KeyCode::Char('a') => {
                if let Some(sel) = self.state.selected_row() {
                    let level = self
                        .state
                        .find_row(&sel.id)
                        .map(|r| r.level + 1)
                        .unwrap_or(1);
                    self.state.modal = ModalState::Add {
                        parent_id: Some(sel.id),
                        parent_name: Some(sel.name),
                        form: NodeForm::for_new_child(level),
                    };
                }
            }
            KeyCode::Char('A') => {
                self.state.modal = ModalState::Add {
                    parent_id: None,
                    parent_name: None,
                    form: NodeForm::for_new_child(1),
                };
            }
            KeyCode::Char('e') => {
                if let Some(sel) = self.state.selected_row() {
                    if let Some(row) = self.state.find_row(&sel.id) {
                        let form = NodeForm::from_row(row);
                        let current_parent = row.parent_id.clone();
                        let parents = parent_options(&self.state.rows, &sel.id);
                        let parent_idx = parents
                            .iter()
                            .position(|p| p.id == current_parent)
                            .unwrap_or(0);
                        self.state.modal = ModalState::Edit {
                            id: sel.id,
                            form,
                            parents,
                            parent_idx,
                        };
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(sel) = self.state.selected_row() {
                    let subtree_size = self
                        .state
                        .find_node(&sel.id)
                        .map(|n| n.subtree_ids().len())
                        .unwrap_or(1);
                    self.state.modal = ModalState::ConfirmDelete {
                        id: sel.id,
                        name: sel.name,
                        subtree_size,
                    };
                }
            }
            _ => {}
        }
    }

    fn handle_chart_key(&mut self, key: KeyEvent) {
        let len = self.state.chart_lines().len();
        match key.code {
            KeyCode::Up => {
                self.state.chart_selected = self.state.chart_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.state.chart_selected + 1 < len {
                    self.state.chart_selected += 1;
                }
            }
            KeyCode::PageUp => {
                self.state.chart_selected = self.state.chart_selected.saturating_sub(10);
            }
            KeyCode::PageDown => {
                let target = self.state.chart_selected.saturating_add(10);
                self.state.chart_selected = if len == 0 {
                    0
                } else {
                    target.min(len - 1)
                };
            }
            KeyCode::Right | KeyCode::Enter => {
                if let Some((id, has_children)) = self.state.selected_chart_unit() {
                    if has_children {
                        self.state.expansion.expand(&id);
                    }
                }
            }
            KeyCode::Left => {
                if let Some((id, _)) = self.state.selected_chart_unit() {
                    if let Some(node) = self.state.find_node(&id) {
                        let node = node.clone();
                        self.state.expansion.collapse(&node);
                        self.state.clamp_selection();
                    }
                }
            }
            KeyCode::Char(' ') => {
                if let Some((id, _)) = self.state.selected_chart_unit() {
                    if let Some(node) = self.state.find_node(&id) {
                        let node = node.clone();
                        self.state.expansion.toggle(&node);
                        self.state.clamp_selection();
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_chart_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.chart_filter_editing = false;
                self.state.chart_query.clear();
                self.rebuild_view();
            }
            KeyCode::Enter => {
                self.state.chart_filter_editing = false;
            }
            KeyCode::Backspace => {
                self.state.chart_query.pop();
                self.rebuild_view();
            }
            KeyCode::Char(c) => {
                self.state.chart_query.push(c);
                self.rebuild_view();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.search_open = false;
                self.state.search_deadline = None;
            }
            KeyCode::Up => {
                self.state.search_selected = self.state.search_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.state.search_selected + 1 < self.state.search_results.len() {
                    self.state.search_selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(hit) = self
                    .state
                    .search_results
                    .get(self.state.search_selected)
                    .cloned()
                {
                    self.state.search_open = false;
                    self.state.search_deadline = None;
                    self.state.focus = Pane::Tree;
                    self.state.expand_to(&hit.id);
                    self.state.select_id(&hit.id);
                }
            }
            KeyCode::Backspace => {
                self.state.search_query.pop();
                self.arm_search_debounce();
            }
            KeyCode::Char(c) => {
                self.state.search_query.push(c);
                self.arm_search_debounce();
            }
            _ => {}
        }
    }

    // Queries run 120ms after the last keystroke, not on every one.
    fn arm_search_debounce(&mut self) {
        self.state.search_deadline =
            Some(Instant::now() + std::time::Duration::from_millis(120));
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let modal = std::mem::take(&mut self.state.modal);
        match modal {
            ModalState::None => {}
            ModalState::Error(_) => {
                // Any key dismisses; the modal stays taken.
            }
            ModalState::ConfirmDelete {
                id,
                name,
                subtree_size,
            } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.send(SyncCommand::DeleteSubtree { id });
                }
                KeyCode::Esc | KeyCode::Char('n') => {}
                _ => {
                    self.state.modal = ModalState::ConfirmDelete {
                        id,
                        name,
                        subtree_size,
                    };
                }
            },
            ModalState::Add {
                parent_id,
                parent_name,
                mut form,
            } => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => {
                    if form.is_valid() {
                        let payload = form.to_payload(parent_id.clone());
                        self.send(SyncCommand::AddChild { parent_id, payload });
                    } else {
                        self.state.modal = ModalState::Add {
                            parent_id,
                            parent_name,
                            form,
                        };
                    }
                }
                code => {
                    match code {
                        KeyCode::Tab | KeyCode::Down => {
                            form.field = form.field.next();
                            // The add modal has no parent picker.
                            if form.field == FormField::Parent {
                                form.field = form.field.next();
                            }
                        }
                        KeyCode::BackTab | KeyCode::Up => {
                            form.field = form.field.prev();
                            if form.field == FormField::Parent {
                                form.field = form.field.prev();
                            }
                        }
                        KeyCode::Left => form.cycle(false),
                        KeyCode::Right => form.cycle(true),
                        KeyCode::Backspace => form.backspace(),
                        KeyCode::Char(c) => form.type_char(c),
                        _ => {}
                    }
                    self.state.modal = ModalState::Add {
                        parent_id,
                        parent_name,
                        form,
                    };
                }
            },
            ModalState::Edit {
                id,
                mut form,
                parents,
                mut parent_idx,
            } => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => {
                    if form.is_valid() {
                        let parent_id = parents
                            .get(parent_idx)
                            .and_then(|p| p.id.clone());
                        let payload = form.to_payload(parent_id);
                        self.send(SyncCommand::UpdateNode { id, payload });
                    } else {
                        self.state.modal = ModalState::Edit {
                            id,
                            form,
                            parents,
                            parent_idx,
                        };
                    }
                }
                code => {
                    match code {
                        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
                        KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
                        KeyCode::Left => {
                            if form.field == FormField::Parent {
                                parent_idx = parent_idx.saturating_sub(1);
                            } else {
                                form.cycle(false);
                            }
                        }
                        KeyCode::Right => {
                            if form.field == FormField::Parent {
                                if parent_idx + 1 < parents.len() {
                                    parent_idx += 1;
                                }
                            } else {
                                form.cycle(true);
                            }
                        }
                        KeyCode::Backspace => form.backspace(),
                        KeyCode::Char(c) => form.type_char(c),
                        _ => {}
                    }
                    self.state.modal = ModalState::Edit {
                        id,
                        form,
                        parents,
                        parent_idx,
                    };
                }
            },
        }
    }
}
