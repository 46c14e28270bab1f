// src/tree/expand.rs

//! Per-node expand/collapse state for the tree and chart panes.
//!
//! View-local concern only: the map is reseeded to all-collapsed after
//! every successful rebuild and mutated purely by user toggles.

use std::collections::HashMap;

use super::build::OrgNode;

/// Mapping node id -> collapsed flag (`true` = collapsed).  Ids not present
/// are treated as collapsed, which is also the seeded default.
#[derive(Debug, Default)]
pub struct ExpansionState {
    collapsed: HashMap<String, bool>,
}

impl ExpansionState {
    /// Reseed after a rebuild: every real node starts collapsed.
    pub fn reset(&mut self, roots: &[OrgNode]) {
        self.collapsed.clear();
        for root in roots {
            self.seed(root);
        }
    }

    fn seed(&mut self, node: &OrgNode) {
        self.collapsed.insert(node.id.clone(), true);
        for child in &node.children {
            self.seed(child);
        }
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.get(id).copied().unwrap_or(true)
    }

    /// Open a single node.  Descendants keep their own stored state, so a
    /// freshly revealed subtree shows up collapsed.
    pub fn expand(&mut self, id: &str) {
        self.collapsed.insert(id.to_string(), false);
    }

    /// Close a node and force-close its entire descendant set, so that
    /// re-expanding the parent later never reveals a leftover open subtree.
    pub fn collapse(&mut self, node: &OrgNode) {
        for id in node.subtree_ids() {
            self.collapsed.insert(id, true);
        }
    }

    pub fn toggle(&mut self, node: &OrgNode) {
        if self.is_collapsed(&node.id) {
            self.expand(&node.id);
        } else {
            self.collapse(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build::build_forest;
    use crate::tree::row::OrgRow;

    fn forest() -> Vec<OrgNode> {
        let rows: Vec<OrgRow> = [("a", None), ("b", Some("a")), ("c", Some("b"))]
            .iter()
            .map(|(id, parent)| OrgRow {
                id: id.to_string(),
                parent_id: parent.map(|p| p.to_string()),
                name: id.to_string(),
                slug: id.to_string(),
                ..OrgRow::default()
            })
            .collect();
        build_forest(&rows, "Anjab").unwrap()
    }

    #[test]
    fn every_node_starts_collapsed_after_reset() {
        let roots = forest();
        let mut state = ExpansionState::default();
        state.reset(&roots);
        for id in ["a", "b", "c"] {
            assert!(state.is_collapsed(id));
        }
    }

    #[test]
    fn expanding_a_node_leaves_descendants_collapsed() {
        let roots = forest();
        let mut state = ExpansionState::default();
        state.reset(&roots);
        state.expand("a");
        assert!(!state.is_collapsed("a"));
        assert!(state.is_collapsed("b"));
    }

    #[test]
    fn collapsing_cascades_over_the_whole_subtree() {
        let roots = forest();
        let mut state = ExpansionState::default();
        state.reset(&roots);
        state.expand("a");
        state.expand("b");
        // Collapse the root: b must not stay expanded underneath.
        state.collapse(&roots[0]);
        assert!(state.is_collapsed("a"));
        assert!(state.is_collapsed("b"));
        assert!(state.is_collapsed("c"));
    }

    #[test]
    fn toggle_flips_between_expand_and_cascading_collapse() {
        let roots = forest();
        let mut state = ExpansionState::default();
        state.reset(&roots);
        state.toggle(&roots[0]);
        assert!(!state.is_collapsed("a"));
        state.expand("b");
        state.toggle(&roots[0]);
        assert!(state.is_collapsed("a"));
        assert!(state.is_collapsed("b"));
    }

    #[test]
    fn unknown_ids_default_to_collapsed() {
        let state = ExpansionState::default();
        assert!(state.is_collapsed("never-seen"));
    }
}
