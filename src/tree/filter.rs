// src/tree/filter.rs

//! Row-level scope filtering and chart text filtering.

use std::collections::{HashMap, HashSet};

use super::build::OrgNode;
use super::row::OrgRow;

/// Which slice of the organisation the chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    /// Central-office units only (`is_pusat == true`).
    Pusat,
    /// Regional units only (`is_pusat == false`).
    Daerah,
}

impl Scope {
    pub fn label(self) -> &'static str {
        match self {
            Scope::All => "Semua",
            Scope::Pusat => "Pusat",
            Scope::Daerah => "Daerah",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Scope::All => Scope::Pusat,
            Scope::Pusat => Scope::Daerah,
            Scope::Daerah => Scope::All,
        }
    }
}

/// Restrict rows to a scope, keeping every ancestor of a kept row so the
/// result still forms connected trees.  Ancestors pulled in this way keep
/// their own data; only rows with no in-scope descendant are dropped.
pub fn filter_scope(rows: &[OrgRow], scope: Scope) -> Vec<OrgRow> {
    if scope == Scope::All {
        return rows.to_vec();
    }
    let by_id: HashMap<&str, &OrgRow> =
        rows.iter().map(|r| (r.id.as_str(), r)).collect();

    let mut keep: HashSet<&str> = HashSet::new();
    for row in rows {
        let in_scope = match scope {
            Scope::All => true,
            Scope::Pusat => row.is_pusat(),
            Scope::Daerah => !row.is_pusat(),
        };
        if !in_scope {
            continue;
        }
        // Walk up to the root, marking the whole ancestor chain.
        let mut cur = Some(row.id.as_str());
        while let Some(id) = cur {
            if !keep.insert(id) {
                break;
            }
            cur = by_id
                .get(id)
                .and_then(|r| r.parent_id.as_deref())
                .filter(|p| by_id.contains_key(p));
        }
    }

    rows.iter()
        .filter(|r| keep.contains(r.id.as_str()))
        .cloned()
        .collect()
}

/// Prune a forest down to nodes whose subtree contains a text match.  A
/// matching node keeps its entire subtree; a non-matching node survives only
/// as a connector to matching descendants.
pub fn filter_forest(roots: &[OrgNode], query: &str) -> Vec<OrgNode> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return roots.to_vec();
    }
    roots
        .iter()
        .filter_map(|root| prune(root, &needle))
        .collect()
}

fn prune(node: &OrgNode, needle: &str) -> Option<OrgNode> {
    if node_matches(node, needle) {
        return Some(node.clone());
    }
    let children: Vec<OrgNode> = node
        .children
        .iter()
        .filter_map(|c| prune(c, needle))
        .collect();
    if children.is_empty() {
        return None;
    }
    let mut kept = node.clone();
    kept.children = children;
    Some(kept)
}

fn node_matches(node: &OrgNode, needle: &str) -> bool {
    node.name.to_lowercase().contains(needle)
        || node
            .unit_kerja
            .as_deref()
            .map(|u| u.to_lowercase().contains(needle))
            .unwrap_or(false)
        || node.slug.to_lowercase().contains(needle)
}
