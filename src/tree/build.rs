// src/tree/build.rs

//! Flat-to-tree construction.
//!
//! The API returns the whole organizational forest as a flat list of rows
//! with parent pointers.  This module groups the rows per parent, orders
//! every sibling group, and recursively builds an owned forest annotated
//! with slash-joined paths.  The forest is rebuilt wholesale after every
//! successful fetch; nothing here is ever patched in place.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::row::{JobTier, OrgRow};

/// A resolved node of the organizational forest.
#[derive(Debug, Clone)]
pub struct OrgNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub unit_kerja: Option<String>,
    /// Slash-joined slug chain from the forest root, e.g. `Anjab/setjen/biro-umum`.
    pub path: String,
    pub tier: JobTier,
    pub bezetting: Option<i64>,
    pub kebutuhan_pegawai: Option<i64>,
    pub kelas_jabatan: Option<String>,
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Ids of this node and every descendant, preorder.
    pub fn subtree_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_subtree_ids(self, &mut out);
        out
    }
}

fn collect_subtree_ids(node: &OrgNode, out: &mut Vec<String>) {
    out.push(node.id.clone());
    for child in &node.children {
        collect_subtree_ids(child, out);
    }
}

/// Errors from forest construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The `parent_id` graph contains a cycle; `id` is one node on it.
    CyclicHierarchy { id: String },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::CyclicHierarchy { id } => {
                write!(f, "cyclic parent_id chain involving node {}", id)
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// Sort a sibling group in place: `order_index` ascending with null/None
/// treated as 0, ties broken by case-insensitive name comparison.
pub fn order_siblings(rows: &mut [OrgRow]) {
    rows.sort_by(|a, b| {
        let ka = a.order_index.unwrap_or(0);
        let kb = b.order_index.unwrap_or(0);
        ka.cmp(&kb)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

/// Build the ordered forest from a flat row list.
///
/// Root paths are `{prefix}/{slug}` (or just the slug when the prefix is
/// empty); child paths append their own slug to the parent's path.
///
/// Rows whose `parent_id` chain ends at an id not present in the set are
/// orphans and are silently dropped.  Rows whose chain loops are a data
/// corruption the caller must hear about, so they fail the build with
/// [`TreeError::CyclicHierarchy`] instead of hanging the walk.
pub fn build_forest(rows: &[OrgRow], prefix: &str) -> Result<Vec<OrgNode>, TreeError> {
    let mut by_parent: HashMap<Option<String>, Vec<OrgRow>> = HashMap::new();
    for row in rows {
        by_parent
            .entry(row.parent_id.clone())
            .or_default()
            .push(row.clone());
    }
    for group in by_parent.values_mut() {
        order_siblings(group);
    }

    let mut attached: HashSet<String> = HashSet::new();
    let roots = by_parent
        .get(&None)
        .map(|group| {
            group
                .iter()
                .map(|row| build_node(row, None, prefix, &by_parent, &mut attached))
                .collect()
        })
        .unwrap_or_default();

    detect_cycles(rows, &attached)?;
    Ok(roots)
}

fn build_node(
    row: &OrgRow,
    parent_path: Option<&str>,
    prefix: &str,
    by_parent: &HashMap<Option<String>, Vec<OrgRow>>,
    attached: &mut HashSet<String>,
) -> OrgNode {
    let path = match parent_path {
        Some(p) => format!("{}/{}", p, row.slug),
        None if prefix.is_empty() => row.slug.clone(),
        None => format!("{}/{}", prefix, row.slug),
    };
    attached.insert(row.id.clone());

    let children = by_parent
        .get(&Some(row.id.clone()))
        .map(|group| {
            group
                .iter()
                .map(|child| build_node(child, Some(&path), prefix, by_parent, attached))
                .collect()
        })
        .unwrap_or_default();

    OrgNode {
        id: row.id.clone(),
        name: row.name.clone(),
        slug: row.slug.clone(),
        unit_kerja: row.unit_kerja.clone(),
        path,
        tier: row.tier(),
        bezetting: row.bezetting,
        kebutuhan_pegawai: row.kebutuhan_pegawai,
        kelas_jabatan: row.kelas_jabatan.clone(),
        children,
    }
}

/// Rows left unattached after the downward walk are either orphans (ancestor
/// chain falls off the row set) or sit on a parent cycle.  Orphans are
/// dropped per policy; cycles are an error.
fn detect_cycles(rows: &[OrgRow], attached: &HashSet<String>) -> Result<(), TreeError> {
    let by_id: HashMap<&str, &OrgRow> = rows.iter().map(|r| (r.id.as_str(), r)).collect();
    for row in rows {
        if attached.contains(&row.id) {
            continue;
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut cur = row.id.as_str();
        loop {
            if !seen.insert(cur) {
                return Err(TreeError::CyclicHierarchy {
                    id: cur.to_string(),
                });
            }
            match by_id.get(cur).and_then(|r| r.parent_id.as_deref()) {
                Some(parent) if by_id.contains_key(parent) => cur = parent,
                // Chain ends at a root or a missing parent: plain orphan.
                _ => break,
            }
        }
    }
    Ok(())
}

/// One selectable entry in the edit modal's parent picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentOption {
    /// `None` means "make this node a root".
    pub id: Option<String>,
    /// Name indented by depth, e.g. `— — Bagian Umum`.
    pub label: String,
}

/// Depth-indented list of valid new parents for `exclude_id`: every node in
/// preorder except the node itself and its descendants (a node may not be
/// re-parented into its own subtree).  The leading entry is the root choice.
pub fn parent_options(rows: &[OrgRow], exclude_id: &str) -> Vec<ParentOption> {
    let mut by_parent: HashMap<Option<String>, Vec<OrgRow>> = HashMap::new();
    for row in rows {
        by_parent
            .entry(row.parent_id.clone())
            .or_default()
            .push(row.clone());
    }
    for group in by_parent.values_mut() {
        order_siblings(group);
    }

    let mut excluded: HashSet<String> = HashSet::new();
    excluded.insert(exclude_id.to_string());
    collect_descendant_ids(exclude_id, &by_parent, &mut excluded);

    let mut out = vec![ParentOption {
        id: None,
        label: "-".to_string(),
    }];
    push_options(&None, 0, &by_parent, &excluded, &mut out);
    out
}

fn collect_descendant_ids(
    id: &str,
    by_parent: &HashMap<Option<String>, Vec<OrgRow>>,
    out: &mut HashSet<String>,
) {
    if let Some(kids) = by_parent.get(&Some(id.to_string())) {
        for child in kids {
            if out.insert(child.id.clone()) {
                collect_descendant_ids(&child.id, by_parent, out);
            }
        }
    }
}

fn push_options(
    parent: &Option<String>,
    depth: usize,
    by_parent: &HashMap<Option<String>, Vec<OrgRow>>,
    excluded: &HashSet<String>,
    out: &mut Vec<ParentOption>,
) {
    if let Some(kids) = by_parent.get(parent) {
        for child in kids {
            if excluded.contains(&child.id) {
                continue;
            }
            out.push(ParentOption {
                id: Some(child.id.clone()),
                label: format!("{}{}", "— ".repeat(depth), child.name),
            });
            push_options(&Some(child.id.clone()), depth + 1, by_parent, excluded, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, parent: Option<&str>, name: &str, slug: &str, order: Option<i64>) -> OrgRow {
        OrgRow {
            id: id.to_string(),
            parent_id: parent.map(|p| p.to_string()),
            name: name.to_string(),
            slug: slug.to_string(),
            order_index: order,
            ..OrgRow::default()
        }
    }

    #[test]
    fn siblings_sorted_by_order_index_regardless_of_input_order() {
        let rows = vec![
            row("c", Some("r"), "Gamma", "g", Some(3)),
            row("a", Some("r"), "Alpha", "a", Some(1)),
            row("b", Some("r"), "Beta", "b", Some(2)),
            row("r", None, "Root", "root", None),
        ];
        let forest = build_forest(&rows, "Anjab").unwrap();
        let kids: Vec<&str> = forest[0].children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(kids, vec!["a", "b", "c"]);
    }

    #[test]
    fn equal_order_index_ties_break_on_case_insensitive_name() {
        let rows = vec![
            row("r", None, "Root", "root", None),
            row("x", Some("r"), "zulu", "x", Some(1)),
            row("y", Some("r"), "Alpha", "y", Some(1)),
            row("z", Some("r"), "bravo", "z", None), // None -> 0, sorts first
        ];
        let forest = build_forest(&rows, "Anjab").unwrap();
        let names: Vec<&str> = forest[0]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["bravo", "Alpha", "zulu"]);
    }

    #[test]
    fn paths_join_slugs_from_root() {
        let rows = vec![
            row("1", None, "Root", "a", None),
            row("2", Some("1"), "Mid", "b", None),
            row("3", Some("2"), "Leaf", "c", None),
        ];
        let forest = build_forest(&rows, "Anjab").unwrap();
        let leaf = &forest[0].children[0].children[0];
        assert_eq!(leaf.path, "Anjab/a/b/c");

        let bare = build_forest(&rows, "").unwrap();
        assert_eq!(bare[0].children[0].children[0].path, "a/b/c");
    }

    #[test]
    fn orphan_rows_are_silently_dropped() {
        let rows = vec![
            row("1", None, "Root", "a", None),
            row("2", Some("missing"), "Lost", "b", None),
        ];
        let forest = build_forest(&rows, "Anjab").unwrap();
        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn cyclic_parent_chain_is_an_error() {
        let rows = vec![
            row("1", None, "Root", "a", None),
            row("2", Some("3"), "B", "b", None),
            row("3", Some("2"), "C", "c", None),
        ];
        let err = build_forest(&rows, "Anjab").unwrap_err();
        match err {
            TreeError::CyclicHierarchy { id } => assert!(id == "2" || id == "3"),
        }
    }

    #[test]
    fn subtree_ids_collects_preorder() {
        let rows = vec![
            row("1", None, "Root", "a", None),
            row("2", Some("1"), "Mid", "b", None),
            row("3", Some("2"), "Leaf", "c", None),
        ];
        let forest = build_forest(&rows, "Anjab").unwrap();
        assert_eq!(forest[0].subtree_ids(), vec!["1", "2", "3"]);
    }

    #[test]
    fn parent_options_exclude_self_and_descendants() {
        let rows = vec![
            row("1", None, "Root", "a", None),
            row("2", Some("1"), "Mid", "b", None),
            row("3", Some("2"), "Leaf", "c", None),
            row("4", Some("1"), "Other", "d", Some(9)),
        ];
        let opts = parent_options(&rows, "2");
        let labels: Vec<&str> = opts.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["-", "Root", "— Other"]);
        assert_eq!(opts[0].id, None);
        assert_eq!(opts[1].id.as_deref(), Some("1"));
    }
}
