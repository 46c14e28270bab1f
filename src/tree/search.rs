// src/tree/search.rs

//! Flat substring-search index over the built forest.
//!
//! Built from the ghost-free tree (ghosts are a chart-only decoration and
//! must never surface here) and independent of expand/collapse state.

use super::build::OrgNode;

/// Maximum number of entries returned per query; an empty query returns the
/// first `MAX_RESULTS` entries as a default list.
pub const MAX_RESULTS: usize = 20;

#[derive(Debug, Clone)]
pub struct SearchEntry {
    pub id: String,
    pub name: String,
    pub unit_kerja: Option<String>,
    pub path: String,
    /// Lowercased space-join of name, unit, slug and path, matched by
    /// substring.
    searchable: String,
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Flatten a forest in preorder into searchable records.
    pub fn from_forest(roots: &[OrgNode]) -> Self {
        let mut entries = Vec::new();
        for root in roots {
            push_entries(root, &mut entries);
        }
        SearchIndex { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substring match on the lowercased, trimmed query.  Not fuzzy: the
    /// query must appear verbatim inside the searchable text.
    pub fn query(&self, q: &str) -> Vec<&SearchEntry> {
        let needle = q.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().take(MAX_RESULTS).collect();
        }
        self.entries
            .iter()
            .filter(|e| e.searchable.contains(&needle))
            .take(MAX_RESULTS)
            .collect()
    }
}

fn push_entries(node: &OrgNode, out: &mut Vec<SearchEntry>) {
    let searchable = [
        node.name.as_str(),
        node.unit_kerja.as_deref().unwrap_or(""),
        node.slug.as_str(),
        node.path.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    out.push(SearchEntry {
        id: node.id.clone(),
        name: node.name.clone(),
        unit_kerja: node.unit_kerja.clone(),
        path: node.path.clone(),
        searchable,
    });
    for child in &node.children {
        push_entries(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build::build_forest;
    use crate::tree::row::OrgRow;

    fn index(rows: Vec<OrgRow>) -> SearchIndex {
        let forest = build_forest(&rows, "Anjab").unwrap();
        SearchIndex::from_forest(&forest)
    }

    fn row(id: &str, parent: Option<&str>, name: &str, unit: Option<&str>) -> OrgRow {
        OrgRow {
            id: id.to_string(),
            parent_id: parent.map(|p| p.to_string()),
            name: name.to_string(),
            slug: id.to_string(),
            unit_kerja: unit.map(|u| u.to_string()),
            ..OrgRow::default()
        }
    }

    #[test]
    fn query_matches_case_insensitive_substring() {
        let idx = index(vec![row("1", None, "Kepala Bagian Umum", Some("Biro X"))]);
        assert_eq!(idx.query("bagian umum").len(), 1);
        assert_eq!(idx.query("BAGIAN Umum").len(), 1);
        assert_eq!(idx.query("biro x").len(), 1);
        assert!(idx.query("zzz").is_empty());
    }

    #[test]
    fn empty_query_returns_leading_entries() {
        let rows: Vec<OrgRow> = (0..30)
            .map(|i| row(&format!("n{:02}", i), None, &format!("Unit {:02}", i), None))
            .collect();
        let idx = index(rows);
        assert_eq!(idx.len(), 30);
        assert_eq!(idx.query("").len(), MAX_RESULTS);
        assert_eq!(idx.query("   ").len(), MAX_RESULTS);
    }

    #[test]
    fn path_text_is_searchable() {
        let idx = index(vec![
            row("1", None, "Sekretariat Jenderal", None),
            row("2", Some("1"), "Biro Umum", None),
        ]);
        // The child's path contains its parent's slug.
        let hits = idx.query("anjab/1/2");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn orphans_never_reach_the_index() {
        let idx = index(vec![
            row("1", None, "Root", None),
            row("2", Some("missing"), "Lost Unit", None),
        ]);
        assert!(idx.query("lost").is_empty());
        assert_eq!(idx.len(), 1);
    }
}
