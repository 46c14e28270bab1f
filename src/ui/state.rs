// src/ui/state.rs
// UI state structure and form/modal definitions

use std::collections::HashSet;
use std::time::Instant;

use crate::sync::api::NodePayload;
use crate::sync::slug::derive_slug;
use crate::sync::status::SyncStatus;
use crate::tree::{
    build_forest, decorate, filter_forest, filter_scope, ChartNode, ChartUnit, ExpansionState,
    JobTier, OrgNode, OrgRow, ParentOption, Scope, SearchIndex,
};

/// Which pane owns the navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Tree,
    Chart,
}

/// Fields of the add/edit form, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Slug,
    UnitKerja,
    KelasJabatan,
    Bezetting,
    Kebutuhan,
    Jenis,
    IsPusat,
    /// Parent picker; only offered by the edit modal
    Parent,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Slug,
            FormField::Slug => FormField::UnitKerja,
            FormField::UnitKerja => FormField::KelasJabatan,
            FormField::KelasJabatan => FormField::Bezetting,
            FormField::Bezetting => FormField::Kebutuhan,
            FormField::Kebutuhan => FormField::Jenis,
            FormField::Jenis => FormField::IsPusat,
            FormField::IsPusat => FormField::Parent,
            FormField::Parent => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Parent,
            FormField::Slug => FormField::Name,
            FormField::UnitKerja => FormField::Slug,
            FormField::KelasJabatan => FormField::UnitKerja,
            FormField::Bezetting => FormField::KelasJabatan,
            FormField::Kebutuhan => FormField::Bezetting,
            FormField::Jenis => FormField::Kebutuhan,
            FormField::IsPusat => FormField::Jenis,
            FormField::Parent => FormField::IsPusat,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Nama",
            FormField::Slug => "Slug",
            FormField::UnitKerja => "Unit Kerja",
            FormField::KelasJabatan => "Kelas Jabatan",
            FormField::Bezetting => "Bezetting",
            FormField::Kebutuhan => "Kebutuhan Pegawai",
            FormField::Jenis => "Jenis Jabatan",
            FormField::IsPusat => "Lingkup",
            FormField::Parent => "Induk",
        }
    }
}

pub const TIER_CHOICES: [JobTier; 9] = [
    JobTier::EselonI,
    JobTier::EselonII,
    JobTier::EselonIII,
    JobTier::EselonIV,
    JobTier::JabatanFungsional,
    JobTier::JabatanPelaksana,
    JobTier::PegawaiDpk,
    JobTier::PegawaiCltn,
    JobTier::Unknown,
];

/// Editable node form backing the add and edit modals.
///
/// The slug tracks the name until the user edits the slug field directly;
/// from then on it is theirs and auto-derivation stops for good.
#[derive(Debug, Clone, Default)]
pub struct NodeForm {
    pub name: String,
    pub slug: String,
    pub slug_touched: bool,
    pub unit_kerja: String,
    pub kelas_jabatan: String,
    pub bezetting: String,
    pub kebutuhan_pegawai: String,
    pub jenis_jabatan: JobTier,
    pub is_pusat: bool,
    pub field: FormField,
    pub level: i32,
    pub order_index: Option<i64>,
}

impl NodeForm {
    pub fn for_new_child(level: i32) -> Self {
        NodeForm {
            is_pusat: true,
            jenis_jabatan: JobTier::Unknown,
            level,
            ..NodeForm::default()
        }
    }

    /// Prefill from an existing row for the edit modal.
    pub fn from_row(row: &OrgRow) -> Self {
        NodeForm {
            name: row.name.clone(),
            slug: row.slug.clone(),
            // An existing slug is treated as deliberate.
            slug_touched: true,
            unit_kerja: row.unit_kerja.clone().unwrap_or_default(),
            kelas_jabatan: row.kelas_jabatan.clone().unwrap_or_default(),
            bezetting: row.bezetting.map(|v| v.to_string()).unwrap_or_default(),
            kebutuhan_pegawai: row
                .kebutuhan_pegawai
                .map(|v| v.to_string())
                .unwrap_or_default(),
            jenis_jabatan: row.tier(),
            is_pusat: row.is_pusat(),
            field: FormField::Name,
            level: row.level,
            order_index: row.order_index,
        }
    }

    /// Append a character to the focused text field.
    pub fn type_char(&mut self, c: char) {
        match self.field {
            FormField::Name => {
                self.name.push(c);
                if !self.slug_touched {
                    self.slug = derive_slug(&self.name);
                }
            }
            FormField::Slug => {
                self.slug.push(c);
                self.slug_touched = true;
            }
            FormField::UnitKerja => self.unit_kerja.push(c),
            FormField::KelasJabatan => self.kelas_jabatan.push(c),
            FormField::Bezetting => {
                if c.is_ascii_digit() {
                    self.bezetting.push(c);
                }
            }
            FormField::Kebutuhan => {
                if c.is_ascii_digit() {
                    self.kebutuhan_pegawai.push(c);
                }
            }
            FormField::Jenis | FormField::IsPusat | FormField::Parent => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            FormField::Name => {
                self.name.pop();
                if !self.slug_touched {
                    self.slug = derive_slug(&self.name);
                }
            }
            FormField::Slug => {
                self.slug.pop();
                self.slug_touched = true;
            }
            FormField::UnitKerja => {
                self.unit_kerja.pop();
            }
            FormField::KelasJabatan => {
                self.kelas_jabatan.pop();
            }
            FormField::Bezetting => {
                self.bezetting.pop();
            }
            FormField::Kebutuhan => {
                self.kebutuhan_pegawai.pop();
            }
            FormField::Jenis | FormField::IsPusat | FormField::Parent => {}
        }
    }

    /// Left/Right on the choice fields; no-op on text fields.
    pub fn cycle(&mut self, forward: bool) {
        match self.field {
            FormField::Jenis => {
                let idx = TIER_CHOICES
                    .iter()
                    .position(|t| *t == self.jenis_jabatan)
                    .unwrap_or(TIER_CHOICES.len() - 1);
                let next = if forward {
                    (idx + 1) % TIER_CHOICES.len()
                } else {
                    (idx + TIER_CHOICES.len() - 1) % TIER_CHOICES.len()
                };
                self.jenis_jabatan = TIER_CHOICES[next];
            }
            FormField::IsPusat => self.is_pusat = !self.is_pusat,
            _ => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.slug.trim().is_empty()
    }

    pub fn to_payload(&self, parent_id: Option<String>) -> NodePayload {
        let opt = |s: &str| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        };
        NodePayload {
            parent_id,
            name: self.name.trim().to_string(),
            slug: self.slug.trim().to_string(),
            unit_kerja: opt(&self.unit_kerja),
            level: self.level,
            order_index: self.order_index,
            bezetting: self.bezetting.trim().parse().ok(),
            kebutuhan_pegawai: self.kebutuhan_pegawai.trim().parse().ok(),
            kelas_jabatan: opt(&self.kelas_jabatan),
            jenis_jabatan: self.jenis_jabatan.category().map(str::to_string),
            is_pusat: Some(self.is_pusat),
        }
    }
}

/// Which modal, if any, is on top of the panes.
#[derive(Debug, Clone, Default)]
pub enum ModalState {
    #[default]
    None,
    Add {
        parent_id: Option<String>,
        parent_name: Option<String>,
        form: NodeForm,
    },
    Edit {
        id: String,
        form: NodeForm,
        parents: Vec<ParentOption>,
        parent_idx: usize,
    },
    ConfirmDelete {
        id: String,
        name: String,
        subtree_size: usize,
    },
    Error(String),
}

/// One line of the chart pane after expansion is applied.
#[derive(Debug)]
pub enum ChartLine<'a> {
    /// Ghost spacer holding a deeper-tier unit at its aligned depth
    Spacer { depth: usize },
    Unit {
        unit: &'a ChartUnit,
        depth: usize,
        collapsed: bool,
    },
}

/// One line of the tree pane after expansion is applied.
#[derive(Debug, Clone)]
pub struct VisibleRow {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub has_children: bool,
    pub collapsed: bool,
    pub last_sibling: bool,
}

/// All state the terminal UI renders from.
pub struct UiState {
    /// Last committed flat row set
    pub rows: Vec<OrgRow>,
    /// Scoped forest shown in the panes
    pub roots: Vec<OrgNode>,
    /// Full forest, scope ignored; feeds search and the parent picker
    pub all_roots: Vec<OrgNode>,
    /// Ghost-decorated forest for the chart pane
    pub chart: Vec<ChartNode>,
    pub search: SearchIndex,
    pub expansion: ExpansionState,

    /// Generation of `rows`; stale fetch results are dropped
    pub last_generation: u64,
    pub loading: bool,
    pub last_error: Option<String>,
    pub sync_status: SyncStatus,

    pub focus: Pane,
    pub scope: Scope,
    pub selected: usize,
    pub chart_selected: usize,
    pub chart_query: String,
    /// True while the chart filter line is capturing keystrokes
    pub chart_filter_editing: bool,
    pub modal: ModalState,

    /// Parent to auto-expand once the post-mutation refetch lands
    pub pending_expand: Option<String>,

    pub search_open: bool,
    pub search_query: String,
    /// Set on every keystroke in the search overlay; the query runs once the
    /// deadline passes
    pub search_deadline: Option<Instant>,
    pub search_results: Vec<SearchHit>,
    pub search_selected: usize,

    pub should_quit: bool,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub path: String,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            rows: Vec::new(),
            roots: Vec::new(),
            all_roots: Vec::new(),
            chart: Vec::new(),
            search: SearchIndex::default(),
            expansion: ExpansionState::default(),
            last_generation: 0,
            loading: true,
            last_error: None,
            sync_status: SyncStatus::default(),
            focus: Pane::Tree,
            scope: Scope::All,
            selected: 0,
            chart_selected: 0,
            chart_query: String::new(),
            chart_filter_editing: false,
            modal: ModalState::None,
            pending_expand: None,
            search_open: false,
            search_query: String::new(),
            search_deadline: None,
            search_results: Vec::new(),
            search_selected: 0,
            should_quit: false,
        }
    }
}

impl UiState {
    /// Commit a freshly fetched row set: rebuild every derived structure and
    /// reseed expansion to all-collapsed.
    pub fn commit_rows(&mut self, generation: u64, rows: Vec<OrgRow>, prefix: &str, keyword: &str) {
        if generation <= self.last_generation {
            // A newer fetch already landed; this response is stale.
            return;
        }
        // Validate before committing anything: a cyclic row set must leave
        // rows, forest and search index all at the last good generation.
        let forest = match build_forest(&rows, prefix) {
            Ok(forest) => forest,
            Err(e) => {
                self.loading = false;
                self.last_error = Some(e.to_string());
                return;
            }
        };
        self.last_generation = generation;
        self.rows = rows;
        self.loading = false;
        self.last_error = None;
        self.all_roots = forest;
        self.search = SearchIndex::from_forest(&self.all_roots);
        self.rebuild_view(prefix, keyword);
        self.expansion.reset(&self.roots);

        if let Some(parent) = self.pending_expand.take() {
            self.expand_to(&parent);
            self.expansion.expand(&parent);
        }
        self.clamp_selection();
    }

    /// Rebuild the scoped display forest and chart without touching rows,
    /// search, or expansion. Used on scope and chart-filter changes.
    pub fn rebuild_view(&mut self, prefix: &str, keyword: &str) {
        let scoped = filter_scope(&self.rows, self.scope);
        match build_forest(&scoped, prefix) {
            Ok(forest) => self.roots = forest,
            Err(e) => {
                self.last_error = Some(e.to_string());
                return;
            }
        }
        let chart_roots = filter_forest(&self.roots, &self.chart_query);
        self.chart = decorate(&chart_roots, keyword);
        self.clamp_selection();
    }

    /// Tree pane lines under the current expansion state.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut out = Vec::new();
        let count = self.roots.len();
        for (i, root) in self.roots.iter().enumerate() {
            self.flatten_visible(root, 0, i + 1 == count, &mut out);
        }
        out
    }

    fn flatten_visible(
        &self,
        node: &OrgNode,
        depth: usize,
        last_sibling: bool,
        out: &mut Vec<VisibleRow>,
    ) {
        let collapsed = self.expansion.is_collapsed(&node.id);
        out.push(VisibleRow {
            id: node.id.clone(),
            name: node.name.clone(),
            depth,
            has_children: node.has_children(),
            collapsed,
            last_sibling,
        });
        if !collapsed {
            let count = node.children.len();
            for (i, child) in node.children.iter().enumerate() {
                self.flatten_visible(child, depth + 1, i + 1 == count, out);
            }
        }
    }

    /// Chart pane lines under the current expansion state.  A collapsed
    /// unit keeps its own box but prunes the whole child set, ghost chains
    /// included; ghosts themselves are never toggle targets.
    pub fn chart_lines(&self) -> Vec<ChartLine<'_>> {
        fn walk<'a>(
            node: &'a ChartNode,
            depth: usize,
            expansion: &ExpansionState,
            out: &mut Vec<ChartLine<'a>>,
        ) {
            match node {
                ChartNode::Ghost { child, .. } => {
                    out.push(ChartLine::Spacer { depth });
                    walk(child, depth + 1, expansion, out);
                }
                ChartNode::Unit(unit) => {
                    let collapsed = expansion.is_collapsed(&unit.id);
                    out.push(ChartLine::Unit {
                        unit,
                        depth,
                        collapsed,
                    });
                    if !collapsed {
                        for child in &unit.children {
                            walk(child, depth + 1, expansion, out);
                        }
                    }
                }
            }
        }
        let mut out = Vec::new();
        for node in &self.chart {
            walk(node, 0, &self.expansion, &mut out);
        }
        out
    }

    /// Unit under the chart cursor, if the cursor sits on a real box.
    pub fn selected_chart_unit(&self) -> Option<(String, bool)> {
        match self.chart_lines().get(self.chart_selected)? {
            ChartLine::Unit { unit, .. } => Some((unit.id.clone(), unit.has_children())),
            ChartLine::Spacer { .. } => None,
        }
    }

    pub fn selected_row(&self) -> Option<VisibleRow> {
        self.visible_rows().into_iter().nth(self.selected)
    }

    pub fn find_row(&self, id: &str) -> Option<&OrgRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn find_node(&self, id: &str) -> Option<&OrgNode> {
        fn walk<'a>(nodes: &'a [OrgNode], id: &str) -> Option<&'a OrgNode> {
            for n in nodes {
                if n.id == id {
                    return Some(n);
                }
                if let Some(found) = walk(&n.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.roots, id)
    }

    /// Expand every ancestor of `id` so the node itself becomes visible.
    /// The visited set bounds the walk even if the row set were ever to
    /// carry a parent cycle.
    pub fn expand_to(&mut self, id: &str) {
        let mut seen: HashSet<String> = HashSet::new();
        let mut cur = self.find_row(id).and_then(|r| r.parent_id.clone());
        while let Some(pid) = cur {
            if !seen.insert(pid.clone()) {
                break;
            }
            self.expansion.expand(&pid);
            cur = self.find_row(&pid).and_then(|r| r.parent_id.clone());
        }
    }

    /// Move the tree selection onto `id` if it is visible.
    pub fn select_id(&mut self, id: &str) {
        if let Some(pos) = self.visible_rows().iter().position(|r| r.id == id) {
            self.selected = pos;
        }
    }

    pub fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        let chart_len = self.chart_lines().len();
        if chart_len == 0 {
            self.chart_selected = 0;
        } else if self.chart_selected >= chart_len {
            self.chart_selected = chart_len - 1;
        }
    }

    pub fn run_search(&mut self) {
        self.search_results = self
            .search
            .query(&self.search_query)
            .into_iter()
            .map(|e| SearchHit {
                id: e.id.clone(),
                name: e.name.clone(),
                path: e.path.clone(),
            })
            .collect();
        if self.search_selected >= self.search_results.len() {
            self.search_selected = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_follows_name_until_touched() {
        let mut form = NodeForm::for_new_child(2);
        form.field = FormField::Name;
        for c in "Biro Umum".chars() {
            form.type_char(c);
        }
        assert_eq!(form.slug, "biro-umum");

        // A manual slug edit pins it.
        form.field = FormField::Slug;
        form.backspace();
        form.type_char('x');
        assert!(form.slug_touched);
        let pinned = form.slug.clone();

        form.field = FormField::Name;
        form.type_char('!');
        form.type_char('2');
        assert_eq!(form.slug, pinned);
    }

    #[test]
    fn payload_parses_numeric_fields() {
        let mut form = NodeForm::for_new_child(3);
        form.name = "Subbag Tata Usaha".to_string();
        form.slug = "subbag-tu".to_string();
        form.bezetting = "4".to_string();
        form.kebutuhan_pegawai = "".to_string();
        form.jenis_jabatan = JobTier::EselonIV;

        let payload = form.to_payload(Some("p1".to_string()));
        assert_eq!(payload.parent_id.as_deref(), Some("p1"));
        assert_eq!(payload.bezetting, Some(4));
        assert_eq!(payload.kebutuhan_pegawai, None);
        assert_eq!(payload.jenis_jabatan.as_deref(), Some("ESELON IV"));
        assert_eq!(payload.level, 3);
    }

    #[test]
    fn numeric_fields_reject_letters() {
        let mut form = NodeForm::for_new_child(1);
        form.field = FormField::Bezetting;
        form.type_char('1');
        form.type_char('a');
        form.type_char('2');
        assert_eq!(form.bezetting, "12");
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

    #[test]
    fn stale_generations_are_dropped() {
        let mut state = UiState::default();
        state.commit_rows(2, vec![row("a", None, "Current")], "Anjab", "inspektorat");
        assert_eq!(state.rows.len(), 1);

        // An older in-flight fetch must not clobber the newer rows.
        state.commit_rows(
            1,
            vec![row("old", None, "Stale"), row("old2", None, "Stale 2")],
            "Anjab",
            "inspektorat",
        );
        assert_eq!(state.last_generation, 2);
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].id, "a");
    }

    #[test]
    fn commit_reseeds_expansion_collapsed() {
        let mut state = UiState::default();
        state.commit_rows(
            1,
            vec![row("r", None, "Root"), row("c", Some("r"), "Child")],
            "Anjab",
            "inspektorat",
        );
        // Only the root is visible until expanded.
        assert_eq!(state.visible_rows().len(), 1);
        state.expansion.expand("r");
        assert_eq!(state.visible_rows().len(), 2);
    }

    #[test]
    fn pending_expand_reveals_new_child() {
        let mut state = UiState::default();
        state.pending_expand = Some("r".to_string());
        state.commit_rows(
            1,
            vec![row("r", None, "Root"), row("c", Some("r"), "Child")],
            "Anjab",
            "inspektorat",
        );
        let ids: Vec<String> = state.visible_rows().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["r", "c"]);
    }

    #[test]
    fn cyclic_rows_keep_previous_view() {
        let mut state = UiState::default();
        state.commit_rows(1, vec![row("a", None, "Ok")], "Anjab", "inspektorat");

        let cyclic = vec![row("x", Some("y"), "X"), row("y", Some("x"), "Y")];
        state.commit_rows(2, cyclic, "Anjab", "inspektorat");
        assert!(state.last_error.is_some());
        // Nothing of the bad generation is committed: rows, forest and
        // search all still show the last good data.
        assert_eq!(state.last_generation, 1);
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].id, "a");
        assert_eq!(state.roots.len(), 1);
        assert_eq!(state.roots[0].id, "a");
        assert_eq!(state.search.query("x").len(), 0);

        // The next clean fetch commits normally.
        state.commit_rows(3, vec![row("b", None, "Fresh")], "Anjab", "inspektorat");
        assert!(state.last_error.is_none());
        assert_eq!(state.last_generation, 3);
        assert_eq!(state.roots[0].id, "b");
    }

    #[test]
    fn chart_lines_follow_expansion() {
        let mut state = UiState::default();
        state.commit_rows(
            1,
            vec![
                row("r", None, "Sekretariat"),
                row("c", Some("r"), "Bagian Umum"),
                row("i", Some("r"), "Inspektorat Wilayah I"),
            ],
            "Anjab",
            "inspektorat",
        );
        // Everything starts collapsed: only the root box shows.
        let lines = state.chart_lines();
        assert_eq!(lines.len(), 1);
        assert!(matches!(
            lines[0],
            ChartLine::Unit {
                collapsed: true,
                ..
            }
        ));

        state.expansion.expand("r");
        let lines = state.chart_lines();
        let units: Vec<&str> = lines
            .iter()
            .filter_map(|l| match l {
                ChartLine::Unit { unit, .. } => Some(unit.id.as_str()),
                ChartLine::Spacer { .. } => None,
            })
            .collect();
        assert_eq!(units, vec!["r", "c", "i"]);
        // The keyword child sits one level deeper behind its spacer.
        let spacer_idx = lines
            .iter()
            .position(|l| matches!(l, ChartLine::Spacer { depth: 1 }))
            .unwrap();

        // The cursor only ever lands on a real unit.
        state.chart_selected = spacer_idx;
        assert!(state.selected_chart_unit().is_none());
        state.chart_selected = 0;
        assert_eq!(state.selected_chart_unit(), Some(("r".to_string(), true)));
    }

    #[test]
    fn expand_to_terminates_on_a_parent_cycle() {
        // Commit never accepts cyclic rows, but the ancestor walk must stay
        // bounded no matter what the row set holds.
        let mut state = UiState::default();
        state.rows = vec![row("x", Some("y"), "X"), row("y", Some("x"), "Y")];
        state.expand_to("x");
        assert!(!state.expansion.is_collapsed("y"));
    }
}
