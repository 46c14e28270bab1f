// src/tree/ghost.rs

//! Depth alignment for the org-chart pane.
//!
//! Real hierarchies skip tiers: an Eselon IV unit can hang directly off an
//! Eselon II parent.  The chart still wants each tier on its own visual
//! row, so children that sit "too deep" for their sibling group are wrapped
//! in chains of invisible ghost nodes.  This is purely presentational; the
//! underlying parent-child edges are never altered.

use super::build::OrgNode;
use super::row::JobTier;

/// A chart tree node: either a real unit card or an invisible spacer that
/// occupies exactly one tier row and wraps exactly one child.
#[derive(Debug, Clone)]
pub enum ChartNode {
    Ghost {
        id: String,
        /// Ghosts never advance the path; they carry their parent's.
        path: String,
        child: Box<ChartNode>,
    },
    Unit(ChartUnit),
}

#[derive(Debug, Clone)]
pub struct ChartUnit {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub path: String,
    pub tier: JobTier,
    pub kelas_jabatan: Option<String>,
    pub bezetting: Option<i64>,
    pub kebutuhan_pegawai: Option<i64>,
    pub children: Vec<ChartNode>,
}

impl ChartUnit {
    /// Headcount surplus/deficit shown in the `±` column.
    pub fn selisih(&self) -> i64 {
        self.bezetting.unwrap_or(0) - self.kebutuhan_pegawai.unwrap_or(0)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl ChartNode {
    /// The real unit at the bottom of any ghost chain.
    pub fn unit(&self) -> &ChartUnit {
        match self {
            ChartNode::Unit(u) => u,
            ChartNode::Ghost { child, .. } => child.unit(),
        }
    }

    pub fn is_ghost(&self) -> bool {
        matches!(self, ChartNode::Ghost { .. })
    }
}

/// Decorate a built forest for chart rendering, inserting ghost spacers
/// where sibling tiers diverge.  `keyword` is the name/slug fragment that
/// forces a minimum offset of one (case-insensitive substring).
pub fn decorate(roots: &[OrgNode], keyword: &str) -> Vec<ChartNode> {
    roots.iter().map(|r| decorate_node(r, keyword)).collect()
}

fn decorate_node(node: &OrgNode, keyword: &str) -> ChartNode {
    let kids: Vec<ChartNode> = node
        .children
        .iter()
        .map(|c| decorate_node(c, keyword))
        .collect();

    let aligned = if kids.is_empty() {
        kids
    } else {
        align_children(&node.id, &node.path, kids, keyword)
    };

    ChartNode::Unit(ChartUnit {
        id: node.id.clone(),
        name: node.name.clone(),
        slug: node.slug.clone(),
        path: node.path.clone(),
        tier: node.tier,
        kelas_jabatan: node.kelas_jabatan.clone(),
        bezetting: node.bezetting,
        kebutuhan_pegawai: node.kebutuhan_pegawai,
        children: aligned,
    })
}

/// Offset every child of one parent against the shallowest sibling rank,
/// wrapping the deeper ones in ghost chains.
fn align_children(
    parent_id: &str,
    parent_path: &str,
    kids: Vec<ChartNode>,
    keyword: &str,
) -> Vec<ChartNode> {
    let min_rank = kids
        .iter()
        .map(|k| k.unit().tier.rank())
        .min()
        .unwrap_or(0);

    kids.into_iter()
        .map(|kid| {
            let unit = kid.unit();
            let base = unit.tier.rank().saturating_sub(min_rank);
            let floor = if matches_keyword(unit, keyword) { 1 } else { 0 };
            let offset = base.max(floor);
            wrap_with_ghosts(parent_id, parent_path, kid, offset)
        })
        .collect()
}

fn matches_keyword(unit: &ChartUnit, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    let needle = keyword.to_lowercase();
    unit.name.to_lowercase().contains(&needle) || unit.slug.to_lowercase().contains(&needle)
}

fn wrap_with_ghosts(
    parent_id: &str,
    parent_path: &str,
    child: ChartNode,
    layers: u32,
) -> ChartNode {
    let child_id = child.unit().id.clone();
    let mut wrapped = child;
    for layer in 1..=layers {
        wrapped = ChartNode::Ghost {
            id: format!("ghost:{}:{}:L{}", parent_id, child_id, layer),
            path: parent_path.to_string(),
            child: Box::new(wrapped),
        };
    }
    wrapped
}
