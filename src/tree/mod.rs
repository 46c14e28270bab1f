// src/tree/mod.rs

// Declare sub-modules for the pure tree engine
pub mod build;
pub mod expand;
pub mod filter;
pub mod ghost;
pub mod row;
pub mod search;

pub use build::{build_forest, order_siblings, parent_options, OrgNode, ParentOption, TreeError};
pub use expand::ExpansionState;
pub use filter::{filter_forest, filter_scope, Scope};
pub use ghost::{decorate, ChartNode, ChartUnit};
pub use row::{JobTier, OrgRow};
pub use search::{SearchEntry, SearchIndex};
