//! Partitioning of the resolved registry into output groups.
//!
//! [`assign_groups`] gives each type the single group all of its operations
//! agree on (or the shared group), [`GroupAssignment::reconcile`] promotes
//! types consumed across groups, and [`SplitPlan::build`] fixes the emission
//! order, cross-group imports and index exports.

pub mod assign;
pub mod plan;

use std::cmp::Ordering;
use std::fmt;

pub use assign::{GroupAssignment, assign_groups, group_for_label, path_segment, slugify};
pub use plan::{
    DuplicateExport, IndexExport, PlannedGroup, SplitPlan, duplicate_messages, index_exports,
    report_duplicates, topo_sort,
};

/// Output group identifier: a slug, or the reserved shared group `common`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId(String);

impl GroupId {
    pub const SHARED: &'static str = "common";

    pub fn shared() -> Self {
        Self(Self::SHARED.to_string())
    }

    /// Group for an already slugified label. Labels from a spec go through
    /// [`group_for_label`], which keeps them clear of `common` and `index`.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn is_shared(&self) -> bool {
        self.0 == Self::SHARED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared group first, then lexicographic.
impl Ord for GroupId {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_shared()
            .cmp(&self.is_shared())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for GroupId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
