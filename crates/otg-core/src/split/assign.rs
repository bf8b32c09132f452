use indexmap::{IndexMap, IndexSet};

use super::GroupId;
use crate::config::SplitStrategy;
use crate::graph::DependencyGraph;
use crate::paths::OperationRefs;

/// Slugify a tag or path segment for use as a file name (no extension).
///
/// e.g. "Daily Activity Routes" → "daily-activity-routes"
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for ch in label.to_lowercase().chars() {
        let ch = if ch.is_whitespace() { '-' } else { ch };
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-') {
            continue;
        }
        if ch == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(ch);
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "untagged".to_string()
    } else {
        slug
    }
}

/// Path segment used for grouping.
///
/// The second segment when the first looks like a version marker (`v2`) or
/// is `api`, otherwise the first; `root` for an empty path.
/// e.g. "/v2/usercollection/sleep" → "usercollection", "/pets/{petId}" → "pets"
pub fn path_segment(path: &str) -> &str {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let Some(first) = segments.next() else {
        return "root";
    };
    if is_version_marker(first) || first == "api" {
        segments.next().unwrap_or(first)
    } else {
        first
    }
}

fn is_version_marker(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some('v' | 'V'))
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_digit())
}

/// Type name → owning group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupAssignment {
    groups: IndexMap<String, GroupId>,
}

impl GroupAssignment {
    pub fn get(&self, type_name: &str) -> Option<&GroupId> {
        self.groups.get(type_name)
    }

    pub fn set(&mut self, type_name: impl Into<String>, group: GroupId) {
        self.groups.insert(type_name.into(), group);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupId)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Promote to the shared group every non-shared type that a type in a
    /// different group depends on. Returns the promoted names.
    ///
    /// This is exactly one pass in assignment order, and it reads the current
    /// assignment as it goes. It is not iterated to a fixed point: a type
    /// whose dependent is only promoted later in the same pass keeps its group,
    /// so the shared group may end up importing from a named group.
    pub fn reconcile(&mut self, graph: &DependencyGraph) -> Vec<String> {
        let dependents = graph.dependents();
        let mut promoted = Vec::new();

        for index in 0..self.groups.len() {
            let Some((name, group)) = self.groups.get_index(index) else {
                continue;
            };
            if group.is_shared() {
                continue;
            }
            let Some(referrers) = dependents.get(name.as_str()) else {
                continue;
            };
            let crosses_group = referrers
                .iter()
                .any(|referrer| self.groups.get(*referrer).is_some_and(|g| g != group));
            if crosses_group {
                promoted.push(name.clone());
                if let Some((_, group)) = self.groups.get_index_mut(index) {
                    *group = GroupId::shared();
                }
            }
        }

        if !promoted.is_empty() {
            log::debug!("promoted {} type(s) to the shared group", promoted.len());
        }
        promoted
    }
}

/// Slugs that name the shared group's file and the index file.
const RESERVED_SLUGS: [&str; 2] = [GroupId::SHARED, "index"];

/// Group for a tag or path label. A label whose slug collides with a
/// reserved file name gets a `-types` suffix.
pub fn group_for_label(label: &str) -> GroupId {
    let slug = slugify(label);
    if RESERVED_SLUGS.contains(&slug.as_str()) {
        GroupId::new(format!("{slug}-types"))
    } else {
        GroupId::new(slug)
    }
}

/// Group key of one operation under the given strategy.
fn operation_group(op: &OperationRefs, strategy: SplitStrategy) -> GroupId {
    match strategy {
        SplitStrategy::Tag => match op.tags.as_slice() {
            [tag] => group_for_label(tag),
            _ => GroupId::shared(),
        },
        SplitStrategy::Path => group_for_label(path_segment(&op.path)),
    }
}

/// Assign every type to the one group all operations referencing it agree on.
///
/// Types referenced by no operation, or by operations in different groups,
/// go to the shared group. The result follows the order of `type_names`.
pub fn assign_groups(
    operations: &[OperationRefs],
    type_names: &IndexSet<String>,
    strategy: SplitStrategy,
) -> GroupAssignment {
    let mut usage: IndexMap<&str, IndexSet<GroupId>> = IndexMap::new();
    for op in operations {
        let group = operation_group(op, strategy);
        for name in &op.type_names {
            if type_names.contains(name) {
                usage.entry(name.as_str()).or_default().insert(group.clone());
            }
        }
    }

    let mut assignment = GroupAssignment::default();
    for name in type_names {
        let group = match usage.get(name.as_str()) {
            Some(groups) if groups.len() == 1 => groups[0].clone(),
            _ => GroupId::shared(),
        };
        assignment.set(name.clone(), group);
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::HttpMethod;

    fn op(path: &str, tags: &[&str], refs: &[&str]) -> OperationRefs {
        OperationRefs {
            path: path.to_string(),
            method: HttpMethod::Get,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            type_names: refs.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn names(list: &[&str]) -> IndexSet<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Daily Activity Routes"), "daily-activity-routes");
        assert_eq!(slugify("Pets"), "pets");
        assert_eq!(slugify("SegmentEfforts"), "segmentefforts");
        assert_eq!(slugify("  user / admin  "), "user-admin");
        assert_eq!(slugify("!!!"), "untagged");
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("/athlete"), "athlete");
        assert_eq!(path_segment("/activities/{id}"), "activities");
        assert_eq!(path_segment("/v2/usercollection/sleep"), "usercollection");
        assert_eq!(path_segment("/api/v3/foo"), "v3");
        assert_eq!(path_segment("/v1"), "v1");
        assert_eq!(path_segment("/"), "root");
        assert_eq!(path_segment(""), "root");
        assert_eq!(path_segment("/version/x"), "version");
    }

    #[test]
    fn test_single_tag_owns_type() {
        let ops = vec![op("/pets", &["Pets"], &["Pet"])];
        let assignment = assign_groups(&ops, &names(&["Pet"]), SplitStrategy::Tag);
        assert_eq!(assignment.get("Pet"), Some(&GroupId::new("pets")));
    }

    #[test]
    fn test_conflicting_tags_share_type() {
        let ops = vec![
            op("/pets", &["Pets"], &["Pet"]),
            op("/other", &["Other"], &["Pet"]),
        ];
        let assignment = assign_groups(&ops, &names(&["Pet"]), SplitStrategy::Tag);
        assert_eq!(assignment.get("Pet"), Some(&GroupId::shared()));
    }

    #[test]
    fn test_unreferenced_and_multi_tag_types_are_shared() {
        let ops = vec![
            op("/pets", &["Pets"], &["Pet"]),
            op("/both", &["A", "B"], &["Both"]),
        ];
        let assignment =
            assign_groups(&ops, &names(&["Pet", "Both", "Other"]), SplitStrategy::Tag);
        assert_eq!(assignment.get("Pet"), Some(&GroupId::new("pets")));
        assert_eq!(assignment.get("Both"), Some(&GroupId::shared()));
        assert_eq!(assignment.get("Other"), Some(&GroupId::shared()));
    }

    #[test]
    fn test_path_strategy() {
        let ops = vec![
            op("/v1/users/{id}", &[], &["User"]),
            op("/v1/users", &[], &["User"]),
            op("/orders", &["Users"], &["Order"]),
        ];
        let assignment = assign_groups(&ops, &names(&["User", "Order"]), SplitStrategy::Path);
        assert_eq!(assignment.get("User"), Some(&GroupId::new("users")));
        assert_eq!(assignment.get("Order"), Some(&GroupId::new("orders")));
    }

    #[test]
    fn test_reserved_labels_get_suffix() {
        assert_eq!(group_for_label("Index"), GroupId::new("index-types"));
        assert_eq!(group_for_label("Common"), GroupId::new("common-types"));
        assert!(!group_for_label("common").is_shared());
        assert_eq!(group_for_label("Indexes"), GroupId::new("indexes"));

        let ops = vec![
            op("/search", &["Index"], &["Hit"]),
            op("/index/stats", &[], &["Stats"]),
        ];
        let by_tag = assign_groups(&ops, &names(&["Hit"]), SplitStrategy::Tag);
        assert_eq!(by_tag.get("Hit"), Some(&GroupId::new("index-types")));
        let by_path = assign_groups(&ops, &names(&["Stats"]), SplitStrategy::Path);
        assert_eq!(by_path.get("Stats"), Some(&GroupId::new("index-types")));
    }

    #[test]
    fn test_unknown_names_ignored() {
        let ops = vec![op("/pets", &["Pets"], &["Pet", "External"])];
        let assignment = assign_groups(&ops, &names(&["Pet"]), SplitStrategy::Tag);
        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.get("External"), None);
    }
}
