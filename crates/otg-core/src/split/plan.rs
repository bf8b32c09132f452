use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use super::{GroupAssignment, GroupId};
use crate::config::LogLevel;
use crate::graph::DependencyGraph;

/// One output file: its types in declaration order and what it imports.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedGroup {
    pub id: GroupId,
    /// Declaration order: dependencies before dependents within the group.
    pub types: Vec<String>,
    /// Owning group → names imported from it, sorted.
    pub imports: IndexMap<GroupId, Vec<String>>,
}

/// Names the index re-exports from one group.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExport {
    pub group: GroupId,
    pub names: Vec<String>,
}

/// A type declared by more than one group. Only `first_group` is exported.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateExport {
    pub type_name: String,
    pub first_group: GroupId,
    pub also_in: GroupId,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitPlan {
    /// Shared group first, then by group id.
    pub groups: Vec<PlannedGroup>,
    pub exports: Vec<IndexExport>,
    pub duplicates: Vec<DuplicateExport>,
}

impl SplitPlan {
    pub fn build(graph: &DependencyGraph, assignment: &GroupAssignment) -> Self {
        let mut members: IndexMap<GroupId, Vec<String>> = IndexMap::new();
        for (name, group) in assignment.iter() {
            members.entry(group.clone()).or_default().push(name.to_string());
        }
        members.sort_unstable_keys();

        let groups: Vec<PlannedGroup> = members
            .into_iter()
            .map(|(id, mut names)| {
                names.sort();
                let types = topo_sort(&names, graph);
                let imports = group_imports(&id, &types, graph, assignment);
                PlannedGroup { id, types, imports }
            })
            .collect();

        let (exports, duplicates) = index_exports(&groups);
        Self {
            groups,
            exports,
            duplicates,
        }
    }
}

fn group_imports(
    id: &GroupId,
    types: &[String],
    graph: &DependencyGraph,
    assignment: &GroupAssignment,
) -> IndexMap<GroupId, Vec<String>> {
    let mut imports: IndexMap<GroupId, IndexSet<String>> = IndexMap::new();
    for name in types {
        for dep in graph.dependencies(name) {
            match assignment.get(dep) {
                Some(owner) if owner != id => {
                    imports.entry(owner.clone()).or_default().insert(dep.to_string());
                }
                _ => {}
            }
        }
    }
    imports.sort_unstable_keys();
    imports
        .into_iter()
        .map(|(owner, names)| {
            let mut names: Vec<String> = names.into_iter().collect();
            names.sort();
            (owner, names)
        })
        .collect()
}

/// Order `names` so each type comes after the members it depends on.
///
/// Only edges between members are followed. A dependency cycle is broken at
/// the point of re-entry, so every name appears exactly once.
pub fn topo_sort(names: &[String], graph: &DependencyGraph) -> Vec<String> {
    let members: HashSet<&str> = names.iter().map(String::as_str).collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut sorted = Vec::with_capacity(names.len());

    for name in names {
        visit(name, graph, &members, &mut visited, &mut sorted);
    }
    sorted
}

fn visit<'a>(
    name: &'a str,
    graph: &'a DependencyGraph,
    members: &HashSet<&'a str>,
    visited: &mut HashSet<&'a str>,
    sorted: &mut Vec<String>,
) {
    if !visited.insert(name) {
        return;
    }
    for dep in graph.dependencies(name) {
        if members.contains(dep) {
            visit(dep, graph, members, visited, sorted);
        }
    }
    sorted.push(name.to_string());
}

/// Index re-exports per group, keeping only the first group to declare a name.
pub fn index_exports(groups: &[PlannedGroup]) -> (Vec<IndexExport>, Vec<DuplicateExport>) {
    let mut owners: IndexMap<&str, &GroupId> = IndexMap::new();
    let mut exports = Vec::new();
    let mut duplicates = Vec::new();

    for group in groups {
        let mut names = Vec::new();
        for name in &group.types {
            match owners.get(name.as_str()) {
                Some(first) => duplicates.push(DuplicateExport {
                    type_name: name.clone(),
                    first_group: (*first).clone(),
                    also_in: group.id.clone(),
                }),
                None => {
                    owners.insert(name.as_str(), &group.id);
                    names.push(name.clone());
                }
            }
        }
        if !names.is_empty() {
            exports.push(IndexExport {
                group: group.id.clone(),
                names,
            });
        }
    }
    (exports, duplicates)
}

/// Diagnostic lines for duplicate exports: one summary line, or one line per
/// type when verbose. Empty when there is nothing to report.
pub fn duplicate_messages(duplicates: &[DuplicateExport], level: LogLevel) -> Vec<String> {
    if duplicates.is_empty() {
        return Vec::new();
    }
    match level {
        LogLevel::Basic => vec![format!(
            "{} type(s) declared in more than one group; exported from the first only",
            duplicates.len()
        )],
        LogLevel::Verbose => duplicates
            .iter()
            .map(|dup| {
                format!(
                    "duplicate export {}: kept from {}.ts, skipped in {}.ts",
                    dup.type_name, dup.first_group, dup.also_in
                )
            })
            .collect(),
    }
}

/// Log [`duplicate_messages`] as warnings.
pub fn report_duplicates(duplicates: &[DuplicateExport], level: LogLevel) {
    for message in duplicate_messages(duplicates, level) {
        log::warn!("{message}");
    }
}
