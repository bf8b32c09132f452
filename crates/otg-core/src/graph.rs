use indexmap::{IndexMap, IndexSet};

use crate::naming::ref_type_name;
use crate::resolve::ResolvedSchemaMap;
use crate::schema::SchemaNode;

/// Type name → names it references directly (one level), restricted to the registry.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: IndexMap<String, IndexSet<String>>,
}

impl DependencyGraph {
    pub fn build(registry: &ResolvedSchemaMap) -> Self {
        let edges = registry
            .iter()
            .map(|(name, schema)| (name.clone(), schema_refs(schema, registry)))
            .collect();
        Self { edges }
    }

    /// Direct dependencies of `name` (empty for unknown names).
    pub fn dependencies<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.edges
            .get(name)
            .into_iter()
            .flat_map(|deps| deps.iter().map(String::as_str))
    }

    /// Reverse graph: type name → types that depend on it.
    pub fn dependents(&self) -> IndexMap<&str, IndexSet<&str>> {
        let mut reverse: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
        for (name, deps) in &self.edges {
            for dep in deps {
                reverse.entry(dep.as_str()).or_default().insert(name.as_str());
            }
        }
        reverse
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.edges.iter().map(|(name, deps)| (name.as_str(), deps))
    }
}

/// Names referenced anywhere in `schema` (through `$ref`, composition, `items`
/// and `properties`) that exist in `registry`.
pub fn schema_refs(schema: &SchemaNode, registry: &ResolvedSchemaMap) -> IndexSet<String> {
    let mut out = IndexSet::new();
    visit(schema, registry, &mut out);
    out
}

fn visit(schema: &SchemaNode, registry: &ResolvedSchemaMap, out: &mut IndexSet<String>) {
    if let Some(name) = schema.ref_path.as_deref().and_then(ref_type_name)
        && registry.contains_key(&name)
    {
        out.insert(name);
    }
    for child in schema.children() {
        visit(child, registry, out);
    }
}
