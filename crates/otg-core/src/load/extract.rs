use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use super::refs::collect_refs;
use super::{LoadResult, SpecVersion};
use crate::schema::SchemaNode;

/// Build a [`LoadResult`] from a parsed root document of a known dialect.
///
/// Schemas come from `definitions` (Swagger 2.0) or `components.schemas`
/// (OpenAPI 3.x). Non-object entries are skipped; object entries are read
/// leniently, so a loosely written schema never aborts loading.
pub fn extract_schemas(document: Value, version: SpecVersion) -> LoadResult {
    let mut refs = IndexSet::new();
    collect_refs(&document, &mut refs);

    let section = match version {
        SpecVersion::Swagger2 => document.get("definitions"),
        SpecVersion::OpenApi3 => document
            .get("components")
            .and_then(|components| components.get("schemas")),
    };

    let mut registry = IndexMap::new();
    if let Some(Value::Object(schemas)) = section {
        for (name, value) in schemas {
            if !value.is_object() {
                log::warn!("skipping schema '{name}': not an object");
                continue;
            }
            registry.insert(name.clone(), SchemaNode::from_value(value));
        }
    }

    LoadResult {
        version,
        document,
        registry,
        refs,
    }
}

/// Extract the schema collection of an externally fetched document.
///
/// Checked in order: a top-level `definitions` object, then
/// `components.schemas`, then every object-valued top-level key.
pub fn extract_document_schemas(document: &Map<String, Value>) -> IndexMap<String, SchemaNode> {
    let section = if let Some(Value::Object(definitions)) = document.get("definitions") {
        definitions
    } else if let Some(Value::Object(schemas)) = document
        .get("components")
        .and_then(|components| components.get("schemas"))
    {
        schemas
    } else {
        document
    };

    let mut schemas = IndexMap::new();
    for (name, value) in section {
        if !value.is_object() {
            continue;
        }
        schemas.insert(name.clone(), SchemaNode::from_value(value));
    }
    schemas
}
