use std::collections::HashSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::load::SpecVersion;
use crate::load::refs::collect_refs;
use crate::naming::{is_external_ref, ref_type_name};
use crate::resolve::ResolvedSchemaMap;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Every method, in the order operations are read from a path item.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    /// Lowercase key used in path items.
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation and the canonical type names it references.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRefs {
    pub path: String,
    pub method: HttpMethod,
    pub tags: Vec<String>,
    /// Canonical type names, transitively through local `$ref`s, in discovery order.
    pub type_names: Vec<String>,
}

/// An endpoint that uses a type, for "Used by" hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointHint {
    pub method: HttpMethod,
    pub path: String,
}

impl fmt::Display for EndpointHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Type name → endpoints referencing it.
pub type EndpointHints = IndexMap<String, Vec<EndpointHint>>;

/// Walk every path item and collect, per operation, its tags and referenced types.
///
/// Request and response bodies are inspected (`application/json` content in
/// OpenAPI 3.x; response `schema` and `in: body` parameters in Swagger 2.0).
/// Local references are followed recursively; external ones contribute their
/// name but are not followed.
pub fn collect_operation_refs(document: &Value, version: SpecVersion) -> Vec<OperationRefs> {
    let Some(Value::Object(paths)) = document.get("paths") else {
        return Vec::new();
    };

    let mut operations = Vec::new();
    for (path, item) in paths {
        let Value::Object(item) = item else {
            continue;
        };
        for method in HttpMethod::ALL {
            let Some(op @ Value::Object(_)) = item.get(method.key()) else {
                continue;
            };
            let tags = op
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            let schemas = match version {
                SpecVersion::OpenApi3 => openapi3_operation_schemas(document, op),
                SpecVersion::Swagger2 => swagger2_operation_schemas(document, op),
            };

            let mut type_names = IndexSet::new();
            let mut seen = HashSet::new();
            for schema in schemas {
                collect_type_names(schema, document, &mut seen, &mut type_names);
            }

            operations.push(OperationRefs {
                path: path.clone(),
                method,
                tags,
                type_names: type_names.into_iter().collect(),
            });
        }
    }
    operations
}

/// Group endpoints by the registry types they reference.
pub fn endpoint_hints(operations: &[OperationRefs], registry: &ResolvedSchemaMap) -> EndpointHints {
    let mut hints = EndpointHints::new();
    for op in operations {
        for name in &op.type_names {
            if registry.contains_key(name) {
                hints.entry(name.clone()).or_default().push(EndpointHint {
                    method: op.method,
                    path: op.path.clone(),
                });
            }
        }
    }
    hints
}

fn openapi3_operation_schemas<'a>(document: &'a Value, op: &'a Value) -> Vec<&'a Value> {
    let mut out = Vec::new();
    if let Some(Value::Object(responses)) = op.get("responses") {
        for response in responses.values() {
            out.extend(json_content_schema(follow_local(document, response)));
        }
    }
    if let Some(body) = op.get("requestBody") {
        out.extend(json_content_schema(follow_local(document, body)));
    }
    out
}

fn swagger2_operation_schemas<'a>(document: &'a Value, op: &'a Value) -> Vec<&'a Value> {
    let mut out = Vec::new();
    if let Some(Value::Object(responses)) = op.get("responses") {
        for response in responses.values() {
            out.extend(follow_local(document, response).get("schema"));
        }
    }
    if let Some(Value::Array(params)) = op.get("parameters") {
        for param in params {
            let param = follow_local(document, param);
            if param.get("in").and_then(Value::as_str) == Some("body") {
                out.extend(param.get("schema"));
            }
        }
    }
    out
}

fn json_content_schema(container: &Value) -> Option<&Value> {
    container
        .get("content")?
        .get("application/json")?
        .get("schema")
}

/// If `value` is a local `$ref` wrapper, return its target; otherwise `value` itself.
fn follow_local<'a>(document: &'a Value, value: &'a Value) -> &'a Value {
    value
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| resolve_local_ref(document, r))
        .unwrap_or(value)
}

/// Look up a local `$ref` (`#/a/b/c`) in the document. External refs yield `None`.
pub fn resolve_local_ref<'a>(document: &'a Value, ref_path: &str) -> Option<&'a Value> {
    if is_external_ref(ref_path) {
        return None;
    }
    let fragment = ref_path.split_once('#').map_or(ref_path, |(_, f)| f);
    if !fragment.starts_with('/') {
        return None;
    }
    document.pointer(fragment)
}

fn collect_type_names(
    schema: &Value,
    document: &Value,
    seen: &mut HashSet<String>,
    out: &mut IndexSet<String>,
) {
    let mut refs = IndexSet::new();
    collect_refs(schema, &mut refs);
    for ref_path in refs {
        let Some(name) = ref_type_name(&ref_path) else {
            continue;
        };
        out.insert(name);
        if !seen.insert(ref_path.clone()) {
            continue;
        }
        if let Some(target @ Value::Object(_)) = resolve_local_ref(document, &ref_path) {
            collect_type_names(target, document, seen, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_follows_local_refs_transitively() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Pet" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": {
                        "properties": {
                            "owner": { "$ref": "#/components/schemas/Owner" },
                            "parent": { "$ref": "#/components/schemas/Pet" }
                        }
                    },
                    "Owner": { "properties": { "name": { "type": "string" } } }
                }
            }
        });
        let ops = collect_operation_refs(&doc, SpecVersion::OpenApi3);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].method, HttpMethod::Get);
        assert_eq!(ops[0].type_names, vec!["Pet", "Owner"]);
    }

    #[test]
    fn test_follows_response_and_body_refs() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {
                "/pets": {
                    "post": {
                        "requestBody": { "$ref": "#/components/requestBodies/NewPet" },
                        "responses": {
                            "default": { "$ref": "#/components/responses/Error" }
                        }
                    }
                }
            },
            "components": {
                "requestBodies": {
                    "NewPet": {
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/NewPet" } }
                        }
                    }
                },
                "responses": {
                    "Error": {
                        "content": {
                            "application/json": { "schema": { "$ref": "#/components/schemas/Error" } }
                        }
                    }
                },
                "schemas": { "NewPet": {}, "Error": {} }
            }
        });
        let ops = collect_operation_refs(&doc, SpecVersion::OpenApi3);
        assert_eq!(ops[0].type_names, vec!["Error", "NewPet"]);
    }

    #[test]
    fn test_swagger2_body_parameter() {
        let doc = json!({
            "swagger": "2.0",
            "paths": {
                "/athlete": {
                    "put": {
                        "tags": ["Athletes"],
                        "parameters": [
                            { "in": "query", "name": "q", "type": "string" },
                            { "in": "body", "name": "body", "schema": { "$ref": "#/definitions/Update" } }
                        ],
                        "responses": {
                            "200": { "schema": { "$ref": "https://example.com/athlete.json#/DetailedAthlete" } }
                        }
                    }
                }
            },
            "definitions": { "Update": {} }
        });
        let ops = collect_operation_refs(&doc, SpecVersion::Swagger2);
        assert_eq!(ops[0].tags, vec!["Athletes"]);
        assert_eq!(ops[0].type_names, vec!["DetailedAthlete", "Update"]);
    }

    #[test]
    fn test_no_paths() {
        let doc = json!({ "openapi": "3.0.0", "paths": {} });
        assert!(collect_operation_refs(&doc, SpecVersion::OpenApi3).is_empty());
        let doc = json!({ "openapi": "3.0.0" });
        assert!(collect_operation_refs(&doc, SpecVersion::OpenApi3).is_empty());
    }

    #[test]
    fn test_endpoint_hints_only_for_registry_types() {
        let ops = vec![
            OperationRefs {
                path: "/pets".to_string(),
                method: HttpMethod::Get,
                tags: vec![],
                type_names: vec!["Pet".to_string(), "Missing".to_string()],
            },
            OperationRefs {
                path: "/pets".to_string(),
                method: HttpMethod::Post,
                tags: vec![],
                type_names: vec!["Pet".to_string()],
            },
        ];
        let mut registry = ResolvedSchemaMap::new();
        registry.insert("Pet".to_string(), Default::default());
        let hints = endpoint_hints(&ops, &registry);
        assert_eq!(hints.len(), 1);
        let pet: Vec<String> = hints["Pet"].iter().map(ToString::to_string).collect();
        assert_eq!(pet, vec!["GET /pets", "POST /pets"]);
    }
}
