use indexmap::IndexSet;
use serde_json::Value;

/// Recursively collect every string-valued `$ref` in `value`, in document order.
pub fn collect_refs(value: &Value, refs: &mut IndexSet<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_refs(item, refs);
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref") {
                refs.insert(ref_path.clone());
            }
            for child in map.values() {
                collect_refs(child, refs);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_collects_nested_refs_once() {
        let doc = json!({
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": { "schema": { "$ref": "#/definitions/Pet" } },
                            "404": { "schema": { "$ref": "#/definitions/Error" } },
                        }
                    }
                }
            },
            "definitions": {
                "Pet": {
                    "properties": {
                        "owner": { "$ref": "https://x/people.json#/Person" },
                        "siblings": { "items": { "$ref": "#/definitions/Pet" } },
                    }
                }
            }
        });
        let mut refs = IndexSet::new();
        collect_refs(&doc, &mut refs);
        let refs: Vec<_> = refs.into_iter().collect();
        assert_eq!(
            refs,
            vec![
                "#/definitions/Pet",
                "#/definitions/Error",
                "https://x/people.json#/Person",
            ]
        );
    }

    #[test]
    fn test_ignores_non_string_ref() {
        let mut refs = IndexSet::new();
        collect_refs(&json!({ "$ref": 42, "a": [{ "$ref": "#/x" }] }), &mut refs);
        assert_eq!(refs.len(), 1);
        assert!(refs.contains("#/x"));
    }
}
