use otg_core::naming::ref_type_name;
use otg_core::schema::SchemaNode;
use serde_json::Value;

/// Map a schema node to its TypeScript type string representation.
///
/// `$ref`s become the referenced type name; a reference that names no type
/// (an external address without a fragment) maps to `unknown`.
pub fn schema_to_ts(schema: &SchemaNode) -> String {
    let ts = base_type(schema);
    let bottom = matches!(ts.as_str(), "null" | "unknown" | "never");
    if schema.is_nullable() && !bottom && !ts.ends_with("| null") {
        format!("{} | null", wrap_compound(&ts))
    } else {
        ts
    }
}

/// True if the node is an object literal with its own properties, nullable or not.
pub fn is_inline_object(schema: &SchemaNode) -> bool {
    !schema.properties.is_empty()
        && base_type(schema)
            .split(" | ")
            .all(|variant| variant == "object" || variant == "null")
}

fn base_type(schema: &SchemaNode) -> String {
    if schema.never {
        return "never".to_string();
    }
    if let Some(ref_path) = &schema.ref_path {
        return ref_type_name(ref_path).unwrap_or_else(|| "unknown".to_string());
    }
    if !schema.all_of.is_empty() {
        return join_variants(&schema.all_of, " & ");
    }
    if !schema.one_of.is_empty() {
        return join_variants(&schema.one_of, " | ");
    }
    if !schema.any_of.is_empty() {
        return join_variants(&schema.any_of, " | ");
    }
    if !schema.enum_values.is_empty() {
        return schema
            .enum_values
            .iter()
            .map(enum_literal)
            .collect::<Vec<_>>()
            .join(" | ");
    }

    let Some(types) = &schema.schema_type else {
        return if schema.properties.is_empty() {
            "unknown".to_string()
        } else {
            "object".to_string()
        };
    };
    let mut variants: Vec<String> = Vec::new();
    for name in types.names() {
        let ts = primitive_type(name, schema);
        if !variants.contains(&ts) {
            variants.push(ts);
        }
    }
    variants.join(" | ")
}

fn primitive_type(name: &str, schema: &SchemaNode) -> String {
    match name {
        "array" => match &schema.items {
            Some(items) => format!("{}[]", wrap_compound(&schema_to_ts(items))),
            None => "unknown[]".to_string(),
        },
        "object" => object_type(schema),
        "string" => "string".to_string(),
        "integer" | "number" => "number".to_string(),
        "boolean" => "boolean".to_string(),
        "file" => "File | Blob".to_string(),
        "null" => "null".to_string(),
        _ => "unknown".to_string(),
    }
}

/// `object`, or a `Record` when only `additionalProperties` describes the values.
fn object_type(schema: &SchemaNode) -> String {
    if !schema.properties.is_empty() {
        return "object".to_string();
    }
    match schema.extra.get("additionalProperties") {
        Some(value @ Value::Object(_)) => {
            format!("Record<string, {}>", schema_to_ts(&SchemaNode::from_value(value)))
        }
        Some(Value::Bool(true)) => "Record<string, unknown>".to_string(),
        _ => "object".to_string(),
    }
}

fn join_variants(variants: &[SchemaNode], separator: &str) -> String {
    variants
        .iter()
        .map(|variant| wrap_compound(&schema_to_ts(variant)))
        .collect::<Vec<_>>()
        .join(separator)
}

fn enum_literal(value: &Value) -> String {
    match value {
        Value::String(s) => serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\"")),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Parenthesize a union or intersection so it can be used as an operand.
fn wrap_compound(ts: &str) -> String {
    if ts.contains(" | ") || ts.contains(" & ") {
        format!("({ts})")
    } else {
        ts.to_string()
    }
}
