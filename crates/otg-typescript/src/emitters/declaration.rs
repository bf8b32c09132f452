use indexmap::IndexMap;
use otg_core::config::{GenerateOptions, PropertyNaming};
use otg_core::naming::{camel_case, ref_type_name};
use otg_core::paths::EndpointHints;
use otg_core::resolve::ResolvedSchemaMap;
use otg_core::schema::SchemaNode;

use super::escape_jsdoc;
use crate::type_mapper::{is_inline_object, schema_to_ts};

/// Everything a declaration needs besides its own schema.
pub struct DeclarationContext<'a> {
    pub registry: &'a ResolvedSchemaMap,
    pub hints: &'a EndpointHints,
    pub naming: PropertyNaming,
    pub indent: String,
}

impl<'a> DeclarationContext<'a> {
    pub fn new(
        registry: &'a ResolvedSchemaMap,
        hints: &'a EndpointHints,
        options: &GenerateOptions,
    ) -> Self {
        Self {
            registry,
            hints,
            naming: options.property_naming,
            indent: options.indent.unit(),
        }
    }
}

/// Format text as a JSDoc block at the given indentation: one line when the
/// text is a single line, a starred block otherwise.
pub fn jsdoc(text: &str, indent: &str) -> String {
    let text = escape_jsdoc(text);
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= 1 {
        return format!("{indent}/** {text} */");
    }
    let mut out = format!("{indent}/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */"));
    out
}

fn with_format(comment: Option<String>, format: Option<&str>) -> Option<String> {
    match (comment, format.filter(|f| !f.is_empty())) {
        (Some(text), Some(format)) => Some(format!("{text}\n\nFormat: {format}")),
        (None, Some(format)) => Some(format!("Format: {format}")),
        (comment, None) => comment,
    }
}

/// True if `name` can be written as a property key without quotes.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn property_key(key: &str, naming: PropertyNaming) -> String {
    let name = match naming {
        PropertyNaming::Preserve => key.to_string(),
        PropertyNaming::Camel => camel_case(key),
    };
    if is_identifier(&name) {
        name
    } else {
        format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Emit one exported declaration for a registry type.
///
/// - array schema → `export type X = T[];`
/// - `allOf` → `export interface X extends A, B { ... }`
/// - `enum` → literal union alias
/// - no properties → `Record<string, unknown>` for object-like schemas, an alias otherwise
/// - anything else → `export interface X { ... }`
pub fn emit_declaration(name: &str, schema: &SchemaNode, ctx: &DeclarationContext<'_>) -> String {
    let mut lines = vec![jsdoc(&declaration_comment(name, schema, ctx), "")];

    if schema.has_type("array") && let Some(items) = &schema.items {
        let item = schema_to_ts(items);
        let item = if item.contains(" | ") || item.contains(" & ") {
            format!("({item})")
        } else {
            item
        };
        lines.push(format!("export type {name} = {item}[];"));
        return lines.join("\n");
    }

    if !schema.all_of.is_empty() {
        let bases: Vec<String> = schema
            .all_of
            .iter()
            .filter_map(|part| part.ref_path.as_deref().and_then(ref_type_name))
            .collect();
        let properties = schema
            .all_of
            .iter()
            .map(|part| &part.properties)
            .find(|props| !props.is_empty())
            .unwrap_or(&schema.properties);
        let required = schema
            .all_of
            .iter()
            .map(|part| &part.required)
            .find(|req| !req.is_empty())
            .unwrap_or(&schema.required);

        if bases.is_empty() {
            lines.push(format!("export interface {name} {{"));
        } else {
            lines.push(format!("export interface {name} extends {} {{", bases.join(", ")));
        }
        property_lines(properties, required, ctx, &ctx.indent, &mut lines);
        lines.push("}".to_string());
        return lines.join("\n");
    }

    if !schema.enum_values.is_empty() {
        lines.push(format!("export type {name} = {};", schema_to_ts(schema)));
        return lines.join("\n");
    }

    if schema.properties.is_empty() {
        let target = if is_object_like(schema) {
            "Record<string, unknown>".to_string()
        } else {
            schema_to_ts(schema)
        };
        lines.push(format!("export type {name} = {target};"));
        return lines.join("\n");
    }

    lines.push(format!("export interface {name} {{"));
    property_lines(&schema.properties, &schema.required, ctx, &ctx.indent, &mut lines);
    lines.push("}".to_string());
    lines.join("\n")
}

/// Schemas that describe a bag of fields rather than a value.
fn is_object_like(schema: &SchemaNode) -> bool {
    let untyped = schema.schema_type.is_none()
        && schema.ref_path.is_none()
        && schema.one_of.is_empty()
        && schema.any_of.is_empty();
    untyped || (schema.has_type("object") && !schema.extra.contains_key("additionalProperties"))
}

fn declaration_comment(name: &str, schema: &SchemaNode, ctx: &DeclarationContext<'_>) -> String {
    let text = schema
        .description
        .clone()
        .or_else(|| schema.title.clone())
        .unwrap_or_else(|| name.to_string());
    let mut text = with_format(Some(text), schema.format.as_deref()).unwrap_or_default();

    if let Some(endpoints) = ctx.hints.get(name).filter(|e| !e.is_empty()) {
        text.push_str("\n\nUsed by:");
        for endpoint in endpoints {
            text.push_str(&format!("\n - {endpoint}"));
        }
    }
    text
}

fn property_comment(schema: &SchemaNode, ctx: &DeclarationContext<'_>) -> Option<String> {
    let comment = schema.description.clone().or_else(|| schema.title.clone()).or_else(|| {
        let referenced = schema.ref_path.as_deref().and_then(ref_type_name)?;
        let target = ctx.registry.get(&referenced);
        target
            .and_then(|t| t.description.clone().or_else(|| t.title.clone()))
            .or(Some(referenced))
    });
    with_format(comment, schema.format.as_deref())
}

fn property_lines(
    properties: &IndexMap<String, SchemaNode>,
    required: &[String],
    ctx: &DeclarationContext<'_>,
    indent: &str,
    lines: &mut Vec<String>,
) {
    for (key, prop) in properties {
        let optional = if required.contains(key) { "" } else { "?" };
        let key_ts = property_key(key, ctx.naming);
        if let Some(comment) = property_comment(prop, ctx) {
            lines.push(jsdoc(&comment, indent));
        }

        if is_inline_object(prop) {
            lines.push(format!("{indent}{key_ts}{optional}: {{"));
            let nested = format!("{indent}{}", ctx.indent);
            property_lines(&prop.properties, &prop.required, ctx, &nested, lines);
            let null = if prop.is_nullable() { " | null" } else { "" };
            lines.push(format!("{indent}}}{null};"));
        } else {
            lines.push(format!("{indent}{key_ts}{optional}: {};", schema_to_ts(prop)));
        }
    }
}
