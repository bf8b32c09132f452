use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The `type` keyword: a single type name or, in OpenAPI 3.1, a list of them.
///
/// Type names are kept as strings so dialect-specific values such as Swagger's
/// `file` survive loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSet {
    /// Every type name in declaration order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            TypeSet::Single(t) => vec![t.as_str()],
            TypeSet::Multiple(types) => types.iter().map(String::as_str).collect(),
        }
    }
}

/// One JSON-Schema-like node as found in `definitions` or `components.schemas`.
///
/// Fields this crate reasons about are typed; everything else a dialect may
/// carry (`additionalProperties`, `discriminator`, `x-*` extensions, ...) is
/// preserved untouched in `extra`. Reading a node never fails: a keyword whose
/// value has an unexpected shape (Swagger's per-property `required: true`, a
/// non-string `description`) lands in `extra` as well.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SchemaNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    // Composition
    #[serde(rename = "allOf", skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,

    #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,

    #[serde(rename = "anyOf", skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaNode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    /// The boolean schema `false`: no value matches.
    #[serde(skip)]
    pub never: bool,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(SchemaNode::from_value(&value))
    }
}

impl SchemaNode {
    /// Read a node from an arbitrary JSON value.
    ///
    /// `true` (and any other non-object) is the empty schema, `false` is a
    /// schema nothing matches.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            Value::Bool(false) => SchemaNode {
                never: true,
                ..Default::default()
            },
            _ => SchemaNode::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let mut node = SchemaNode::default();
        for (key, value) in map {
            let known = match (key.as_str(), value) {
                ("type", Value::String(t)) => {
                    node.schema_type = Some(TypeSet::Single(t.clone()));
                    true
                }
                ("type", Value::Array(types)) if types.iter().all(Value::is_string) => {
                    let names = types.iter().filter_map(Value::as_str).map(str::to_string);
                    node.schema_type = Some(TypeSet::Multiple(names.collect()));
                    true
                }
                ("format", Value::String(s)) => {
                    node.format = Some(s.clone());
                    true
                }
                ("$ref", Value::String(s)) => {
                    node.ref_path = Some(s.clone());
                    true
                }
                ("description", Value::String(s)) => {
                    node.description = Some(s.clone());
                    true
                }
                ("title", Value::String(s)) => {
                    node.title = Some(s.clone());
                    true
                }
                ("items", Value::Object(_) | Value::Bool(_)) => {
                    node.items = Some(Box::new(Self::from_value(value)));
                    true
                }
                ("properties", Value::Object(props)) => {
                    node.properties = props
                        .iter()
                        .map(|(name, prop)| (name.clone(), Self::from_value(prop)))
                        .collect();
                    true
                }
                ("required", Value::Array(names)) => {
                    let names = names.iter().filter_map(Value::as_str).map(str::to_string);
                    node.required = names.collect();
                    true
                }
                ("enum", Value::Array(values)) => {
                    node.enum_values = values.clone();
                    true
                }
                ("allOf", Value::Array(parts)) => {
                    node.all_of = parts.iter().map(Self::from_value).collect();
                    true
                }
                ("oneOf", Value::Array(parts)) => {
                    node.one_of = parts.iter().map(Self::from_value).collect();
                    true
                }
                ("anyOf", Value::Array(parts)) => {
                    node.any_of = parts.iter().map(Self::from_value).collect();
                    true
                }
                ("nullable", Value::Bool(b)) => {
                    node.nullable = Some(*b);
                    true
                }
                _ => false,
            };
            if !known {
                node.extra.insert(key.clone(), value.clone());
            }
        }
        node
    }

    /// True if `type` is exactly `name`, or a list containing it.
    pub fn has_type(&self, name: &str) -> bool {
        self.schema_type
            .as_ref()
            .is_some_and(|t| t.names().contains(&name))
    }

    /// True if the node is explicitly nullable, either via `nullable: true`
    /// or a `null` entry in a type list.
    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true)
            || matches!(&self.schema_type, Some(TypeSet::Multiple(types)) if types.iter().any(|t| t == "null"))
    }

    /// Direct children in a fixed order: `allOf`, `oneOf`, `anyOf`, `items`, `properties`.
    pub fn children(&self) -> impl Iterator<Item = &SchemaNode> {
        self.all_of
            .iter()
            .chain(&self.one_of)
            .chain(&self.any_of)
            .chain(self.items.as_deref())
            .chain(self.properties.values())
    }
}
