pub mod extract;
pub mod refs;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::error::LoadError;
use crate::resolve::Resolver;
use crate::schema::SchemaNode;

pub use extract::{extract_document_schemas, extract_schemas};
pub use refs::collect_refs;

/// Where a spec comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecInput {
    Path(PathBuf),
    Url(String),
    Document(Value),
}

impl SpecInput {
    /// Classify a command-line style argument: `http(s)://` is a URL, anything else a path.
    pub fn from_arg(arg: &str) -> Self {
        if crate::naming::is_external_ref(arg) {
            SpecInput::Url(arg.to_string())
        } else {
            SpecInput::Path(PathBuf::from(arg))
        }
    }

    /// Human-readable origin, used as the default header source label.
    pub fn label(&self) -> Option<String> {
        match self {
            SpecInput::Path(path) => Some(path.display().to_string()),
            SpecInput::Url(url) => Some(url.clone()),
            SpecInput::Document(_) => None,
        }
    }
}

/// Detected spec dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecVersion {
    /// Swagger 2.0: schemas under `definitions`.
    Swagger2,
    /// OpenAPI 3.x: schemas under `components.schemas`.
    OpenApi3,
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecVersion::Swagger2 => f.write_str("Swagger 2.0"),
            SpecVersion::OpenApi3 => f.write_str("OpenAPI 3.x"),
        }
    }
}

/// A loaded document with its local schema registry and every `$ref` it contains.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub version: SpecVersion,
    pub document: Value,
    /// Schema key (as written in the document) → schema.
    pub registry: IndexMap<String, SchemaNode>,
    /// All `$ref` values found anywhere in the document, local and external.
    pub refs: IndexSet<String>,
}

/// Text format of a document, decided by its extension or content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` / `.yml` are YAML; everything else is read as JSON.
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::Json
        }
    }
}

/// Parse document text in the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, LoadError> {
    let value = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml_ng::from_str(content)?,
    };
    Ok(value)
}

/// Load a spec, detect its dialect, and extract its local schemas.
///
/// URLs are fetched through `resolver`, the same capability used for
/// external `$ref`s.
pub async fn load<R: Resolver>(input: &SpecInput, resolver: &R) -> Result<LoadResult, LoadError> {
    let document = read_document(input, resolver).await?;
    let version = detect_version(&document)?;
    Ok(extract_schemas(document, version))
}

async fn read_document<R: Resolver>(input: &SpecInput, resolver: &R) -> Result<Value, LoadError> {
    match input {
        SpecInput::Path(path) => read_file(path),
        SpecInput::Url(url) => {
            log::debug!("fetching spec {url}");
            resolver
                .resolve(url)
                .await
                .map_err(|source| LoadError::Fetch {
                    url: url.clone(),
                    source,
                })
        }
        SpecInput::Document(value) => Ok(value.clone()),
    }
}

fn read_file(path: &Path) -> Result<Value, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let format = DocumentFormat::from_path(&path.to_string_lossy());
    parse_document(&content, format)
}

/// Detect the dialect from the root version marker.
pub fn detect_version(document: &Value) -> Result<SpecVersion, LoadError> {
    let root = document.as_object().ok_or(LoadError::NotAnObject)?;

    if root.get("swagger").and_then(Value::as_str) == Some("2.0") {
        return Ok(SpecVersion::Swagger2);
    }
    if let Some(openapi) = root.get("openapi").and_then(Value::as_str)
        && is_openapi3_version(openapi)
    {
        return Ok(SpecVersion::OpenApi3);
    }

    let found = root
        .get("openapi")
        .or_else(|| root.get("swagger"))
        .map_or_else(|| "no version marker".to_string(), Value::to_string);
    Err(LoadError::UnsupportedVersion(found))
}

/// Matches `3.<digits>.<digits>` at the start of the string.
fn is_openapi3_version(version: &str) -> bool {
    let Some(rest) = version.strip_prefix("3.") else {
        return false;
    };
    let Some((minor, patch)) = rest.split_once('.') else {
        return false;
    };
    !minor.is_empty()
        && minor.chars().all(|c| c.is_ascii_digit())
        && patch.starts_with(|c: char| c.is_ascii_digit())
}
