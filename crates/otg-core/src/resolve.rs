use std::collections::{HashSet, VecDeque};
use std::future::Future;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::error::{FetchError, ResolveError};
use crate::load::refs::collect_refs;
use crate::load::{DocumentFormat, LoadResult, extract_document_schemas};
use crate::naming::{base_address, is_external_ref, type_name};
use crate::schema::SchemaNode;

/// Resolved registry: canonical type name → schema, in insertion order.
///
/// Local schemas come first in document order, followed by externally
/// fetched ones in fetch order.
pub type ResolvedSchemaMap = IndexMap<String, SchemaNode>;

/// Fetches an external document by absolute address.
///
/// This is the only network-facing capability of the pipeline. Any closure
/// `Fn(String) -> impl Future<Output = Result<Value, FetchError>>` is a resolver.
pub trait Resolver {
    fn resolve(&self, url: &str) -> impl Future<Output = Result<Value, FetchError>>;
}

impl<F, Fut> Resolver for F
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Value, FetchError>>,
{
    fn resolve(&self, url: &str) -> impl Future<Output = Result<Value, FetchError>> {
        self(url.to_string())
    }
}

/// Default resolver: HTTP GET, non-success status is a failure.
///
/// The body is read as YAML when the response content type mentions `yaml`
/// or the URL path ends in `.yaml`/`.yml`, and as JSON otherwise.
#[derive(Debug, Clone, Default)]
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Resolver for HttpResolver {
    async fn resolve(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let is_yaml_content = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("yaml"));
        let format = if is_yaml_content {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::from_path(response.url().path())
        };

        let body = response.text().await?;
        let value = match format {
            DocumentFormat::Json => serde_json::from_str(&body)?,
            DocumentFormat::Yaml => serde_yaml_ng::from_str(&body)?,
        };
        Ok(value)
    }
}

/// Resolve a loaded spec into a flat registry keyed by canonical type name.
///
/// Local schemas are copied as-is; their `$ref`s stay pointer strings and are
/// looked up by name at emission time. Every external document referenced
/// anywhere (directly or from another fetched document) is fetched exactly
/// once, breadth-first in discovery order. Fetched schemas never replace a
/// name that is already present.
///
/// Any fetch failure aborts the whole resolution.
pub async fn resolve<R: Resolver>(
    load_result: &LoadResult,
    resolver: &R,
) -> Result<ResolvedSchemaMap, ResolveError> {
    let (mut resolved, collisions) = canonical_registry(&load_result.registry);
    for (name, canonical) in &collisions {
        log::warn!("schema '{name}' is also named {canonical}; it replaces the earlier {canonical}");
    }

    let mut pending: VecDeque<String> = VecDeque::new();
    let mut queued: HashSet<String> = HashSet::new();
    enqueue_external(&load_result.refs, &mut pending, &mut queued);

    let mut fetched: IndexSet<String> = IndexSet::new();
    let mut documents: Vec<IndexMap<String, SchemaNode>> = Vec::new();

    while let Some(url) = pending.pop_front() {
        if !fetched.insert(url.clone()) {
            continue;
        }
        log::debug!("fetching external document {url}");
        let raw = resolver
            .resolve(&url)
            .await
            .map_err(|source| ResolveError::Fetch {
                url: url.clone(),
                source,
            })?;
        let mut nested = IndexSet::new();
        collect_refs(&raw, &mut nested);
        let Value::Object(root) = raw else {
            return Err(ResolveError::NonObject { url });
        };
        enqueue_external(&nested, &mut pending, &mut queued);

        documents.push(extract_document_schemas(&root));
    }

    for schemas in documents {
        for (name, schema) in schemas {
            resolved.entry(type_name(&name)).or_insert(schema);
        }
    }

    log::debug!(
        "resolved {} schemas ({} external documents)",
        resolved.len(),
        fetched.len()
    );
    Ok(resolved)
}

/// Key local schemas by canonical name, in document order.
///
/// Returns the registry and every `(key, canonical name)` whose canonical
/// name was already taken. A later key replaces the earlier schema but keeps
/// its position.
fn canonical_registry(
    schemas: &IndexMap<String, SchemaNode>,
) -> (ResolvedSchemaMap, Vec<(String, String)>) {
    let mut resolved = ResolvedSchemaMap::new();
    let mut collisions = Vec::new();
    for (name, schema) in schemas {
        let canonical = type_name(name);
        if resolved.insert(canonical.clone(), schema.clone()).is_some() {
            collisions.push((name.clone(), canonical));
        }
    }
    (resolved, collisions)
}

fn enqueue_external(
    refs: &IndexSet<String>,
    pending: &mut VecDeque<String>,
    queued: &mut HashSet<String>,
) {
    for ref_path in refs {
        if !is_external_ref(ref_path) {
            continue;
        }
        let base = base_address(ref_path);
        if queued.insert(base.to_string()) {
            pending.push_back(base.to_string());
        }
    }
}
