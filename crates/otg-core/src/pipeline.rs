use indexmap::IndexSet;

use crate::config::{GenerateOptions, SplitStrategy};
use crate::error::GenerateError;
use crate::graph::DependencyGraph;
use crate::load::{SpecInput, SpecVersion, load};
use crate::output::{write_file, write_files};
use crate::paths::{OperationRefs, collect_operation_refs, endpoint_hints};
use crate::resolve::{ResolvedSchemaMap, Resolver, resolve};
use crate::split::{GroupAssignment, SplitPlan, assign_groups, report_duplicates};
use crate::CodeGenerator;

/// A loaded and resolved spec, ready to be planned and emitted.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub version: SpecVersion,
    pub registry: ResolvedSchemaMap,
    pub operations: Vec<OperationRefs>,
    pub graph: DependencyGraph,
}

impl Analysis {
    /// Assign groups under `strategy`, reconcile them, and plan the files.
    pub fn plan(&self, strategy: SplitStrategy) -> (GroupAssignment, SplitPlan) {
        let names: IndexSet<String> = self.registry.keys().cloned().collect();
        let mut assignment = assign_groups(&self.operations, &names, strategy);
        assignment.reconcile(&self.graph);
        let plan = SplitPlan::build(&self.graph, &assignment);
        for group in &plan.groups {
            log::debug!("group {}: {} type(s)", group.id, group.types.len());
        }
        (assignment, plan)
    }
}

/// Load, resolve and index a spec.
pub async fn analyze<R: Resolver>(
    input: &SpecInput,
    resolver: &R,
) -> Result<Analysis, GenerateError> {
    let loaded = load(input, resolver).await?;
    log::debug!(
        "loaded {} ({} local schemas, {} refs)",
        loaded.version,
        loaded.registry.len(),
        loaded.refs.len()
    );
    let registry = resolve(&loaded, resolver).await?;
    let operations = collect_operation_refs(&loaded.document, loaded.version);
    let graph = DependencyGraph::build(&registry);
    Ok(Analysis {
        version: loaded.version,
        registry,
        operations,
        graph,
    })
}

/// Generate TypeScript declarations for a spec.
///
/// Options are validated before anything is read or fetched. Returns the
/// single-file content, or in split mode the content of the index file after
/// every group file has been written under `options.output`.
pub async fn generate_types<R, G>(
    input: &SpecInput,
    options: &GenerateOptions,
    resolver: &R,
    generator: &G,
) -> Result<String, GenerateError>
where
    R: Resolver,
    G: CodeGenerator,
{
    options.validate()?;

    let analysis = analyze(input, resolver).await?;

    let mut options = options.clone();
    if options.source_label.is_none() {
        options.source_label = input.label();
    }

    let hints = if options.include_endpoint_hints {
        endpoint_hints(&analysis.operations, &analysis.registry)
    } else {
        Default::default()
    };

    match (options.split, options.output.as_deref()) {
        (Some(strategy), Some(dir)) => {
            let (_, plan) = analysis.plan(strategy);
            report_duplicates(&plan.duplicates, options.log_level);

            let output = generator
                .generate_split(&analysis.registry, &plan, &options, &hints)
                .map_err(emit_error)?;
            write_files(dir, &output.modules)?;
            write_file(&dir.join(&output.index.path), &output.index.content)?;
            log::info!(
                "wrote {} module(s) and {} to {}",
                output.modules.len(),
                output.index.path,
                dir.display()
            );
            Ok(output.index.content)
        }
        _ => {
            let content = generator
                .generate_single(&analysis.registry, &options, &hints)
                .map_err(emit_error)?;
            if let Some(path) = options.output.as_deref() {
                write_file(path, &content)?;
                log::info!("wrote {}", path.display());
            }
            Ok(content)
        }
    }
}

fn emit_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> GenerateError {
    GenerateError::Emit(Box::new(err))
}
