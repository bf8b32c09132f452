pub mod config;
pub mod error;
pub mod graph;
pub mod load;
pub mod naming;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod resolve;
pub mod schema;
pub mod split;

pub use pipeline::generate_types;

/// A generated file with path (relative to the output directory) and content.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Result of a split run: one module per planned group, and the index that
/// re-exports them.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutput {
    pub modules: Vec<GeneratedFile>,
    pub index: GeneratedFile,
}

/// Trait for emitters that turn a resolved registry into source text.
pub trait CodeGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every registry type in one document.
    fn generate_single(
        &self,
        registry: &resolve::ResolvedSchemaMap,
        options: &config::GenerateOptions,
        hints: &paths::EndpointHints,
    ) -> Result<String, Self::Error>;

    /// One file per planned group plus an index.
    fn generate_split(
        &self,
        registry: &resolve::ResolvedSchemaMap,
        plan: &split::SplitPlan,
        options: &config::GenerateOptions,
        hints: &paths::EndpointHints,
    ) -> Result<SplitOutput, Self::Error>;
}
