use chrono::{DateTime, Utc};
use otg_core::config::GenerateOptions;
use otg_core::paths::EndpointHints;
use otg_core::resolve::ResolvedSchemaMap;
use otg_core::split::SplitPlan;
use otg_core::{CodeGenerator, GeneratedFile, SplitOutput};
use thiserror::Error;

use crate::emitters;
use crate::emitters::declaration::{DeclarationContext, emit_declaration};

#[derive(Debug, Error)]
pub enum TypeScriptError {
    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),
}

/// TypeScript declaration generator.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptGenerator {
    /// Fixed header timestamp; the current time when unset.
    generated_at: Option<DateTime<Utc>>,
}

impl TypeScriptGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp headers with `generated_at` instead of the current time.
    pub fn with_timestamp(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: Some(generated_at),
        }
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.generated_at.unwrap_or_else(Utc::now)
    }
}

impl CodeGenerator for TypeScriptGenerator {
    type Error = TypeScriptError;

    fn generate_single(
        &self,
        registry: &ResolvedSchemaMap,
        options: &GenerateOptions,
        hints: &EndpointHints,
    ) -> Result<String, Self::Error> {
        let env = emitters::environment()?;
        let header = emitters::header::render_header(&env, options, self.timestamp())?;
        let ctx = DeclarationContext::new(registry, hints, options);

        let declarations: Vec<String> = registry
            .iter()
            .map(|(name, schema)| emit_declaration(name, schema, &ctx))
            .collect();
        let content = emitters::module::render_module(
            &env,
            header.as_deref(),
            &Default::default(),
            &declarations,
        )?;
        Ok(content)
    }

    fn generate_split(
        &self,
        registry: &ResolvedSchemaMap,
        plan: &SplitPlan,
        options: &GenerateOptions,
        hints: &EndpointHints,
    ) -> Result<SplitOutput, Self::Error> {
        let env = emitters::environment()?;
        let header = emitters::header::render_header(&env, options, self.timestamp())?;
        let ctx = DeclarationContext::new(registry, hints, options);

        let mut modules = Vec::with_capacity(plan.groups.len());
        for group in &plan.groups {
            let declarations: Vec<String> = group
                .types
                .iter()
                .filter_map(|name| {
                    let schema = registry.get(name);
                    if schema.is_none() {
                        log::warn!("no schema for planned type {name} in {}.ts", group.id);
                    }
                    schema.map(|schema| emit_declaration(name, schema, &ctx))
                })
                .collect();
            let content = emitters::module::render_module(
                &env,
                header.as_deref(),
                &group.imports,
                &declarations,
            )?;
            modules.push(GeneratedFile {
                path: format!("{}.ts", group.id),
                content,
            });
        }

        let index = GeneratedFile {
            path: "index.ts".to_string(),
            content: emitters::index::render_index(&env, header.as_deref(), &plan.exports)?,
        };
        Ok(SplitOutput { modules, index })
    }
}
