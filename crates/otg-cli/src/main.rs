use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use otg_core::config::{
    self, CONFIG_FILE_NAME, GenerateOptions, IndentStyle, LogLevel, PropertyNaming, SplitStrategy,
};
use otg_core::generate_types;
use otg_core::load::SpecInput;
use otg_core::pipeline::{Analysis, analyze};
use otg_core::resolve::HttpResolver;
use otg_typescript::TypeScriptGenerator;

#[derive(Parser)]
#[command(name = "otg", about = "OpenAPI/Swagger to TypeScript type generator", version)]
struct Cli {
    /// Itemized diagnostics and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript declarations from a spec
    Generate(GenerateArgs),

    /// Load and resolve a spec, then print a summary
    Validate {
        /// Spec path or URL (YAML or JSON)
        input: String,
    },

    /// Print the resolved registry, operations and, with --split, the group plan
    Inspect {
        /// Spec path or URL (YAML or JSON)
        input: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        /// Show the file plan for this grouping
        #[arg(long)]
        split: Option<SplitArg>,
    },

    /// Initialize a new otg configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Spec path or URL; falls back to `input` in the config file
    input: Option<String>,

    /// Output file, or directory when splitting; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Split types into one file per tag or path segment
    #[arg(long)]
    split: Option<SplitArg>,

    /// Write property names in camelCase
    #[arg(long)]
    camel: bool,

    /// Indent with tabs
    #[arg(long, conflicts_with = "indent")]
    tabs: bool,

    /// Indent with this many spaces
    #[arg(long)]
    indent: Option<usize>,

    /// Omit the header comment
    #[arg(long)]
    no_header: bool,

    /// Use this text as the header comment
    #[arg(long)]
    header_comment: Option<String>,

    /// Omit "Used by" endpoint hints
    #[arg(long)]
    no_endpoint_hints: bool,

    /// Config file to read
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum SplitArg {
    Tag,
    Path,
}

impl From<SplitArg> for SplitStrategy {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Tag => SplitStrategy::Tag,
            SplitArg::Path => SplitStrategy::Path,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args, cli.verbose).await,

        Commands::Validate { input } => cmd_validate(&input).await,

        Commands::Inspect {
            input,
            format,
            split,
        } => cmd_inspect(&input, format, split).await,

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "otg", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Config file values overridden by whatever was given on the command line.
fn merge_options(args: &GenerateArgs, verbose: bool) -> Result<GenerateOptions> {
    let mut options = match config::load_config(&args.config)? {
        Some(options) => {
            log::debug!("using config {}", args.config.display());
            options
        }
        None => GenerateOptions::default(),
    };

    if args.output.is_some() {
        options.output = args.output.clone();
    }
    if let Some(split) = args.split {
        options.split = Some(split.into());
    }
    if args.camel {
        options.property_naming = PropertyNaming::Camel;
    }
    if args.tabs {
        options.indent = IndentStyle::Tab;
    } else if let Some(spaces) = args.indent {
        options.indent = IndentStyle::Spaces(spaces);
    }
    if args.no_header {
        options.include_header = false;
    }
    if args.header_comment.is_some() {
        options.header_comment = args.header_comment.clone();
    }
    if args.no_endpoint_hints {
        options.include_endpoint_hints = false;
    }
    if verbose {
        options.log_level = LogLevel::Verbose;
    }
    Ok(options)
}

async fn cmd_generate(args: GenerateArgs, verbose: bool) -> Result<()> {
    let options = merge_options(&args, verbose)?;
    let input = args
        .input
        .clone()
        .or_else(|| options.input.clone())
        .context("no input given; pass a spec path or URL, or set `input` in the config file")?;
    let spec = SpecInput::from_arg(&input);

    let content = generate_types(&spec, &options, &HttpResolver::new(), &TypeScriptGenerator::new())
        .await
        .with_context(|| format!("failed to generate types for {input}"))?;

    match (&options.output, options.split) {
        (Some(dir), Some(_)) => eprintln!("Generated split types in {}", dir.display()),
        (Some(path), None) => eprintln!("Generated {}", path.display()),
        (None, _) => print!("{content}"),
    }
    Ok(())
}

async fn load_analysis(input: &str) -> Result<Analysis> {
    let spec = SpecInput::from_arg(input);
    analyze(&spec, &HttpResolver::new())
        .await
        .with_context(|| format!("failed to load {input}"))
}

async fn cmd_validate(input: &str) -> Result<()> {
    let analysis = load_analysis(input).await?;

    eprintln!("Valid {} spec: {}", analysis.version, input);
    eprintln!("  Schemas: {}", analysis.registry.len());
    eprintln!("  Operations: {}", analysis.operations.len());
    let edges: usize = analysis.graph.iter().map(|(_, deps)| deps.len()).sum();
    eprintln!("  References between schemas: {edges}");
    eprintln!("Validation successful.");
    Ok(())
}

async fn cmd_inspect(input: &str, format: InspectFormat, split: Option<SplitArg>) -> Result<()> {
    let analysis = load_analysis(input).await?;
    let summary = build_inspect_summary(&analysis, split.map(Into::into));

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{yaml}");
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{json}");
        }
    }
    Ok(())
}

fn build_inspect_summary(analysis: &Analysis, split: Option<SplitStrategy>) -> serde_json::Value {
    let schemas: Vec<serde_json::Value> = analysis
        .registry
        .keys()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "depends_on": analysis.graph.dependencies(name).collect::<Vec<_>>(),
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = analysis
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "method": op.method.as_str(),
                "path": op.path,
                "tags": op.tags,
                "types": op.type_names,
            })
        })
        .collect();

    let mut summary = serde_json::json!({
        "version": analysis.version.to_string(),
        "schemas": schemas,
        "operations": operations,
    });

    if let Some(strategy) = split {
        let (_, plan) = analysis.plan(strategy);
        let groups: Vec<serde_json::Value> = plan
            .groups
            .iter()
            .map(|group| {
                let imports: serde_json::Map<String, serde_json::Value> = group
                    .imports
                    .iter()
                    .map(|(owner, names)| (format!("{owner}.ts"), serde_json::json!(names)))
                    .collect();
                serde_json::json!({
                    "file": format!("{}.ts", group.id),
                    "types": group.types,
                    "imports": imports,
                })
            })
            .collect();
        let duplicates: Vec<String> = plan
            .duplicates
            .iter()
            .map(|dup| format!("{} ({}.ts, {}.ts)", dup.type_name, dup.first_group, dup.also_in))
            .collect();
        summary["groups"] = serde_json::json!(groups);
        summary["duplicates"] = serde_json::json!(duplicates);
    }
    summary
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
