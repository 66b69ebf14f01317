use anyhow::Context;
use clap::{Parser, Subcommand};
use praxis_core::render::{OutputFormat, RenderOptions};
use praxis_core::{Compiler, Variables};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

mod catalog;

/// Praxis - Compiles agent prompt archetypes into prompt documents
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one or more archetypes (`"core.brain && agent.explore::yaml"`)
    Convert {
        /// Archetype classes joined by " && ", each optionally suffixed with `::<format>`
        sources: String,

        /// Emit JSON
        #[arg(long, group = "format")]
        json: bool,

        /// Emit pseudo-xml (default)
        #[arg(long, group = "format")]
        xml: bool,

        /// Emit YAML
        #[arg(long, group = "format")]
        yaml: bool,

        /// Emit TOML
        #[arg(long, group = "format")]
        toml: bool,

        /// Keep `meta` / `metadata` sections in the output
        #[arg(long)]
        meta: bool,

        /// JSON object of variable overrides, e.g. '{"EXPLORE_MODEL":"opus"}'
        #[arg(long, value_name = "JSON")]
        variables: Option<String>,
    },

    /// List the built-in archetype classes
    List,
}

/// One `class[::format]` entry of the sources argument
#[derive(Debug, PartialEq)]
struct Source {
    class: String,
    format: Option<OutputFormat>,
}

fn parse_source(entry: &str) -> anyhow::Result<Source> {
    match entry.rsplit_once("::") {
        Some((class, format)) => {
            let format = format
                .trim()
                .parse::<OutputFormat>()
                .with_context(|| format!("Invalid format suffix in '{}'", entry))?;
            Ok(Source {
                class: class.trim().to_string(),
                format: Some(format),
            })
        }
        None => Ok(Source {
            class: entry.to_string(),
            format: None,
        }),
    }
}

fn parse_sources(sources: &str) -> anyhow::Result<Vec<Source>> {
    sources
        .split("&&")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_source)
        .collect()
}

fn parse_variables(raw: Option<&str>) -> anyhow::Result<Map<String, Value>> {
    match raw {
        None => Ok(Map::new()),
        Some(raw) => serde_json::from_str(raw).context("--variables must be a JSON object"),
    }
}

/// Compile every source, each in its own document
fn convert(compiler: &Compiler, sources: &str, default_format: OutputFormat) -> anyhow::Result<Vec<String>> {
    let sources = parse_sources(sources)?;
    if sources.is_empty() {
        anyhow::bail!("No archetype classes given");
    }

    sources
        .iter()
        .map(|source| {
            let format = source.format.unwrap_or(default_format);
            tracing::info!("Converting {} as {}", source.class, format);
            compiler
                .compile(&source.class, format)
                .with_context(|| format!("Failed to convert '{}'", source.class))
        })
        .collect()
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            sources,
            json,
            xml: _,
            yaml,
            toml,
            meta,
            variables,
        } => {
            let default_format = if json {
                OutputFormat::Json
            } else if yaml {
                OutputFormat::Yaml
            } else if toml {
                OutputFormat::Toml
            } else {
                OutputFormat::Xml
            };

            let overrides = parse_variables(variables.as_deref())?;
            let compiler = Compiler::new(catalog::registry())
                .with_variables(Variables::from_env().with_overrides(overrides))
                .with_options(RenderOptions::new().with_omit_metadata(!meta));

            for output in convert(&compiler, &sources, default_format)? {
                println!("{}", output);
            }
        }
        Commands::List => {
            let registry = catalog::registry();
            tracing::debug!("{} archetypes in the catalog", registry.len());
            for class in registry.classes() {
                println!("{}", class);
            }
        }
    }

    Ok(())
}
