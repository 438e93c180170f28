mod output;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use yang_model_core::{BuildOptions, DataNodeContainer, Module, SchemaContext};
use yang_model_loader::{CompilerConfig, SchemaLoader};

use crate::output::{OutputFormat, format_context, format_grouping, format_rpc};

#[derive(Debug, Parser)]
#[command(name = "yang-compile")]
#[command(about = "Load, compile and inspect YANG schema modules stored as statement trees")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile modules and report errors without writing output.
    Check(CheckArgs),
    /// Compile modules and write the resolved model.
    Compile(CompileArgs),
    /// Print one compiled grouping or RPC.
    Inspect(InspectArgs),
}

/// Where documents come from and how they are built.
#[derive(Debug, Args)]
struct SourceArgs {
    /// Document files and/or directories of JSON/YAML documents.
    inputs: Vec<PathBuf>,
    /// Path to a compiler configuration YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Comma-separated module names to skip.
    #[arg(long)]
    exclude: Option<String>,
    /// Maximum nesting depth (overrides the configuration file).
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    sources: SourceArgs,
}

#[derive(Debug, Args)]
struct CompileArgs {
    #[command(flatten)]
    sources: SourceArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct InspectArgs {
    #[command(flatten)]
    sources: SourceArgs,
    /// Grouping to print, as `module:name`.
    #[arg(long, conflicts_with = "rpc", required_unless_present = "rpc")]
    grouping: Option<String>,
    /// RPC to print, as `module:name`.
    #[arg(long)]
    rpc: Option<String>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Compile(args) => run_compile(args),
        Command::Inspect(args) => run_inspect(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let context = compile_sources(&args.sources)?;
    let rpcs: usize = context.modules().map(|module| module.rpcs().len()).sum();
    let groupings: usize = context
        .modules()
        .map(|module| module.groupings().len())
        .sum();
    println!(
        "Compiled {} module(s): {} grouping(s), {} rpc(s).",
        context.len(),
        groupings,
        rpcs
    );
    Ok(())
}

fn run_compile(args: CompileArgs) -> Result<(), String> {
    let context = compile_sources(&args.sources)?;
    let raw = format_context(&context, args.format)?;

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(&path, raw)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!(
                "Wrote {} module(s) to '{}'.",
                context.len(),
                path.display()
            );
        }
        None => print!("{raw}"),
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let context = compile_sources(&args.sources)?;

    let raw = match (&args.grouping, &args.rpc) {
        (Some(target), _) => {
            let (module, name) = find_target(&context, target)?;
            let grouping = module
                .groupings()
                .get(&module.qname(name))
                .ok_or_else(|| format!("grouping '{name}' not found in module '{}'", module.name()))?;
            format_grouping(grouping, args.format)?
        }
        (None, Some(target)) => {
            let (module, name) = find_target(&context, target)?;
            let rpc = module
                .rpc(&module.qname(name))
                .ok_or_else(|| format!("rpc '{name}' not found in module '{}'", module.name()))?;
            format_rpc(rpc, args.format)?
        }
        (None, None) => return Err("one of --grouping or --rpc is required".to_string()),
    };

    print!("{raw}");
    if !raw.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Loads every source named on the command line or in the configuration
/// and compiles them into one context.
fn compile_sources(args: &SourceArgs) -> Result<SchemaContext, String> {
    let config = match &args.config {
        Some(path) => CompilerConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => CompilerConfig::default(),
    };

    let mut builder = SchemaLoader::builder();
    if let Some(path) = &args.config {
        let base = path.parent().unwrap_or(Path::new("."));
        builder = builder.with_config(&config, base);
    }
    for input in &args.inputs {
        builder = builder.source(input);
    }
    for module in parse_csv_list(args.exclude.as_deref()) {
        builder = builder.exclude(module);
    }

    let loader = builder.build().map_err(|err| err.to_string())?;
    debug!(modules = loader.len(), "loaded documents");

    let options = BuildOptions {
        max_depth: args.max_depth.unwrap_or(config.build.max_depth),
    };
    loader.compile(&options).map_err(|err| err.to_string())
}

/// Splits `module:name` and finds the module.
fn find_target<'c, 't>(
    context: &'c SchemaContext,
    target: &'t str,
) -> Result<(&'c Module, &'t str), String> {
    let (module, name) = target
        .split_once(':')
        .ok_or_else(|| format!("expected 'module:name', got '{target}'"))?;
    let module = context
        .module(module)
        .ok_or_else(|| format!("module '{module}' is not loaded"))?;
    Ok((module.as_ref(), name))
}

fn parse_csv_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}
