//! Faultscope CLI - variable visibility reports for compiled-program fault sites

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use faultscope::config::{self, FaultscopeConfig};
use faultscope::range::RangeLocator;
use faultscope::{instrument, loader, location, ui, Analyzer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "faultscope")]
#[command(version = "0.0.1")]
#[command(about = "Report the source variables visible at fault locations, from debug metadata")]
#[command(long_about = r#"
Faultscope reads the debug metadata of a compiled module and reports, for
each fault location, the source-level variables lexically visible there -
the candidates a fault-localization or instrumentation pass should look at.

Example usage:
  faultscope analyze --module app.json --at test.c:14 --at test.c:27
  faultscope probes --module app.json --at test.c:14
  faultscope ranges --module app.json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report visible variables at fault locations
    Analyze {
        /// Path to the module graph JSON
        #[arg(short, long)]
        module: Option<PathBuf>,

        /// Fault location as <filename>:<line> (repeatable)
        #[arg(short = 'a', long = "at")]
        at: Vec<String>,

        /// Path to the config file (defaults to ./faultscope.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print a printf probe per fault location
    Probes {
        /// Path to the module graph JSON
        #[arg(short, long)]
        module: Option<PathBuf>,

        /// Fault location as <filename>:<line> (repeatable)
        #[arg(short = 'a', long = "at")]
        at: Vec<String>,

        /// Path to the config file (defaults to ./faultscope.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the function line ranges the locator derives
    Ranges {
        /// Path to the module graph JSON
        #[arg(short, long)]
        module: Option<PathBuf>,

        /// Path to the config file (defaults to ./faultscope.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show module graph statistics
    Stats {
        /// Path to the module graph JSON
        #[arg(short, long)]
        module: Option<PathBuf>,

        /// Path to the config file (defaults to ./faultscope.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write a starter faultscope.toml
    Init {
        /// Where to write the config
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Analyze {
            module,
            at,
            config,
            format,
        } => {
            let (module_path, fault_specs) = resolve_inputs(module, at, config.as_deref())?;
            let faults = parse_faults(&fault_specs)?;

            let started = Instant::now();
            let spinner = ui::Spinner::new("Loading module graph");
            let module = match loader::load_module(&module_path) {
                Ok(module) => module,
                Err(e) => {
                    spinner.finish_and_clear();
                    return Err(e.into());
                }
            };
            spinner.set_message("Resolving scopes");
            let analysis = Analyzer::new(&module).run(&faults);
            spinner.finish_and_clear();

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                ui::header(&format!("Fault scope report for {}", module.source_filename));
                ui::status(
                    ui::Icons::FILE,
                    "Module graph",
                    &module_path.display().to_string(),
                );
                for (fault, bindings) in &analysis.results {
                    ui::section(&fault.to_string());
                    if bindings.is_empty() {
                        println!("{}", ui::muted("no variables visible"));
                    } else {
                        println!("{}", ui::table::variables_table(bindings));
                    }
                }
                for warning in &analysis.warnings {
                    ui::warn(&warning.to_string());
                }
                let stats = analysis.stats();
                ui::finish_summary(
                    started.elapsed(),
                    stats.locations,
                    stats.bindings,
                    stats.warnings,
                );
            }
        }

        Commands::Probes { module, at, config } => {
            let (module_path, fault_specs) = resolve_inputs(module, at, config.as_deref())?;
            let faults = parse_faults(&fault_specs)?;

            let module = loader::load_module(&module_path)?;
            let analysis = Analyzer::new(&module).run(&faults);

            if analysis.results.is_empty() {
                println!("∅ No fault location matched {}.", module.source_filename);
            }
            for (fault, bindings) in &analysis.results {
                println!("{}", instrument::printf_probe(fault, bindings));
            }
            for warning in &analysis.warnings {
                ui::warn(&warning.to_string());
            }
        }

        Commands::Ranges { module, config } => {
            let (module_path, _) = resolve_inputs(module, Vec::new(), config.as_deref())?;
            let module = loader::load_module(&module_path)?;
            let ranges = RangeLocator::new(&module).locate();

            if ranges.is_empty() {
                println!("∅ No function ranges located.");
            } else {
                let rows: Vec<_> = ranges
                    .iter()
                    .map(|range| (module.functions[range.function].name.clone(), *range))
                    .collect();
                ui::header(&format!("Function ranges in {}", module.source_filename));
                println!("{}", ui::table::ranges_table(&rows));
            }
        }

        Commands::Stats {
            module,
            config,
            format,
        } => {
            let (module_path, _) = resolve_inputs(module, Vec::new(), config.as_deref())?;
            let module = loader::load_module(&module_path)?;
            let stats = module.stats();

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                ui::header(&format!("Module statistics ({})", module.source_filename));
                ui::status(
                    ui::Icons::FILE,
                    "Module graph",
                    &module_path.display().to_string(),
                );
                let functions = stats.functions.to_string();
                let blocks = stats.basic_blocks.to_string();
                let instructions = stats.instructions.to_string();
                let globals = stats.globals.to_string();
                let scopes = stats.scope_nodes.to_string();
                let metadata = stats.metadata_nodes.to_string();
                println!(
                    "{}",
                    ui::table::stats_table(&[
                        ("Functions", functions.as_str()),
                        ("Basic blocks", blocks.as_str()),
                        ("Instructions", instructions.as_str()),
                        ("Globals", globals.as_str()),
                        ("Scope nodes", scopes.as_str()),
                        ("Metadata nodes", metadata.as_str()),
                    ])
                );
            }
        }

        Commands::Init { path, force } => {
            let path = path.unwrap_or_else(config::default_config_path);
            let starter = FaultscopeConfig {
                module: Some(PathBuf::from("module.json")),
                faults: Vec::new(),
            };
            config::write_config(&path, &starter, force)?;
            ui::success(&format!("Wrote {}", path.display()));
            ui::info("Next", "set `module` and `faults`, then run `faultscope analyze`");
        }
    }

    Ok(())
}

/// Merge CLI flags with the config file; flags win.
fn resolve_inputs(
    module: Option<PathBuf>,
    at: Vec<String>,
    config_path: Option<&Path>,
) -> anyhow::Result<(PathBuf, Vec<String>)> {
    let config = config::load_config(config_path)?;

    let module = module
        .or_else(|| config.as_ref().and_then(|c| c.module.clone()))
        .ok_or_else(|| {
            anyhow::anyhow!("no module graph given (use --module or set `module` in faultscope.toml)")
        })?;

    let faults = if at.is_empty() {
        config.map(|c| c.faults).unwrap_or_default()
    } else {
        at
    };

    Ok((module, faults))
}

/// Parse fault specs; bad ones are reported and skipped, not fatal.
fn parse_faults(
    specs: &[String],
) -> anyhow::Result<std::collections::BTreeSet<faultscope::FaultLocation>> {
    if specs.is_empty() {
        anyhow::bail!("no fault locations given (use --at or set `faults` in faultscope.toml)");
    }

    let (faults, rejected) = location::parse_many(specs);
    for (_, err) in &rejected {
        ui::error(&err.to_string());
    }
    if faults.is_empty() {
        anyhow::bail!("none of the fault locations parsed");
    }
    Ok(faults)
}
