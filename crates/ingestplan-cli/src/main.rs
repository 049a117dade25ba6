//! ingestplan CLI: allocate an inventory and render the bundle.

mod logging;

use clap::{Args, Parser, Subcommand};
use ingestplan_core::config::AllocationConfig;
use ingestplan_core::plan::Plan;
use ingestplan_core::table::TableRecord;
use ingestplan_io::{parse_config_yaml, read_inventory_path, write_bundle, ConfigDoc, FsBundleSink};
use ingestplan_planner::{allocate, summarize, validate_config, validate_inventory};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser)]
#[command(name = "ingestplan")]
#[command(about = "Allocate source tables into ingestion pipelines and gateways", long_about = None)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the inventory and configuration without allocating
    Validate {
        #[command(flatten)]
        alloc: AllocArgs,
    },

    /// Allocate and print the plan (EXPLAIN)
    Plan {
        #[command(flatten)]
        alloc: AllocArgs,

        /// Print the plan as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Allocate, render YAML documents, and write the bundle
    Generate {
        #[command(flatten)]
        alloc: AllocArgs,

        /// Output directory for the bundle
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct AllocArgs {
    /// Path to the inventory CSV
    #[arg(short, long)]
    inventory: PathBuf,

    /// Optional YAML config file (overrides environment)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Max tables per pipeline (overrides config)
    #[arg(long)]
    pipeline_table_cap: Option<usize>,

    /// Max tables per gateway (overrides config)
    #[arg(long)]
    gateway_table_cap: Option<usize>,

    /// Row count at which a table is large (overrides config)
    #[arg(long)]
    large_table_threshold: Option<u64>,

    /// Destination catalog (overrides config)
    #[arg(long)]
    destination_catalog: Option<String>,

    /// Destination schema (overrides config)
    #[arg(long)]
    destination_schema: Option<String>,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.debug) {
        eprintln!("Warning: {}", e);
    }

    let outcome = match cli.command {
        Commands::Validate { alloc } => validate_cmd(&alloc),
        Commands::Plan { alloc, json } => plan_cmd(&alloc, json),
        Commands::Generate { alloc, output } => generate_cmd(&alloc, &output),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn validate_cmd(args: &AllocArgs) -> CliResult<()> {
    let (cfg, inventory) = load(args)?;
    validate_config(&cfg)?;
    validate_inventory(&inventory)?;
    println!("✓ Inventory is valid ({} tables)", inventory.len());
    Ok(())
}

fn plan_cmd(args: &AllocArgs, json: bool) -> CliResult<()> {
    let (cfg, inventory) = load(args)?;
    let plan = allocate(&inventory, &cfg)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_report(&plan, &cfg)?;
    }
    Ok(())
}

fn generate_cmd(args: &AllocArgs, output: &Path) -> CliResult<()> {
    let (cfg, inventory) = load(args)?;
    let plan = allocate(&inventory, &cfg)?;

    let sink = FsBundleSink::new(output);
    let manifest = write_bundle(&plan, &cfg.defaults, &sink)?;

    println!("✓ Bundle written to {}", output.display());
    println!("  Documents: {}", manifest.documents.len());
    println!(
        "  Gateways: {}  Pipelines: {}  Tables: {}",
        manifest.gateways, manifest.pipelines, manifest.tables
    );
    println!("  Plan hash: {}", manifest.plan_hash);
    Ok(())
}

fn load(args: &AllocArgs) -> CliResult<(AllocationConfig, Vec<TableRecord>)> {
    let doc = match &args.config {
        Some(path) => Some(parse_config_yaml(&fs::read_to_string(path)?)?),
        None => None,
    };
    let cfg = build_config(AllocationConfig::from_env(), doc.as_ref(), args)?;

    let inventory = read_inventory_path(&args.inventory)?;
    if inventory.is_empty() {
        warn!(path = %args.inventory.display(), "inventory has no rows");
    }
    Ok((cfg, inventory))
}

/// Layer config: `base` (defaults + env) < config file < CLI flags.
fn build_config(
    base: AllocationConfig,
    doc: Option<&ConfigDoc>,
    args: &AllocArgs,
) -> CliResult<AllocationConfig> {
    let mut cfg = base;
    if let Some(doc) = doc {
        doc.apply(&mut cfg)?;
    }
    if let Some(cap) = args.pipeline_table_cap {
        cfg.pipeline_table_cap = cap;
    }
    if let Some(cap) = args.gateway_table_cap {
        cfg.gateway_table_cap = cap;
    }
    if let Some(threshold) = args.large_table_threshold {
        cfg.large_table_threshold = threshold;
    }
    if let Some(catalog) = &args.destination_catalog {
        cfg.defaults.destination_catalog_default = catalog.clone();
    }
    if let Some(schema) = &args.destination_schema {
        cfg.defaults.destination_schema_default = Some(schema.clone());
    }
    Ok(cfg)
}

fn print_report(plan: &Plan, cfg: &AllocationConfig) -> CliResult<()> {
    let s = summarize(plan);

    println!("Allocation Plan");
    println!("===============");
    println!();
    println!("Caps:");
    println!("  Tables per pipeline: {}", cfg.pipeline_table_cap);
    println!("  Tables per gateway: {}", cfg.gateway_table_cap);
    println!("  Large table threshold: {} rows", cfg.large_table_threshold);
    println!();
    println!("Summary:");
    println!("  Servers: {}", s.servers);
    println!("  Tables: {} ({} known rows)", s.tables, s.total_rows);
    println!(
        "  Pipelines: {} (priority {}, large {}, normal {})",
        s.pipelines, s.priority_pipelines, s.large_pipelines, s.normal_pipelines
    );
    println!(
        "  Gateways: {} (max load {} tables)",
        s.gateways, s.max_gateway_tables
    );
    println!("  Plan hash: {}", plan.fingerprint()?.short());
    println!();

    for g in &plan.gateways {
        println!(
            "{} - {} pipelines, {} tables",
            g.name(),
            g.pipelines.len(),
            g.table_count()
        );
        for p in &g.pipelines {
            println!(
                "  {}. {} [{}] {} tables, {} rows",
                p.id.get() + 1,
                p.name(),
                p.connection_names().join(", "),
                p.table_count(),
                p.total_rows()
            );
        }
    }
    Ok(())
}
