//! Allocator binary entry point

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use allocator::{
    config::{parse_family_names, parse_priority},
    numbered_families, restructure_file, AllocationMode, AllocationPlan, AllocatorConfig, DistributionStats,
    FamilyAssigner, DEFAULT_FAMILY_COUNT,
};
use shared::{logging, process_info, CsvRecordStore, FamilyName, ProcessId, RecordStore};

#[derive(Parser)]
#[command(name = "allocator")]
#[command(about = "Assigns pending members to families and restructures rosters")]
struct Args {
    /// Record store directory (overrides FAMILY_STORE_DIR)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    LeastLoaded,
    Stratified,
}

impl From<ModeArg> for AllocationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::LeastLoaded => AllocationMode::LeastLoaded,
            ModeArg::Stratified => AllocationMode::Stratified,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Place every pending member into a family
    Assign {
        /// Show the placements without writing them
        #[arg(long)]
        dry_run: bool,

        #[arg(long, value_enum, default_value = "least-loaded")]
        mode: ModeArg,

        /// Shuffle the pending batch first
        #[arg(long)]
        shuffle: bool,

        /// Shuffle seed (implies --shuffle, overrides FAMILY_SHUFFLE_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Families that must exist even when empty (repeatable, overrides FAMILY_NAMES)
        #[arg(long = "family")]
        families: Vec<String>,

        /// Lower a family's starting count for this run, as `name=offset` (repeatable)
        #[arg(long)]
        priority: Vec<String>,
    },

    /// Redistribute a whole roster CSV into balanced families
    Restructure {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Number of families named `Family 1..N`
        #[arg(long, default_value_t = DEFAULT_FAMILY_COUNT)]
        families: usize,

        /// Comma separated family names (overrides --families)
        #[arg(long)]
        names: Option<String>,

        #[arg(long)]
        seed: Option<u64>,

        /// Also write a plain-text roster grouped by family
        #[arg(long)]
        roster_output: Option<PathBuf>,
    },

    /// Print distribution statistics for the assigned set
    Stats {
        /// Emit JSON instead of text tables
        #[arg(long)]
        json: bool,
    },
}

/// Explicit seed, else configured seed, else a fresh one when shuffling was asked for
fn resolve_seed(explicit: Option<u64>, configured: Option<u64>, shuffle: bool) -> Option<u64> {
    explicit
        .or(configured)
        .or_else(|| shuffle.then(rand::random::<u64>))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    let args = Args::parse();

    ProcessId::init_allocator();
    logging::init_tracing_with_level(Some(&args.log_level));

    let mut config = AllocatorConfig::from_env()?;
    if let Some(dir) = args.store_dir {
        config.store_dir = dir;
    }

    logging::log_startup(
        ProcessId::current(),
        &format!("allocator against {}", config.store_dir.display()),
    );

    match args.command {
        Command::Assign {
            dry_run,
            mode,
            shuffle,
            seed,
            families,
            priority,
        } => {
            if !families.is_empty() {
                config.family_names = parse_family_names(&families.join(","));
            }
            if !priority.is_empty() {
                config.priority = priority
                    .iter()
                    .map(|raw| parse_priority(raw))
                    .collect::<Result<_, _>>()?;
            }
            let plan = AllocationPlan::new(mode.into())
                .with_shuffle_seed(resolve_seed(seed, config.shuffle_seed, shuffle));
            if let Some(seed) = plan.shuffle_seed {
                process_info!(ProcessId::current(), "🔀 Shuffle seed {}", seed);
            }

            let assigner = FamilyAssigner::new(CsvRecordStore::new(config.store_dir.clone()), config);
            let outcome = if dry_run {
                assigner.preview(&plan).await
            } else {
                assigner.run(&plan).await
            };

            match outcome {
                Ok(summary) => {
                    print!("{}", summary.render_text());
                    logging::log_success(ProcessId::current(), "Assignment run complete");
                }
                Err(err) => {
                    logging::log_error(ProcessId::current(), "Assignment run", &err);
                    return Err(err.into());
                }
            }
        }

        Command::Restructure {
            input,
            output,
            families,
            names,
            seed,
            roster_output,
        } => {
            let family_names: Vec<FamilyName> = match names {
                Some(raw) => parse_family_names(&raw),
                None => numbered_families(families),
            };
            logging::log_progress(
                ProcessId::current(),
                "Restructuring",
                &format!("{} into {} families", input.display(), family_names.len()),
            );

            let outcome = restructure_file(&input, &output, &family_names, seed.or(config.shuffle_seed))
                .await
                .with_context(|| format!("restructuring {}", input.display()))?;

            println!("Before\n{}", outcome.before.render_text());
            println!("After\n{}", outcome.after.render_text());

            if let Some(path) = roster_output {
                tokio::fs::write(&path, outcome.roster().render_text())
                    .await
                    .with_context(|| format!("writing roster to {}", path.display()))?;
            }
            logging::log_success(ProcessId::current(), "Restructure complete");
        }

        Command::Stats { json } => {
            let store = CsvRecordStore::new(config.store_dir.clone());
            let stats = DistributionStats::from_records(&store.read_assigned().await?);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", stats.render_text());
            }
        }
    }

    Ok(())
}
