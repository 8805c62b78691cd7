//! Intake binary entry point

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use intake::{
    config::parse_threshold, FuzzyDuplicateDetector, IntakeConfig, IntakeError, IntakeResult,
    IntakeSubmission, Registrar,
};
use shared::{logging, process_info, CsvRecordStore, ProcessId};

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Registers new members into the pending set after duplicate screening")]
struct Args {
    /// Record store directory (overrides FAMILY_STORE_DIR)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Fuzzy name match threshold 0-100 (overrides DUPLICATE_THRESHOLD)
    #[arg(long)]
    threshold: Option<String>,

    /// Also treat name containment as a duplicate
    #[arg(long)]
    containment: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Screen and append a registration to the pending set
    Register(SubmissionArgs),
    /// Screen a registration without writing it
    Check(SubmissionArgs),
}

#[derive(ClapArgs)]
struct SubmissionArgs {
    #[arg(long)]
    name: String,

    /// MALE or FEMALE
    #[arg(long)]
    gender: String,

    /// Age range such as 20-24
    #[arg(long)]
    age_range: String,

    /// Phone number, e.g. 08123456789 or +2348123456789
    #[arg(long)]
    phone: String,
}

impl From<SubmissionArgs> for IntakeSubmission {
    fn from(args: SubmissionArgs) -> Self {
        IntakeSubmission {
            name: args.name,
            gender: args.gender,
            age_range: args.age_range,
            phone: args.phone,
        }
    }
}

#[tokio::main]
async fn main() -> IntakeResult<()> {
    let _ = dotenv::dotenv();
    let args = Args::parse();

    ProcessId::init_intake();
    logging::init_tracing_with_level(Some(&args.log_level));

    let mut config = IntakeConfig::from_env()?;
    if let Some(dir) = args.store_dir {
        config.store_dir = dir;
    }
    if let Some(raw) = args.threshold.as_deref() {
        config.duplicate_threshold = parse_threshold(raw)?;
    }
    config.containment |= args.containment;

    logging::log_startup(
        ProcessId::current(),
        &format!("intake against {}", config.store_dir.display()),
    );

    let store = CsvRecordStore::new(config.store_dir.clone());
    let detector = FuzzyDuplicateDetector::with_containment(config.containment);
    let registrar = Registrar::new(store, detector, config);

    let outcome = match args.command {
        Command::Register(submission) => registrar.register(&submission.into()).await,
        Command::Check(submission) => registrar.check(&submission.into()).await,
    };

    match outcome {
        Ok(member) => {
            process_info!(ProcessId::current(), "Accepted: {}", member.describe());
            logging::log_success(ProcessId::current(), "Registration screened successfully");
            Ok(())
        }
        Err(err @ IntakeError::DuplicateConflict { .. }) => {
            logging::log_error(ProcessId::current(), "Duplicate screening", &err);
            Err(err)
        }
        Err(err) => {
            logging::log_error(ProcessId::current(), "Registration", &err);
            Err(err)
        }
    }
}
