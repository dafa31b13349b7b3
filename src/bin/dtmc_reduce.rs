use clap::Parser;
use dtmc_reduce::Dtmc;
use env_logger::Builder;
use log::LevelFilter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dtmc_reduce")]
#[command(about = "Reduce a sparse Markov chain to the states relevant for reaching a target")]
struct Args {
    /// Path prefix of the model (expects <PREFIX>.tra and <PREFIX>.lab)
    #[arg(value_name = "PREFIX")]
    model: PathBuf,

    /// Label carried by exactly one state, used as the initial state
    #[arg(long, default_value = "init", require_equals = true)]
    initial_label: String,

    /// Label carried by the target states
    #[arg(long, default_value = "target", require_equals = true)]
    target_label: String,

    /// Write the reduced chain (in absorbing form) as <PREFIX>.tra and <PREFIX>.lab
    #[arg(long, value_name = "PREFIX", require_equals = true)]
    output: Option<PathBuf>,

    /// Logging verbosity (use -v for info, or -v=LEVEL for specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
        }
    }
}

fn main() {
    let args = Args::parse();

    // Configure logging:
    // Handle verbose flag: None = not specified, Some(None) = specified without value (defaults to info), Some(Some(level)) = specified with value
    let log_level = match args.verbose {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(level)) => level.into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let lab_path = with_suffix(&args.model, ".lab");
    let tra_path = with_suffix(&args.model, ".tra");
    let chain = Dtmc::from_files(&lab_path, &tra_path).unwrap_or_else(|e| {
        eprintln!("Failed to load model {}: {}", args.model.display(), e);
        std::process::exit(1);
    });

    println!(
        "Loaded chain with {} states and {} transitions.",
        chain.state_count(),
        chain.transitions().positive_count()
    );

    let (reduced, mapping) = chain.reduce(&args.initial_label, &args.target_label);

    println!(
        "Reduced chain has {} states (plus target and fail), {} transitions.",
        reduced.state_count(),
        reduced.transitions().positive_count()
    );
    println!(
        "One-step target probability of the initial state: {}",
        reduced.to_target()[reduced.initial()]
    );
    println!(
        "Synthetic states: target={}, fail={}.",
        mapping.target_index(),
        mapping.fail_index()
    );

    if let Some(output) = args.output {
        let absorbing = reduced.to_absorbing_chain();
        let (tra_path, lab_path) = absorbing.save(&output).unwrap_or_else(|e| {
            eprintln!("Failed to save reduced model {}: {}", output.display(), e);
            std::process::exit(1);
        });
        println!(
            "Saved reduced chain to {} and {}.",
            tra_path.display(),
            lab_path.display()
        );
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.to_path_buf();
    path.as_mut_os_string().push(suffix);
    path
}
