//! skillforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "skillforge",
    version,
    about = "Learner assessment scoring and mastery tracking engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate submission batches
    Evaluate {
        /// Path to a .toml batch file or directory
        #[arg(long)]
        submissions: PathBuf,

        /// Output directory
        #[arg(long, default_value = "./skillforge-results")]
        output: PathBuf,

        /// Output format: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Max concurrent evaluations (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Replay an activity log and show per-skill progress
    Progress {
        /// Path to a .toml activity log
        #[arg(long)]
        log: PathBuf,

        /// Show a single user only
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Rank users by total points
    Leaderboard {
        /// Path to a .toml activity log
        #[arg(long)]
        log: PathBuf,

        /// Maximum entries to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Validate batch and activity-log TOML files
    Validate {
        /// Path to an input file or directory
        #[arg(long)]
        input: PathBuf,
    },

    /// Create starter config and sample input files
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            submissions,
            output,
            format,
            parallelism,
            config,
        } => commands::evaluate::execute(submissions, output, format, parallelism, config).await,
        Commands::Progress { log, user, config } => {
            commands::progress::execute(log, user, config).await
        }
        Commands::Leaderboard { log, limit } => commands::leaderboard::execute(log, limit).await,
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
