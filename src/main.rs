use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser)]
#[command(name = "auditpipe")]
#[command(about = "Run static analyzers and gate on a single findings report")]
#[command(version)]
struct Cli {
    /// Path to the project (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Path to the config file (defaults to .auditpipe/config.toml in the project)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled analyzer and write the report
    Run {
        /// Report file (overrides settings.report)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Also write the report as JSON
        #[arg(long)]
        json_report: Option<PathBuf>,

        /// Run analyzers concurrently
        #[arg(long)]
        parallel: bool,

        /// Only run these analyzers (repeatable)
        #[arg(short, long = "analyzer")]
        analyzers: Vec<String>,
    },

    /// Print a previously written report
    View {
        /// Report file (overrides settings.report)
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Initialize a new .auditpipe/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(cli::EXIT_FATAL)
        }
    }
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    // Determine the project directory
    let work_dir = cli.path.unwrap_or_else(|| PathBuf::from("."));

    match cli.command.unwrap_or(Commands::Run {
        report: None,
        json_report: None,
        parallel: false,
        analyzers: Vec::new(),
    }) {
        Commands::Run {
            report,
            json_report,
            parallel,
            analyzers,
        } => {
            let options = cli::run::RunOptions {
                report,
                json_report,
                parallel,
                analyzers,
            };
            let passed = cli::run::run_command(&work_dir, cli.config, options).await?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(cli::EXIT_FAILED)
            })
        }
        Commands::View { report } => {
            cli::view::view_command(&work_dir, cli.config, report)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            cli::init::init_command(&work_dir, cli.config, force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
