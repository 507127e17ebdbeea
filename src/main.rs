//! Enctrace CLI
//!
//! Analyzes per-frame timing traces emitted by a multi-stage video
//! encoder pipeline and writes latency/CPU-time report tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use enctrace::commands::{execute_analyze, validate_args, AnalyzeArgs};
use enctrace::utils::config::SCHEMA_VERSION;
use env_logger::Env;
use std::path::PathBuf;

/// Enctrace - per-frame timing analysis for encoder pipeline traces
#[derive(Parser, Debug)]
#[command(name = "enctrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a trace file and write report tables
    Analyze {
        /// Path to the raw trace file
        #[arg(short, long)]
        input: PathBuf,

        /// Total frame count of the encoded sequence
        #[arg(short, long)]
        frames: usize,

        /// Output directory (defaults to "<input stem>-ana")
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Also write per-frame raw event split files
        #[arg(long)]
        split_frames: bool,

        /// Print a short run summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            frames,
            out_dir,
            split_frames,
            summary,
        } => {
            let args = AnalyzeArgs {
                input,
                frame_count: frames,
                out_dir,
                split_frames,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute analysis
            execute_analyze(args)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Enctrace v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Per-frame timing analysis for video encoder pipeline traces.");
}
