//! convkit - 3x3 convolution filters and edge detection for 24-bit BMP images

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use convkit_ops::Filter;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "convkit")]
#[command(author, version, about = "Convolution filters and edge detection for BMP images")]
#[command(long_about = "
Applies 3x3 convolution kernels, point transforms and edge detectors to
uncompressed 24-bit BMP files.

Examples:
  convkit apply in.bmp -o edges.bmp                     # Directional edge detection
  convkit apply in.bmp -o out.bmp -f greyscale -f sharpen
  convkit apply in.bmp -o out.bmp -f edge-detect --black-threshold 40
  convkit -j 8 apply big.bmp -o out.bmp --dry-run      # Time without writing
  convkit info in.bmp --stats
  convkit filters
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Row partitions per convolution (overrides config)
    #[arg(short = 'j', long, global = true)]
    workers: Option<usize>,

    /// Rayon thread pool size (0 = auto)
    #[arg(short = 't', long, global = true, default_value = "0")]
    threads: usize,

    /// YAML filter config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply filters to an image
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// List available filters
    Filters,
}

/// Arguments for the `apply` command.
#[derive(Args)]
struct ApplyArgs {
    /// Input BMP
    input: PathBuf,

    /// Output BMP
    #[arg(short, long)]
    output: PathBuf,

    /// Filters to apply, in order
    #[arg(short, long = "filter", default_value = "directional-edges")]
    filters: Vec<Filter>,

    /// Average below which pixels are blacked out
    #[arg(long)]
    black_threshold: Option<u8>,

    /// Average above which pixels are whitened
    #[arg(long)]
    white_threshold: Option<u8>,

    /// Process but skip writing the output
    #[arg(long)]
    dry_run: bool,
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Input BMP(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Show per-channel statistics
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
            }),
        )
        .with_target(true)
        .with_level(true)
        .init();

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Apply(args) => {
            let config = commands::load_config(cli.config.as_deref(), cli.workers)?;
            commands::apply::run(args, config, cli.verbose)
        }
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Filters => commands::filters::run(cli.verbose),
    }
}
