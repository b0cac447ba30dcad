//! Apply command
//!
//! Reads a BMP, runs the filter chain and writes the result, logging the
//! time spent in each phase.

use crate::ApplyArgs;
use anyhow::{Context, Result};
use convkit_ops::{apply_chain, FilterConfig};
use std::time::Instant;
use tracing::{info, trace};

pub fn run(args: ApplyArgs, mut config: FilterConfig, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), filters = args.filters.len(), "apply::run");

    if let Some(threshold) = args.black_threshold {
        config.black_threshold = threshold;
    }
    if let Some(threshold) = args.white_threshold {
        config.white_threshold = threshold;
    }

    let total = Instant::now();

    let started = Instant::now();
    let image = super::load_image(&args.input)?;
    let read_time = started.elapsed();
    info!(width = image.width(), height = image.height(), elapsed = ?read_time, "read input");

    if verbose {
        let names: Vec<&str> = args.filters.iter().map(|f| f.name()).collect();
        println!(
            "Applying {} to {} ({}x{}, {} workers)",
            names.join(" -> "),
            args.input.display(),
            image.width(),
            image.height(),
            config.workers
        );
    }

    let started = Instant::now();
    let output = apply_chain(image, &args.filters, &config).context("Filter pipeline failed")?;
    let process_time = started.elapsed();
    info!(elapsed = ?process_time, "processed");

    if args.dry_run {
        info!("dry run, output not written");
    } else {
        let started = Instant::now();
        super::save_image(&args.output, &output)?;
        info!(path = %args.output.display(), elapsed = ?started.elapsed(), "wrote output");
    }

    let total_time = total.elapsed();
    info!(elapsed = ?total_time, "total");

    if verbose {
        println!(
            "Done in {:.3}s (read {:.3}s, process {:.3}s)",
            total_time.as_secs_f64(),
            read_time.as_secs_f64(),
            process_time.as_secs_f64()
        );
    }

    Ok(())
}
