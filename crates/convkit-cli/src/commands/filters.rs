//! Filters command: lists every selectable filter.

use anyhow::Result;
use convkit_ops::{Filter, FilterConfig};

pub fn run(verbose: bool) -> Result<()> {
    for filter in Filter::ALL {
        println!("  {:<18} {}", filter.name(), filter.description());
    }

    if verbose {
        let defaults = FilterConfig::default();
        println!();
        println!("Default config:");
        print!("{}", defaults.to_yaml_string()?);
    }

    Ok(())
}
