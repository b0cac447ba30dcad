//! CLI command implementations

pub mod apply;
pub mod filters;
pub mod info;

use anyhow::{Context, Result};
use convkit_core::PixelBuffer;
use convkit_ops::FilterConfig;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    convkit_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    convkit_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Builds the filter config from an optional YAML file and a worker override.
pub fn load_config(path: Option<&Path>, workers: Option<usize>) -> Result<FilterConfig> {
    let mut config = match path {
        Some(path) => FilterConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => FilterConfig::default(),
    };
    if let Some(workers) = workers {
        config.workers = workers;
    }
    config.validate().context("Invalid filter config")?;
    Ok(config)
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_worker_override() {
        let config = load_config(None, Some(3)).unwrap();
        assert_eq!(config.workers, 3);
        assert!(load_config(None, Some(0)).is_err());
        assert_eq!(load_config(None, None).unwrap(), FilterConfig::default());
    }
}
