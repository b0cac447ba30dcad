//! Image info command.
//!
//! Prints header fields and, with `--stats`, per-channel statistics.

use crate::InfoArgs;
use anyhow::{Context, Result};
use convkit_core::{Channel, Pixel, PixelBuffer};
use convkit_io::BmpHeader;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Runs the info command for every input.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        let header = read_header(path)?;

        println!("{}", path.display());
        println!("  Resolution: {}x{}", header.width, header.height);
        println!("  Pixels:     {}", header.width as u64 * header.height as u64);
        println!("  Bit depth:  {}", header.bits_per_pixel);
        println!("  File size:  {}", super::format_size(file_size));

        if verbose {
            println!("  Rows:       {}", if header.top_down { "top-down" } else { "bottom-up" });
            println!("  Header:     {} bytes", header.header_size);
            println!("  Data at:    {}", header.data_offset);
            println!("  Row stride: {}", header.row_stride());
        }

        if args.stats {
            let image = super::load_image(path)?;
            let stats = ChannelStats::compute(&image);
            for channel in Channel::ALL {
                let (min, max, mean) = stats.channel(channel);
                println!("  {:<6} min {:>3}  max {:>3}  mean {:>7.2}", format!("{channel:?}:"), min, max, mean);
            }
            println!("  Mean brightness: {:.2}", stats.mean_average);
        }

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}

fn read_header(path: &Path) -> Result<BmpHeader> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    BmpHeader::read(&mut BufReader::new(file))
        .with_context(|| format!("Failed to read header: {}", path.display()))
}

/// Per-channel minimum, maximum and mean.
struct ChannelStats {
    min: Pixel,
    max: Pixel,
    sums: [u64; 3],
    mean_average: f64,
    count: u64,
}

impl ChannelStats {
    fn compute(image: &PixelBuffer) -> Self {
        let mut min = Pixel::WHITE;
        let mut max = Pixel::BLACK;
        let mut sums = [0u64; 3];
        let mut average_sum = 0u64;

        for &px in image.samples() {
            for channel in Channel::ALL {
                let v = px.channel(channel);
                *min.channel_mut(channel) = min.channel(channel).min(v);
                *max.channel_mut(channel) = max.channel(channel).max(v);
                sums[channel as usize] += v as u64;
            }
            average_sum += px.average() as u64;
        }

        let count = image.pixel_count() as u64;
        Self {
            min,
            max,
            sums,
            mean_average: average_sum as f64 / count as f64,
            count,
        }
    }

    fn channel(&self, channel: Channel) -> (u8, u8, f64) {
        (
            self.min.channel(channel),
            self.max.channel(channel),
            self.sums[channel as usize] as f64 / self.count as f64,
        )
    }
}
