//! Named filters and composite pipelines.
//!
//! A [`Filter`] is either a single convolution, a single-pass point
//! transform, or one of the composite edge detectors. Stages take ownership
//! of the current buffer and hand back the next one; a convolution drops its
//! input as soon as the output exists.
//!
//! # Directional edge detection
//!
//! ```text
//! Start -> Greyscaled -> Blurred -> FourGradientsComputed -> Combined -> Thresholded -> Done
//! ```
//!
//! The four Sobel passes read the same blurred buffer and run concurrently;
//! the per-channel max-combine waits for all four.
//!
//! # Example
//!
//! ```rust
//! use convkit_core::{Pixel, PixelBuffer};
//! use convkit_ops::{apply_chain, Filter, FilterConfig};
//!
//! let img = PixelBuffer::filled(8, 8, Pixel::new(200, 40, 90)).unwrap();
//! let out = apply_chain(img, &[Filter::Greyscale, Filter::GaussianBlur], &FilterConfig::default()).unwrap();
//! assert_eq!(out.pixel(3, 3), Pixel::grey(110));
//! ```

use crate::convolve::convolve;
use crate::kernel::{Direction, Kernel, KernelKind};
use crate::parallel::join4;
use crate::point;
use crate::{FilterConfig, OpsError, OpsResult};
use convkit_core::{Channel, PixelBuffer};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// A selectable filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Identity convolution.
    Identity,
    /// Box blur convolution.
    BoxBlur,
    /// Gaussian blur convolution.
    GaussianBlur,
    /// Sharpen convolution.
    Sharpen,
    /// Emboss convolution.
    Emboss,
    /// Greyscale, gaussian blur, Laplacian, then `black_below`.
    EdgeDetect,
    /// Greyscale, gaussian blur, four Sobel passes, max-combine, `black_below`.
    DirectionalEdges,
    /// Channel average to grey.
    Greyscale,
    /// `255 - c`.
    Invert,
    /// Push channels away from grey by `saturate_weight`.
    Saturate,
    /// Pull channels toward grey by `desaturate_weight`.
    Desaturate,
    /// Add `brighten_amount`.
    Brighten,
    /// Subtract `darken_amount`.
    Darken,
    /// Black out pixels below `black_threshold`.
    BlackBelow,
    /// White out pixels above `white_threshold`.
    WhiteAbove,
    /// Keep one channel.
    Isolate(Channel),
    /// Exchange two channels.
    Swap(Channel, Channel),
}

impl Filter {
    /// Every filter, in the order `convkit filters` lists them.
    pub const ALL: [Filter; 21] = [
        Filter::Identity,
        Filter::BoxBlur,
        Filter::GaussianBlur,
        Filter::Sharpen,
        Filter::Emboss,
        Filter::EdgeDetect,
        Filter::DirectionalEdges,
        Filter::Greyscale,
        Filter::Invert,
        Filter::Saturate,
        Filter::Desaturate,
        Filter::Brighten,
        Filter::Darken,
        Filter::BlackBelow,
        Filter::WhiteAbove,
        Filter::Isolate(Channel::Red),
        Filter::Isolate(Channel::Green),
        Filter::Isolate(Channel::Blue),
        Filter::Swap(Channel::Red, Channel::Green),
        Filter::Swap(Channel::Red, Channel::Blue),
        Filter::Swap(Channel::Green, Channel::Blue),
    ];

    /// Kebab-case name used on the command line.
    pub fn name(self) -> &'static str {
        use Channel::*;
        match self {
            Filter::Identity => "identity",
            Filter::BoxBlur => "box-blur",
            Filter::GaussianBlur => "gaussian-blur",
            Filter::Sharpen => "sharpen",
            Filter::Emboss => "emboss",
            Filter::EdgeDetect => "edge-detect",
            Filter::DirectionalEdges => "directional-edges",
            Filter::Greyscale => "greyscale",
            Filter::Invert => "invert",
            Filter::Saturate => "saturate",
            Filter::Desaturate => "desaturate",
            Filter::Brighten => "brighten",
            Filter::Darken => "darken",
            Filter::BlackBelow => "black-below",
            Filter::WhiteAbove => "white-above",
            Filter::Isolate(Red) => "red-only",
            Filter::Isolate(Green) => "green-only",
            Filter::Isolate(Blue) => "blue-only",
            Filter::Swap(Red, Red) | Filter::Swap(Green, Green) | Filter::Swap(Blue, Blue) => "identity",
            Filter::Swap(Red, Green) | Filter::Swap(Green, Red) => "swap-rg",
            Filter::Swap(Red, Blue) | Filter::Swap(Blue, Red) => "swap-rb",
            Filter::Swap(Green, Blue) | Filter::Swap(Blue, Green) => "swap-gb",
        }
    }

    /// One-line summary for listings.
    pub fn description(self) -> &'static str {
        match self {
            Filter::Identity => "copy through a 3x3 identity kernel",
            Filter::BoxBlur => "near-uniform 3x3 average",
            Filter::GaussianBlur => "1-2-1 binomial blur",
            Filter::Sharpen => "4-neighbour sharpen",
            Filter::Emboss => "diagonal relief",
            Filter::EdgeDetect => "greyscale, blur, Laplacian, black-below",
            Filter::DirectionalEdges => "greyscale, blur, four Sobel passes, max, black-below",
            Filter::Greyscale => "channel average to grey",
            Filter::Invert => "255 - c per channel",
            Filter::Saturate => "push channels away from grey",
            Filter::Desaturate => "pull channels toward grey",
            Filter::Brighten => "add a constant per channel",
            Filter::Darken => "subtract a constant per channel",
            Filter::BlackBelow => "black out pixels darker than the threshold",
            Filter::WhiteAbove => "white out pixels brighter than the threshold",
            Filter::Isolate(_) => "keep one channel",
            Filter::Swap(..) => "exchange two channels",
        }
    }

    /// The kernel for filters that are a single plain convolution.
    pub fn kernel_kind(self) -> Option<KernelKind> {
        match self {
            Filter::Identity => Some(KernelKind::Identity),
            Filter::BoxBlur => Some(KernelKind::BoxBlur),
            Filter::GaussianBlur => Some(KernelKind::GaussianBlur),
            Filter::Sharpen => Some(KernelKind::Sharpen),
            Filter::Emboss => Some(KernelKind::Emboss),
            _ => None,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match wanted.as_str() {
            "grayscale" | "grey" | "gray" => "greyscale",
            "blur" | "gauss" | "gaussian" => "gaussian-blur",
            "box" => "box-blur",
            "edges" | "canny" | "sobel" => "directional-edges",
            "edge" => "edge-detect",
            other => other,
        };
        Filter::ALL
            .into_iter()
            .find(|f| f.name() == alias)
            .ok_or_else(|| OpsError::InvalidParameter(format!("unknown filter '{s}'")))
    }
}

/// Applies one filter, consuming the buffer.
pub fn apply(mut buffer: PixelBuffer, filter: Filter, config: &FilterConfig) -> OpsResult<PixelBuffer> {
    trace!(filter = %filter, width = buffer.width(), height = buffer.height(), "apply");

    if let Some(kind) = filter.kernel_kind() {
        return replace_with_convolution(buffer, &kind.kernel(), config.workers);
    }

    match filter {
        Filter::EdgeDetect => return simple_edge_detection(buffer, config),
        Filter::DirectionalEdges => return directional_edges(buffer, config),
        Filter::Greyscale => point::greyscale(&mut buffer),
        Filter::Invert => point::invert(&mut buffer),
        Filter::Saturate => point::saturate(&mut buffer, config.saturate_weight),
        Filter::Desaturate => point::desaturate(&mut buffer, config.desaturate_weight),
        Filter::Brighten => point::brighten(&mut buffer, config.brighten_amount),
        Filter::Darken => point::darken(&mut buffer, config.darken_amount),
        Filter::BlackBelow => point::black_below(&mut buffer, config.black_threshold),
        Filter::WhiteAbove => point::white_above(&mut buffer, config.white_threshold),
        Filter::Isolate(channel) => point::isolate(&mut buffer, channel),
        Filter::Swap(a, b) => point::swap_channels(&mut buffer, a, b),
        // Handled by kernel_kind above.
        Filter::Identity | Filter::BoxBlur | Filter::GaussianBlur | Filter::Sharpen | Filter::Emboss => {}
    }
    Ok(buffer)
}

/// Applies `filters` left to right.
///
/// The config is validated once before the first stage runs.
pub fn apply_chain(
    buffer: PixelBuffer,
    filters: &[Filter],
    config: &FilterConfig,
) -> OpsResult<PixelBuffer> {
    config.validate()?;
    filters.iter().enumerate().try_fold(buffer, |buffer, (i, &filter)| {
        debug!(stage = i, filter = %filter, "running filter stage");
        apply(buffer, filter, config)
    })
}

/// Convolves and drops the superseded input.
fn replace_with_convolution(
    buffer: PixelBuffer,
    kernel: &Kernel,
    workers: usize,
) -> OpsResult<PixelBuffer> {
    let next = convolve(&buffer, kernel, workers)?;
    drop(buffer);
    Ok(next)
}

/// Greyscale, gaussian blur, Laplacian, then `black_below`.
pub fn simple_edge_detection(mut buffer: PixelBuffer, config: &FilterConfig) -> OpsResult<PixelBuffer> {
    point::greyscale(&mut buffer);
    let blurred = replace_with_convolution(buffer, &Kernel::GAUSSIAN_BLUR, config.workers)?;
    let mut edges = replace_with_convolution(blurred, &Kernel::EDGE_DETECT, config.workers)?;
    point::black_below(&mut edges, config.black_threshold);
    Ok(edges)
}

/// Stages of [`directional_edges`], reported in debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStage {
    /// Channels averaged to grey.
    Greyscaled,
    /// Gaussian blur applied.
    Blurred,
    /// All four Sobel responses available.
    FourGradientsComputed,
    /// Per-channel maximum taken.
    Combined,
    /// Dim pixels blacked out.
    Thresholded,
}

/// Full four-direction edge detector.
pub fn directional_edges(mut buffer: PixelBuffer, config: &FilterConfig) -> OpsResult<PixelBuffer> {
    point::greyscale(&mut buffer);
    debug!(stage = ?EdgeStage::Greyscaled, "directional edges");

    let blurred = replace_with_convolution(buffer, &Kernel::GAUSSIAN_BLUR, config.workers)?;
    debug!(stage = ?EdgeStage::Blurred, "directional edges");

    let gradients = directional_gradients(&blurred, config.workers)?;
    drop(blurred);
    debug!(stage = ?EdgeStage::FourGradientsComputed, "directional edges");

    let mut combined = combine_max(&gradients)?;
    drop(gradients);
    debug!(stage = ?EdgeStage::Combined, "directional edges");

    point::black_below(&mut combined, config.black_threshold);
    debug!(stage = ?EdgeStage::Thresholded, "directional edges");
    Ok(combined)
}

/// Runs the four Sobel convolutions of `blurred` concurrently.
///
/// Results are ordered as [`Direction::ALL`].
pub fn directional_gradients(blurred: &PixelBuffer, workers: usize) -> OpsResult<[PixelBuffer; 4]> {
    let gradient = |direction: Direction| convolve(blurred, &direction.kernel(), workers);
    let (top, bottom, left, right) = join4(
        || gradient(Direction::Top),
        || gradient(Direction::Bottom),
        || gradient(Direction::Left),
        || gradient(Direction::Right),
    );
    Ok([top?, bottom?, left?, right?])
}

/// Per-pixel, per-channel maximum across equally shaped buffers.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`] for an empty slice
/// - [`OpsError::SizeMismatch`] if any shape differs from the first
pub fn combine_max(buffers: &[PixelBuffer]) -> OpsResult<PixelBuffer> {
    let (first, rest) = buffers
        .split_first()
        .ok_or_else(|| OpsError::InvalidParameter("combine_max needs at least one buffer".into()))?;

    if let Some(bad) = rest.iter().find(|b| !first.same_shape(b)) {
        return Err(OpsError::SizeMismatch(format!(
            "{}x{} vs {}x{}",
            first.width(),
            first.height(),
            bad.width(),
            bad.height()
        )));
    }

    let mut combined = first.clone();
    for other in rest {
        for (dst, &src) in combined.samples_mut().iter_mut().zip(other.samples()) {
            *dst = dst.max_channels(src);
        }
    }
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use convkit_core::Pixel;

    fn cfg() -> FilterConfig {
        FilterConfig::default()
    }

    #[test]
    fn test_filter_names_roundtrip() {
        for filter in Filter::ALL {
            assert_eq!(filter.name().parse::<Filter>().unwrap(), filter);
        }
        assert_eq!("Grayscale".parse::<Filter>().unwrap(), Filter::Greyscale);
        assert_eq!("canny".parse::<Filter>().unwrap(), Filter::DirectionalEdges);
        assert!("posterize".parse::<Filter>().is_err());
    }

    #[test]
    fn test_greyscale_then_black_below_scenario() {
        let img = PixelBuffer::from_samples(
            2,
            2,
            vec![Pixel::BLACK, Pixel::WHITE, Pixel::WHITE, Pixel::BLACK],
        )
        .unwrap();
        let out = apply_chain(img.clone(), &[Filter::Greyscale, Filter::BlackBelow], &cfg()).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_combine_is_channel_independent() {
        let a = PixelBuffer::from_samples(2, 1, vec![Pixel::new(200, 0, 10), Pixel::new(1, 2, 3)]).unwrap();
        let b = PixelBuffer::from_samples(2, 1, vec![Pixel::new(0, 150, 10), Pixel::new(3, 2, 1)]).unwrap();
        let c = PixelBuffer::from_samples(2, 1, vec![Pixel::new(5, 5, 90), Pixel::new(0, 9, 0)]).unwrap();
        let whole = combine_max(&[a.clone(), b.clone(), c.clone()]).unwrap();

        for channel in Channel::ALL {
            for i in 0..2 {
                let expected = [&a, &b, &c]
                    .iter()
                    .map(|img| img.samples()[i].channel(channel))
                    .max()
                    .unwrap();
                assert_eq!(whole.samples()[i].channel(channel), expected);
            }
        }
        assert_eq!(whole.samples(), &[Pixel::new(200, 150, 90), Pixel::new(3, 9, 3)]);
    }

    #[test]
    fn test_combine_rejects_mismatch_and_empty() {
        let a = PixelBuffer::new(2, 2).unwrap();
        let b = PixelBuffer::new(2, 3).unwrap();
        assert!(matches!(combine_max(&[a, b]), Err(OpsError::SizeMismatch(_))));
        assert!(matches!(combine_max(&[]), Err(OpsError::InvalidParameter(_))));
    }

    #[test]
    fn test_directional_edges_on_step() {
        // White upper half over black lower half.
        let img = PixelBuffer::from_fn(6, 4, |_, y| {
            if y < 2 { Pixel::WHITE } else { Pixel::BLACK }
        })
        .unwrap();
        let out = apply(img, Filter::DirectionalEdges, &cfg()).unwrap();

        assert_eq!(out.dimensions(), (6, 4));
        assert_eq!(out.row(0), &[Pixel::BLACK; 6]);
        assert_eq!(out.row(1), &[Pixel::WHITE; 6]);
        assert_eq!(out.row(2), &[Pixel::WHITE; 6]);
        assert_eq!(out.row(3), &[Pixel::BLACK; 6]);
    }

    #[test]
    fn test_directional_edges_flat_image_is_black() {
        let img = PixelBuffer::filled(9, 5, Pixel::new(30, 200, 140)).unwrap();
        let out = apply(img, Filter::DirectionalEdges, &cfg()).unwrap();
        assert!(out.samples().iter().all(|&p| p == Pixel::BLACK));
    }

    #[test]
    fn test_directional_edges_single_pixel() {
        let img = PixelBuffer::filled(1, 1, Pixel::new(255, 0, 0)).unwrap();
        let out = apply(img, Filter::DirectionalEdges, &cfg()).unwrap();
        assert_eq!(out.pixel(0, 0), Pixel::BLACK);
    }

    #[test]
    fn test_gradients_ordered_by_direction() {
        let img = PixelBuffer::from_fn(4, 4, |x, _| {
            if x < 2 { Pixel::WHITE } else { Pixel::BLACK }
        })
        .unwrap();
        let [top, bottom, left, right] = directional_gradients(&img, 3).unwrap();
        assert!(top.samples().iter().all(|&p| p == Pixel::BLACK));
        assert!(bottom.samples().iter().all(|&p| p == Pixel::BLACK));
        assert!(right.samples().iter().all(|&p| p == Pixel::BLACK));
        assert_eq!(left.pixel(1, 1), Pixel::WHITE);
    }

    #[test]
    fn test_simple_edge_detection_flat_is_black() {
        let img = PixelBuffer::filled(5, 5, Pixel::grey(77)).unwrap();
        let out = apply(img, Filter::EdgeDetect, &cfg()).unwrap();
        assert!(out.samples().iter().all(|&p| p == Pixel::BLACK));
    }

    #[test]
    fn test_simple_edge_detection_marks_dot() {
        let mut img = PixelBuffer::new(7, 7).unwrap();
        img.set_pixel(3, 3, Pixel::WHITE);
        let out = apply(img, Filter::EdgeDetect, &cfg()).unwrap();
        assert_eq!(out.pixel(3, 3), Pixel::WHITE);
        assert_eq!(out.pixel(0, 0), Pixel::BLACK);
    }

    #[test]
    fn test_convolution_filters_use_config_workers() {
        let img = PixelBuffer::from_fn(10, 10, |x, y| Pixel::grey((x * 20 + y) as u8)).unwrap();
        let one = apply(img.clone(), Filter::Sharpen, &cfg().with_workers(1)).unwrap();
        let many = apply(img, Filter::Sharpen, &cfg().with_workers(7)).unwrap();
        assert_eq!(one, many);
    }

    #[test]
    fn test_chain_rejects_bad_config() {
        let img = PixelBuffer::new(2, 2).unwrap();
        let bad = cfg().with_workers(0);
        assert!(apply_chain(img, &[Filter::Identity], &bad).is_err());
    }
}
