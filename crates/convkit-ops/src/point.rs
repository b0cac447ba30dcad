//! Single-pass per-pixel transforms.
//!
//! Every function here mutates the buffer in place and leaves its
//! dimensions untouched. Channel arithmetic is done in `i32` and clamped
//! back to `[0, 255]`.
//!
//! The "average" used by greyscale and the thresholds is the truncating
//! mean `(r + g + b) / 3` (see [`Pixel::average`]).
//!
//! # Example
//!
//! ```rust
//! use convkit_core::{Pixel, PixelBuffer};
//! use convkit_ops::point::{black_below, greyscale};
//!
//! let mut img = PixelBuffer::from_samples(2, 1, vec![Pixel::new(10, 20, 30), Pixel::new(90, 120, 150)]).unwrap();
//! greyscale(&mut img);
//! black_below(&mut img, 60);
//! assert_eq!(img.samples(), &[Pixel::BLACK, Pixel::grey(120)]);
//! ```

use convkit_core::{Channel, Pixel, PixelBuffer};
use tracing::trace;

/// Replaces every pixel with the grey of its channel average.
pub fn greyscale(buffer: &mut PixelBuffer) {
    trace!(width = buffer.width(), height = buffer.height(), "greyscale");
    for px in buffer.samples_mut() {
        *px = Pixel::grey(px.average());
    }
}

/// Sets pixels whose average is strictly below `threshold` to black.
pub fn black_below(buffer: &mut PixelBuffer, threshold: u8) {
    trace!(threshold, "black_below");
    for px in buffer.samples_mut() {
        if px.average() < threshold {
            *px = Pixel::BLACK;
        }
    }
}

/// Sets pixels whose average is strictly above `threshold` to white.
pub fn white_above(buffer: &mut PixelBuffer, threshold: u8) {
    trace!(threshold, "white_above");
    for px in buffer.samples_mut() {
        if px.average() > threshold {
            *px = Pixel::WHITE;
        }
    }
}

/// Replaces each channel with `255 - c`.
pub fn invert(buffer: &mut PixelBuffer) {
    for px in buffer.samples_mut() {
        *px = px.inverted();
    }
}

/// Pushes each channel away from the pixel average by `weight`.
///
/// `c += trunc(weight * (c - avg))`. A negative weight desaturates.
pub fn saturate(buffer: &mut PixelBuffer, weight: f32) {
    trace!(weight, "saturate");
    for px in buffer.samples_mut() {
        let avg = px.average() as i32;
        *px = px.map_clamped(|c| c + (weight * (c - avg) as f32) as i32);
    }
}

/// Pulls each channel toward the pixel average by `weight`.
///
/// `c -= trunc(weight * (c - avg))`.
pub fn desaturate(buffer: &mut PixelBuffer, weight: f32) {
    trace!(weight, "desaturate");
    for px in buffer.samples_mut() {
        let avg = px.average() as i32;
        *px = px.map_clamped(|c| c - (weight * (c - avg) as f32) as i32);
    }
}

/// Adds `amount` to every channel.
pub fn brighten(buffer: &mut PixelBuffer, amount: i32) {
    for px in buffer.samples_mut() {
        *px = px.map_clamped(|c| c.saturating_add(amount));
    }
}

/// Subtracts `amount` from every channel.
pub fn darken(buffer: &mut PixelBuffer, amount: i32) {
    for px in buffer.samples_mut() {
        *px = px.map_clamped(|c| c.saturating_sub(amount));
    }
}

/// Keeps `keep` and zeroes the other two channels.
pub fn isolate(buffer: &mut PixelBuffer, keep: Channel) {
    for px in buffer.samples_mut() {
        let value = px.channel(keep);
        *px = Pixel::BLACK;
        *px.channel_mut(keep) = value;
    }
}

/// Exchanges two channels in every pixel.
pub fn swap_channels(buffer: &mut PixelBuffer, a: Channel, b: Channel) {
    if a == b {
        return;
    }
    for px in buffer.samples_mut() {
        let va = px.channel(a);
        let vb = px.channel(b);
        *px.channel_mut(a) = vb;
        *px.channel_mut(b) = va;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(samples: Vec<Pixel>) -> PixelBuffer {
        let w = samples.len() as u32;
        PixelBuffer::from_samples(w, 1, samples).unwrap()
    }

    #[test]
    fn test_greyscale_truncates() {
        let mut b = img(vec![Pixel::new(1, 1, 2), Pixel::new(255, 255, 254)]);
        greyscale(&mut b);
        assert_eq!(b.samples(), &[Pixel::grey(1), Pixel::grey(254)]);
    }

    #[test]
    fn test_greyscale_idempotent() {
        let mut once = img(vec![
            Pixel::new(12, 200, 99),
            Pixel::new(255, 0, 7),
            Pixel::new(3, 3, 3),
        ]);
        greyscale(&mut once);
        let mut twice = once.clone();
        greyscale(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_black_below_and_white_above_are_strict() {
        let mut b = img(vec![Pixel::grey(59), Pixel::grey(60), Pixel::grey(200), Pixel::grey(201)]);
        black_below(&mut b, 60);
        white_above(&mut b, 200);
        assert_eq!(
            b.samples(),
            &[Pixel::BLACK, Pixel::grey(60), Pixel::grey(200), Pixel::WHITE]
        );
    }

    #[test]
    fn test_threshold_leaves_colour_otherwise() {
        let mut b = img(vec![Pixel::new(250, 10, 100)]);
        black_below(&mut b, 60);
        assert_eq!(b.pixel(0, 0), Pixel::new(250, 10, 100));
    }

    #[test]
    fn test_saturate_and_desaturate() {
        let mut s = img(vec![Pixel::new(100, 150, 200)]);
        saturate(&mut s, 0.5);
        assert_eq!(s.pixel(0, 0), Pixel::new(75, 150, 225));

        let mut d = img(vec![Pixel::new(100, 150, 200)]);
        desaturate(&mut d, 0.5);
        assert_eq!(d.pixel(0, 0), Pixel::new(125, 150, 175));

        let mut clipped = img(vec![Pixel::new(0, 0, 255)]);
        saturate(&mut clipped, 2.0);
        assert_eq!(clipped.pixel(0, 0), Pixel::new(0, 0, 255));
    }

    #[test]
    fn test_brighten_darken_clamp() {
        let mut b = img(vec![Pixel::new(0, 100, 230)]);
        brighten(&mut b, 50);
        assert_eq!(b.pixel(0, 0), Pixel::new(50, 150, 255));
        darken(&mut b, 100);
        assert_eq!(b.pixel(0, 0), Pixel::new(0, 50, 155));
    }

    #[test]
    fn test_isolate_and_swap() {
        let mut b = img(vec![Pixel::new(1, 2, 3)]);
        swap_channels(&mut b, Channel::Red, Channel::Blue);
        assert_eq!(b.pixel(0, 0), Pixel::new(3, 2, 1));
        isolate(&mut b, Channel::Green);
        assert_eq!(b.pixel(0, 0), Pixel::new(0, 2, 0));
    }

    #[test]
    fn test_invert() {
        let mut b = img(vec![Pixel::new(0, 128, 255)]);
        invert(&mut b);
        assert_eq!(b.pixel(0, 0), Pixel::new(255, 127, 0));
    }
}
