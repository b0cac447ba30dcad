//! 8-bit RGB pixel type.
//!
//! A [`Pixel`] carries three unsigned 8-bit channels and no alpha. Any
//! arithmetic performed on channel values is clamped back to
//! `[0, MAX_CHANNEL]` before it is stored.
//!
//! # Memory Layout
//!
//! `Pixel` is `#[repr(C)]` with fields in red, green, blue order. Container
//! formats that store blue first (BMP) reorder at the I/O boundary.

use std::fmt;

/// Largest value a channel can hold.
pub const MAX_CHANNEL: u8 = 255;

/// Selects one of the three colour channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red channel.
    Red,
    /// Green channel.
    Green,
    /// Blue channel.
    Blue,
}

impl Channel {
    /// All channels in storage order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// An RGB pixel with 8 bits per channel.
///
/// # Example
///
/// ```rust
/// use convkit_core::Pixel;
///
/// let px = Pixel::new(30, 60, 90);
/// assert_eq!(px.average(), 60);
/// assert_eq!(px.inverted(), Pixel::new(225, 195, 165));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Pixel {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
}

impl Pixel {
    /// Pure black `(0, 0, 0)`.
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    /// Pure white `(255, 255, 255)`.
    pub const WHITE: Pixel = Pixel::new(MAX_CHANNEL, MAX_CHANNEL, MAX_CHANNEL);

    /// Creates a pixel from red, green and blue values.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a grey pixel with all channels set to `value`.
    #[inline]
    pub const fn grey(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Creates a pixel by clamping each value into `[0, 255]`.
    ///
    /// ```rust
    /// use convkit_core::Pixel;
    ///
    /// assert_eq!(Pixel::from_clamped(-20, 300, 128), Pixel::new(0, 255, 128));
    /// ```
    #[inline]
    pub fn from_clamped(red: i32, green: i32, blue: i32) -> Self {
        Self::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
    }

    /// Truncating mean of the three channels.
    ///
    /// The sum is taken in `u16` so it cannot overflow.
    #[inline]
    pub fn average(self) -> u8 {
        ((self.red as u16 + self.green as u16 + self.blue as u16) / 3) as u8
    }

    /// Returns the value of a single channel.
    #[inline]
    pub fn channel(self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// Returns a mutable reference to a single channel.
    #[inline]
    pub fn channel_mut(&mut self, channel: Channel) -> &mut u8 {
        match channel {
            Channel::Red => &mut self.red,
            Channel::Green => &mut self.green,
            Channel::Blue => &mut self.blue,
        }
    }

    /// Per-channel maximum of two pixels.
    ///
    /// Channels are compared independently: the result's red is the larger
    /// red, regardless of green and blue.
    #[inline]
    pub fn max_channels(self, other: Pixel) -> Pixel {
        Pixel::new(
            self.red.max(other.red),
            self.green.max(other.green),
            self.blue.max(other.blue),
        )
    }

    /// Channel-wise complement `255 - c`.
    #[inline]
    pub fn inverted(self) -> Pixel {
        Pixel::new(
            MAX_CHANNEL - self.red,
            MAX_CHANNEL - self.green,
            MAX_CHANNEL - self.blue,
        )
    }

    /// Applies `f` to each channel (widened to `i32`) and clamps the result.
    #[inline]
    pub fn map_clamped(self, mut f: impl FnMut(i32) -> i32) -> Pixel {
        Pixel::from_clamped(
            f(self.red as i32),
            f(self.green as i32),
            f(self.blue as i32),
        )
    }

    /// Channels as an array in red, green, blue order.
    #[inline]
    pub fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl From<[u8; 3]> for Pixel {
    #[inline]
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Pixel::new(red, green, blue)
    }
}

impl From<Pixel> for [u8; 3] {
    #[inline]
    fn from(px: Pixel) -> Self {
        px.to_array()
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

/// Clamps a wide integer into the channel range.
#[inline]
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, MAX_CHANNEL as i32) as u8
}
