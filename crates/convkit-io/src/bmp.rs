//! BMP (Windows bitmap) format support.
//!
//! Only the subset convkit needs: uncompressed 24-bit images with a
//! `BITMAPINFOHEADER` or any later, larger info header.
//!
//! # Layout
//!
//! ```text
//! offset  size  field
//!      0     2  "BM"
//!      2     4  file size
//!      6     4  reserved
//!     10     4  pixel data offset
//!     14     4  info header size (>= 40)
//!     18     4  width (i32)
//!     22     4  height (i32, negative = top-down)
//!     26     2  planes
//!     28     2  bits per pixel
//!     30     4  compression
//!     34    20  image size, resolution, palette counts
//! ```
//!
//! Pixel rows hold `B, G, R` triples and are padded to a multiple of four
//! bytes.
//!
//! # Example
//!
//! ```rust
//! use convkit_core::{Pixel, PixelBuffer};
//! use convkit_io::bmp;
//!
//! let img = PixelBuffer::filled(3, 2, Pixel::new(1, 2, 3)).unwrap();
//! let mut bytes = Vec::new();
//! bmp::encode(&mut bytes, &img).unwrap();
//! assert_eq!(bytes.len(), 54 + 2 * 12);
//! assert_eq!(bmp::decode(&mut bytes.as_slice()).unwrap(), img);
//! ```

use crate::{IoError, IoResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use convkit_core::{try_alloc_samples, Pixel, PixelBuffer};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, trace};

/// File signature.
pub const MAGIC: [u8; 2] = *b"BM";

/// Size of the file header preceding the info header.
pub const FILE_HEADER_SIZE: u32 = 14;

/// Size of `BITMAPINFOHEADER`, the smallest accepted info header.
pub const INFO_HEADER_SIZE: u32 = 40;

/// Bits per pixel this crate reads and writes.
pub const SUPPORTED_BPP: u16 = 24;

/// `BI_RGB`: no compression.
pub const COMPRESSION_NONE: u32 = 0;

/// 72 DPI expressed in pixels per metre.
const PIXELS_PER_METRE: i32 = 2835;

const BYTES_PER_PIXEL: usize = 3;

/// Parsed file and info headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    /// Declared file size.
    pub file_size: u32,
    /// Offset of the first pixel row from the start of the file.
    pub data_offset: u32,
    /// Info header size; 40 for `BITMAPINFOHEADER`.
    pub header_size: u32,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// `true` if rows are stored top row first (negative height on disk).
    pub top_down: bool,
    /// Bits per pixel.
    pub bits_per_pixel: u16,
    /// Compression method.
    pub compression: u32,
}

impl BmpHeader {
    /// Reads both headers, leaving `reader` just past the info header fields
    /// that were consumed (54 bytes in).
    pub fn read<R: Read>(reader: &mut R) -> IoResult<Self> {
        let mut magic = [0u8; 2];
        reader
            .read_exact(&mut magic)
            .map_err(|e| IoError::truncated(e, "file header"))?;
        if magic != MAGIC {
            return Err(IoError::InvalidFile(format!(
                "bad magic {:02x} {:02x}, expected \"BM\"",
                magic[0], magic[1]
            )));
        }

        let mut fields = || -> io::Result<_> {
            let file_size = reader.read_u32::<LittleEndian>()?;
            let _reserved = reader.read_u32::<LittleEndian>()?;
            let data_offset = reader.read_u32::<LittleEndian>()?;
            let header_size = reader.read_u32::<LittleEndian>()?;
            let width = reader.read_i32::<LittleEndian>()?;
            let height = reader.read_i32::<LittleEndian>()?;
            let _planes = reader.read_u16::<LittleEndian>()?;
            let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let compression = reader.read_u32::<LittleEndian>()?;
            // Image size, resolution and palette counts are not needed.
            let mut rest = [0u8; 20];
            reader.read_exact(&mut rest)?;
            Ok((file_size, data_offset, header_size, width, height, bits_per_pixel, compression))
        };
        let (file_size, data_offset, header_size, width, height, bits_per_pixel, compression) =
            fields().map_err(|e| IoError::truncated(e, "info header"))?;

        if header_size < INFO_HEADER_SIZE {
            return Err(IoError::Unsupported(format!(
                "info header of {header_size} bytes (OS/2 bitmaps are not supported)"
            )));
        }
        if width <= 0 || height == 0 {
            return Err(IoError::InvalidFile(format!("bad dimensions {width}x{height}")));
        }
        if u64::from(data_offset) < u64::from(FILE_HEADER_SIZE) + u64::from(header_size) {
            return Err(IoError::InvalidFile(format!(
                "pixel data offset {data_offset} overlaps the headers"
            )));
        }

        Ok(Self {
            file_size,
            data_offset,
            header_size,
            width: width.unsigned_abs(),
            height: height.unsigned_abs(),
            top_down: height < 0,
            bits_per_pixel,
            compression,
        })
    }

    /// Fails unless the pixel format is uncompressed 24-bit.
    pub fn ensure_supported(&self) -> IoResult<()> {
        if self.bits_per_pixel != SUPPORTED_BPP {
            return Err(IoError::UnsupportedBitDepth(format!(
                "BMP {} bit (only 24 bit is supported)",
                self.bits_per_pixel
            )));
        }
        if self.compression != COMPRESSION_NONE {
            return Err(IoError::Unsupported(format!(
                "BMP compression method {}",
                self.compression
            )));
        }
        Ok(())
    }

    /// Bytes per stored row including padding.
    pub fn row_stride(&self) -> usize {
        row_stride(self.width as usize)
    }
}

/// Bytes per stored row of `width` pixels, padded to four bytes.
pub fn row_stride(width: usize) -> usize {
    (width * BYTES_PER_PIXEL + 3) & !3
}

/// Reads a BMP file.
///
/// # Errors
///
/// - [`IoError::Io`] if the file cannot be opened or read
/// - [`IoError::InvalidFile`] for a bad signature, bad dimensions or truncated data
/// - [`IoError::UnsupportedBitDepth`] for anything but 24 bits per pixel
/// - [`IoError::Unsupported`] for compressed or OS/2 bitmaps
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading BMP");
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    decode(&mut reader)
}

/// Decodes a BMP stream into a top-down buffer.
pub fn decode<R: Read>(reader: &mut R) -> IoResult<PixelBuffer> {
    let header = BmpHeader::read(reader)?;
    header.ensure_supported()?;
    trace!(
        width = header.width,
        height = header.height,
        top_down = header.top_down,
        data_offset = header.data_offset,
        "BMP header"
    );

    let consumed = u64::from(FILE_HEADER_SIZE + INFO_HEADER_SIZE);
    let skip = u64::from(header.data_offset) - consumed;
    let skipped = io::copy(&mut reader.by_ref().take(skip), &mut io::sink())?;
    if skipped != skip {
        return Err(IoError::InvalidFile("truncated before pixel data".into()));
    }

    let width = header.width as usize;
    let height = header.height as usize;
    let count = convkit_core::checked_pixel_count(header.width, header.height)?;
    let mut samples = try_alloc_samples(count, Pixel::BLACK)?;

    let mut row = vec![0u8; header.row_stride()];
    for stored in 0..height {
        reader
            .read_exact(&mut row)
            .map_err(|e| IoError::truncated(e, "pixel data"))?;
        let y = if header.top_down { stored } else { height - 1 - stored };
        let dst = &mut samples[y * width..(y + 1) * width];
        for (px, bgr) in dst.iter_mut().zip(row.chunks_exact(BYTES_PER_PIXEL)) {
            *px = Pixel::new(bgr[2], bgr[1], bgr[0]);
        }
    }

    Ok(PixelBuffer::from_samples(header.width, header.height, samples)?)
}

/// Writes a BMP file.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), width = image.width(), height = image.height(), "writing BMP");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Encodes `image` as a bottom-up 24-bit BMP.
///
/// # Errors
///
/// [`IoError::Unsupported`] if the image is too large for 32-bit header
/// fields, otherwise only errors from `writer`.
pub fn encode<W: Write>(writer: &mut W, image: &PixelBuffer) -> IoResult<()> {
    let (width, height) = image.dimensions();
    let stride = row_stride(width as usize);

    let too_large = || IoError::Unsupported(format!("{width}x{height} exceeds BMP limits"));
    let signed_width = i32::try_from(width).map_err(|_| too_large())?;
    let signed_height = i32::try_from(height).map_err(|_| too_large())?;
    let image_size = u32::try_from(stride)
        .ok()
        .and_then(|s| s.checked_mul(height))
        .ok_or_else(too_large)?;
    let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    let file_size = image_size.checked_add(data_offset).ok_or_else(too_large)?;

    writer.write_all(&MAGIC)?;
    writer.write_u32::<LittleEndian>(file_size)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(data_offset)?;

    writer.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
    writer.write_i32::<LittleEndian>(signed_width)?;
    writer.write_i32::<LittleEndian>(signed_height)?;
    writer.write_u16::<LittleEndian>(1)?;
    writer.write_u16::<LittleEndian>(SUPPORTED_BPP)?;
    writer.write_u32::<LittleEndian>(COMPRESSION_NONE)?;
    writer.write_u32::<LittleEndian>(image_size)?;
    writer.write_i32::<LittleEndian>(PIXELS_PER_METRE)?;
    writer.write_i32::<LittleEndian>(PIXELS_PER_METRE)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(0)?;

    let mut row = vec![0u8; stride];
    for src in image.rows().rev() {
        for (bgr, px) in row.chunks_exact_mut(BYTES_PER_PIXEL).zip(src) {
            bgr.copy_from_slice(&[px.blue, px.green, px.red]);
        }
        writer.write_all(&row)?;
    }
    Ok(())
}
