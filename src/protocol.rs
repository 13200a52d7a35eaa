//! Binary wire protocol for pixel and audio peak frames.
//!
//! Every payload starts with a fixed 24 byte little-endian header:
//!
//! | Offset | Field                     | Size |
//! |--------|---------------------------|------|
//! | 0      | command code              | 2    |
//! | 2      | channel mask / band count | 2    |
//! | 4      | payload length            | 4    |
//! | 8      | seconds                   | 8    |
//! | 16     | microseconds              | 8    |
//!
//! Peak data is followed by one `f64` per band, pixel frames by
//! `length` RGB triplets.

use crate::audio::{AudioPeaks, MAX_BANDS};
use crate::color::Rgb;
use crate::error::ProtocolError;
use crate::timestamp::Timestamp;

/// Size of the fixed header shared by all commands
pub const HEADER_SIZE: usize = 24;

/// Pixel frame carrying 64-bit timestamps
pub const COMMAND_PIXELDATA64: u16 = 3;

/// Audio peak levels, one `f64` per band
pub const COMMAND_PEAKDATA: u16 = 7;

const BYTES_PER_PIXEL: usize = 3;
const BYTES_PER_BAND: usize = 8;

/// A validated, decoded wire command
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    PeakData(AudioPeaks),
    PixelFrame(PixelFrame<'a>),
}

/// Pixel payload borrowed from the receive buffer.
///
/// The pixel bytes are validated against the declared length at decode
/// time, so consumers never see a short payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFrame<'a> {
    pub channel_mask: u16,
    pub timestamp: Timestamp,
    pixels: &'a [u8],
}

impl<'a> PixelFrame<'a> {
    /// Number of pixel triplets
    pub const fn len(&self) -> usize {
        self.pixels.len() / BYTES_PER_PIXEL
    }

    pub const fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel colors in wire order
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + 'a {
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|rgb| Rgb::new(rgb[0], rgb[1], rgb[2]))
    }

    /// Channel indices selected by the mask, limited to `channels`
    pub fn channels(&self, channels: usize) -> impl Iterator<Item = usize> + 'a {
        let mask = self.channel_mask;
        (0..channels.min(16)).filter(move |channel| mask & (1 << channel) != 0)
    }
}

/// Decode a raw payload into a [`Command`].
///
/// Pure function of its input: nothing is retained between calls.
pub fn decode(bytes: &[u8]) -> Result<Command<'_>, ProtocolError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ProtocolError::TooShort {
            len: bytes.len(),
            min: HEADER_SIZE,
        });
    }

    match read_u16(bytes, 0) {
        COMMAND_PEAKDATA => decode_peaks(bytes),
        COMMAND_PIXELDATA64 => decode_pixels(bytes),
        other => Err(ProtocolError::UnknownCommand(other)),
    }
}

fn decode_peaks(bytes: &[u8]) -> Result<Command<'_>, ProtocolError> {
    let count = usize::from(read_u16(bytes, 2));
    if count > MAX_BANDS {
        return Err(ProtocolError::TooManyBands {
            count,
            max: MAX_BANDS,
        });
    }
    let body = payload(bytes, count, BYTES_PER_BAND)?;

    let mut peaks = AudioPeaks::new();
    for band in body.chunks_exact(BYTES_PER_BAND) {
        let mut raw = [0u8; BYTES_PER_BAND];
        raw.copy_from_slice(band);
        #[allow(clippy::cast_possible_truncation)]
        let level = f64::from_le_bytes(raw) as f32;
        // Capacity was checked against the band count above
        let _ = peaks.push(level);
    }
    Ok(Command::PeakData(peaks))
}

fn decode_pixels(bytes: &[u8]) -> Result<Command<'_>, ProtocolError> {
    let mut channel_mask = read_u16(bytes, 2);
    // Senders predating channel masks always address channel 0
    if channel_mask == 0 {
        channel_mask = 1;
    }
    let length = usize::try_from(read_u32(bytes, 4)).map_err(|_| ProtocolError::LengthOverflow)?;
    let timestamp = Timestamp::new(read_u64(bytes, 8), read_u64(bytes, 16));
    let pixels = payload(bytes, length, BYTES_PER_PIXEL)?;

    Ok(Command::PixelFrame(PixelFrame {
        channel_mask,
        timestamp,
        pixels,
    }))
}

/// Slice `count` elements of `size` bytes following the header
fn payload(bytes: &[u8], count: usize, size: usize) -> Result<&[u8], ProtocolError> {
    let declared = count
        .checked_mul(size)
        .and_then(|body| body.checked_add(HEADER_SIZE))
        .ok_or(ProtocolError::LengthOverflow)?;
    bytes
        .get(HEADER_SIZE..declared)
        .ok_or(ProtocolError::Truncated {
            declared,
            available: bytes.len(),
        })
}

// Header reads below are only called once the header length is verified.

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(raw)
}

fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(raw)
}
