#![allow(dead_code)]

use ledwire::Rgb;
use ledwire::protocol::{COMMAND_PEAKDATA, COMMAND_PIXELDATA64};

pub fn header(command: u16, selector: u16, length: u32, seconds: u64, micros: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(24);
    bytes.extend_from_slice(&command.to_le_bytes());
    bytes.extend_from_slice(&selector.to_le_bytes());
    bytes.extend_from_slice(&length.to_le_bytes());
    bytes.extend_from_slice(&seconds.to_le_bytes());
    bytes.extend_from_slice(&micros.to_le_bytes());
    bytes
}

pub fn pixel_payload(mask: u16, seconds: u64, micros: u64, pixels: &[Rgb]) -> Vec<u8> {
    let mut bytes = header(
        COMMAND_PIXELDATA64,
        mask,
        u32::try_from(pixels.len()).unwrap(),
        seconds,
        micros,
    );
    for pixel in pixels {
        bytes.extend_from_slice(&[pixel.r, pixel.g, pixel.b]);
    }
    bytes
}

pub fn peak_payload(levels: &[f64]) -> Vec<u8> {
    let count = u16::try_from(levels.len()).unwrap();
    let mut bytes = header(COMMAND_PEAKDATA, count, u32::from(count) * 8, 0, 0);
    for level in levels {
        bytes.extend_from_slice(&level.to_le_bytes());
    }
    bytes
}
