//! 8-bit fixed point helpers shared by effects and output compositing.

use embassy_time::Duration;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Blend two 8-bit values (0 = all `a`, 255 = all `b`)
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16;
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    );
    partial = partial.wrapping_add(0x8000);

    (partial >> 16) as u8
}

/// Ratio of `part` to `whole` mapped onto 0-255, rounded to nearest.
///
/// Returns 255 once `part` reaches `whole`, and 255 for a zero `whole`
/// (an empty window is treated as already complete).
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn ratio8(part: Duration, whole: Duration) -> u8 {
    let whole = whole.as_millis();
    let part = part.as_millis();
    if whole == 0 || part >= whole {
        return 255;
    }

    ((part * 255 + whole / 2) / whole) as u8
}

/// Map a unit float (0.0-1.0, clamped) onto 0-255
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[inline]
pub fn unit8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}
