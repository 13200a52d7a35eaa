//! Drawing surface contract shared by effects and the render tick.

use crate::color::{BLACK, Rgb, add_colors, fade_to_black_by};
use crate::math8::unit8;

/// A strip or matrix region effects can paint on.
///
/// Surfaces persist between frames: effects that do not clear keep
/// drawing over the previous frame.
pub trait Surface {
    /// Number of addressable LEDs
    fn led_count(&self) -> usize;

    /// Set a single pixel. Out of range indices are ignored.
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Paint `count` pixels starting at the fractional position `position`.
    ///
    /// Partially covered boundary pixels receive a proportionally dimmed
    /// color. With `merge` the color is added to the existing pixels
    /// instead of replacing them.
    fn set_pixels_fractional(&mut self, position: f32, count: f32, color: Rgb, merge: bool);

    /// Turn every pixel off
    fn clear(&mut self);

    /// Fill every pixel with one color
    fn fill(&mut self, color: Rgb) {
        for index in 0..self.led_count() {
            self.set_pixel(index, color);
        }
    }
}

/// In-memory surface backed by a fixed array of `N` pixels
#[derive(Debug, Clone)]
pub struct LedSurface<const N: usize> {
    leds: [Rgb; N],
}

impl<const N: usize> Default for LedSurface<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LedSurface<N> {
    pub const fn new() -> Self {
        Self { leds: [BLACK; N] }
    }

    /// Current pixel contents
    pub fn leds(&self) -> &[Rgb] {
        &self.leds
    }

    pub fn get_pixel(&self, index: usize) -> Option<Rgb> {
        self.leds.get(index).copied()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn paint(&mut self, position: f32, color: Rgb, merge: bool) {
        if position < 0.0 {
            return;
        }
        let Some(pixel) = self.leds.get_mut(position as usize) else {
            return;
        };
        *pixel = if merge { add_colors(*pixel, color) } else { color };
    }
}

impl<const N: usize> Surface for LedSurface<N> {
    fn led_count(&self) -> usize {
        N
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.leds.get_mut(index) {
            *pixel = color;
        }
    }

    fn set_pixels_fractional(&mut self, position: f32, count: f32, color: Rgb, merge: bool) {
        let end = position + count;
        let head_fraction = position - libm::floorf(position);
        let tail_fraction = end - libm::floorf(end);

        // The head pixel is dimmed by how far the span starts past its
        // boundary, or by the uncovered part when the whole span fits inside it.
        let head_fade = unit8(head_fraction.max(1.0 - count));
        let tail_fade = unit8(1.0 - tail_fraction);

        self.paint(position, fade_to_black_by(color, head_fade), merge);

        let mut cursor = position + (1.0 - head_fraction);
        let mut remaining = count - (1.0 - head_fraction);

        // Only the part of the span that overlaps the surface is walked
        if cursor < 0.0 {
            let skipped = libm::floorf((-cursor).min(remaining.max(0.0)));
            cursor += skipped;
            remaining -= skipped;
        }
        #[allow(clippy::cast_precision_loss)]
        let visible = (N as f32 - cursor).max(0.0);
        remaining = remaining.min(visible);

        while remaining >= 1.0 {
            self.paint(cursor, color, merge);
            remaining -= 1.0;
            cursor += 1.0;
        }

        if remaining > 0.0 {
            self.paint(cursor, fade_to_black_by(color, tail_fade), merge);
        }
    }

    fn clear(&mut self) {
        self.leds = [BLACK; N];
    }
}
