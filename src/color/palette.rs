use crate::color::{Rgb, blend_colors};

/// Four evenly spaced color stops, sampled with linear blending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette4 {
    stops: [Rgb; 4],
}

impl Palette4 {
    pub const fn new(stops: [Rgb; 4]) -> Self {
        Self { stops }
    }

    /// Sample the palette at `index` (0 = first stop, 255 = last stop)
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&self, index: u8) -> Rgb {
        // Three segments of 85 steps each cover 0..=255
        let segment = usize::from(index / 85).min(2);
        let offset = u16::from(index) - segment as u16 * 85;
        let amount = ((offset * 255) / 85).min(255) as u8;
        blend_colors(self.stops[segment], self.stops[segment + 1], amount)
    }
}
