//! Audio reactive flame
//!
//! Heat values flicker with two interfering waves, are pushed up by the
//! current audio level and cool down between frames. Heat is mapped through
//! a black, color, secondary, white palette.

use embassy_time::Instant;
use heapless::Vec;

use super::{Effect, EffectInfo, EffectKind, FrameContext, largest_surface};
use crate::catalog::EffectConfig;
use crate::color::{BLACK, Palette4, Rgb, WHITE, YELLOW, rgb_to_u32};
use crate::error::InitError;
use crate::math8::{scale8, unit8};
use crate::surface::Surface;

/// Largest surface the heat buffer can cover
pub const MAX_FLAME_LEDS: usize = 512;

/// Per frame heat retention (0-255)
const COOLING: u8 = 210;

#[derive(Debug, Clone)]
pub struct PaletteFlameEffect {
    info: EffectInfo,
    color: Rgb,
    secondary: Option<Rgb>,
    palette: Palette4,
    heat: Vec<u8, MAX_FLAME_LEDS>,
    started: Instant,
}

impl PaletteFlameEffect {
    /// Flame in `color`, blending towards `secondary` (yellow if unset)
    pub fn new(color: Rgb, secondary: Option<Rgb>) -> Self {
        Self {
            info: EffectInfo::new(EffectKind::PaletteFlame.as_str()),
            color,
            secondary,
            palette: Palette4::new([BLACK, color, secondary.unwrap_or(YELLOW), WHITE]),
            heat: Vec::new(),
            started: Instant::from_millis(0),
        }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    pub const fn secondary(&self) -> Option<Rgb> {
        self.secondary
    }
}

impl Effect for PaletteFlameEffect {
    fn info(&self) -> &EffectInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut EffectInfo {
        &mut self.info
    }

    fn init<S: Surface>(&mut self, surfaces: &[S]) -> Result<(), InitError> {
        let count = largest_surface(surfaces)?;
        self.heat.clear();
        self.heat
            .resize(count, 0)
            .map_err(|()| InitError::TooManyLeds {
                count,
                max: MAX_FLAME_LEDS,
            })
    }

    fn start(&mut self, now: Instant) {
        self.started = now;
        self.heat.iter_mut().for_each(|heat| *heat = 0);
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw<S: Surface>(&mut self, frame: &FrameContext<'_>, surfaces: &mut [S]) {
        let elapsed_ms = frame.now.saturating_duration_since(self.started).as_millis();
        let t = (elapsed_ms % 600_000) as f32 / 1000.0;
        let boost = 0.55 + 0.45 * frame.peaks.level();
        let count = self.heat.len().max(1) as f32;

        for (index, heat) in self.heat.iter_mut().enumerate() {
            let x = index as f32;
            let flicker = 0.5
                + 0.25 * libm::sinf(x * 0.31 + t * 3.1)
                + 0.25 * libm::sinf(x * 0.17 - t * 2.3 + 1.7);
            // Hotter at the base of the strip
            let height = 1.0 - 0.5 * (x / count);
            let target = unit8(flicker * boost * height);
            *heat = scale8(*heat, COOLING).max(target);
        }

        for surface in surfaces {
            for (index, heat) in self.heat.iter().enumerate().take(surface.led_count()) {
                surface.set_pixel(index, self.palette.sample(*heat));
            }
        }
    }

    fn write_config(&self, config: &mut EffectConfig) {
        config.color = Some(rgb_to_u32(self.color));
        config.color2 = self.secondary.map(rgb_to_u32);
    }
}
