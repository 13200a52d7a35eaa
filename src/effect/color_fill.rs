//! Solid color fill
//!
//! Used for the global color override, including the black fallback shown
//! when every catalog entry is disabled.

use super::{Effect, EffectInfo, EffectKind, FrameContext};
use crate::catalog::EffectConfig;
use crate::color::{Rgb, rgb_to_u32};
use crate::surface::Surface;

/// Fills every surface with one color
#[derive(Debug, Clone)]
pub struct ColorFillEffect {
    info: EffectInfo,
    color: Rgb,
}

impl ColorFillEffect {
    pub fn new(color: Rgb) -> Self {
        Self {
            info: EffectInfo::new(EffectKind::ColorFill.as_str()),
            color,
        }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Effect for ColorFillEffect {
    fn info(&self) -> &EffectInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut EffectInfo {
        &mut self.info
    }

    fn draw<S: Surface>(&mut self, _frame: &FrameContext<'_>, surfaces: &mut [S]) {
        for surface in surfaces {
            surface.fill(self.color);
        }
    }

    fn write_config(&self, config: &mut EffectConfig) {
        config.color = Some(rgb_to_u32(self.color));
    }
}
