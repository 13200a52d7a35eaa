//! Peak level bar with a falling peak marker

use embassy_time::{Duration, Instant};

use super::{Effect, EffectInfo, EffectKind, FrameContext};
use crate::catalog::EffectConfig;
use crate::color::{Rgb, WHITE, rgb_to_u32};
use crate::surface::Surface;

const PEAK_HOLD: Duration = Duration::from_millis(1000);
const DEFAULT_COLOR: Rgb = Rgb { r: 0, g: 255, b: 0 };

#[derive(Debug, Clone)]
pub struct VuMeterEffect {
    info: EffectInfo,
    color: Rgb,
    /// Held peak as a fraction of the strip
    peak: f32,
    peak_at: Instant,
}

impl Default for VuMeterEffect {
    fn default() -> Self {
        Self {
            info: EffectInfo::new(EffectKind::VuMeter.as_str()),
            color: DEFAULT_COLOR,
            peak: 0.0,
            peak_at: Instant::from_millis(0),
        }
    }
}

impl VuMeterEffect {
    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

impl Effect for VuMeterEffect {
    fn info(&self) -> &EffectInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut EffectInfo {
        &mut self.info
    }

    fn start(&mut self, now: Instant) {
        self.peak = 0.0;
        self.peak_at = now;
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw<S: Surface>(&mut self, frame: &FrameContext<'_>, surfaces: &mut [S]) {
        let level = frame.peaks.level();
        if level >= self.peak {
            self.peak = level;
            self.peak_at = frame.now;
        } else if frame.now.saturating_duration_since(self.peak_at) > PEAK_HOLD {
            self.peak = level;
        }

        for surface in surfaces {
            let count = surface.led_count() as f32;
            surface.clear();
            surface.set_pixels_fractional(0.0, level * count, self.color, false);
            if self.peak > 0.0 {
                let position = (self.peak * count - 1.0).max(0.0);
                surface.set_pixels_fractional(position, 1.0, WHITE, true);
            }
        }
    }

    fn can_display_vu_meter(&self) -> bool {
        false
    }

    fn write_config(&self, config: &mut EffectConfig) {
        config.color = Some(rgb_to_u32(self.color));
    }
}
