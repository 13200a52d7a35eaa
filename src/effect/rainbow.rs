//! Rainbow hue cycle

use embassy_time::{Duration, Instant};

use super::{Effect, EffectInfo, EffectKind, FrameContext};
use crate::catalog::EffectConfig;
use crate::color::{Hsv, hsv2rgb};
use crate::surface::Surface;

const DEFAULT_CYCLE_MS: u64 = 12_000;

/// Hue span covered by one surface
const HUE_SPREAD: usize = 255;

/// Scrolls the full hue circle along every surface
#[derive(Debug, Clone)]
pub struct RainbowEffect {
    info: EffectInfo,
    /// Duration of one complete hue cycle
    cycle_duration: Duration,
    started: Instant,
}

impl Default for RainbowEffect {
    fn default() -> Self {
        Self {
            info: EffectInfo::new(EffectKind::Rainbow.as_str()),
            cycle_duration: Duration::from_millis(DEFAULT_CYCLE_MS),
            started: Instant::from_millis(0),
        }
    }
}

impl RainbowEffect {
    /// Set the cycle duration
    #[must_use]
    pub fn with_cycle_duration(mut self, duration: Duration) -> Self {
        self.cycle_duration = duration;
        self
    }
}

impl Effect for RainbowEffect {
    fn info(&self) -> &EffectInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut EffectInfo {
        &mut self.info
    }

    fn start(&mut self, now: Instant) {
        self.started = now;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw<S: Surface>(&mut self, frame: &FrameContext<'_>, surfaces: &mut [S]) {
        let cycle_ms = self.cycle_duration.as_millis().max(1);
        let progress_ms = frame.now.saturating_duration_since(self.started).as_millis() % cycle_ms;
        let base_hue = ((progress_ms * 255) / cycle_ms) as u8;

        for surface in surfaces {
            let count = surface.led_count().max(1);
            for index in 0..surface.led_count() {
                let offset = ((index * HUE_SPREAD) / count) as u8;
                let color = hsv2rgb(Hsv {
                    hue: base_hue.wrapping_add(offset),
                    sat: 255,
                    val: 255,
                });
                surface.set_pixel(index, color);
            }
        }
    }

    fn write_config(&self, config: &mut EffectConfig) {
        config.speed_ms = Some(self.cycle_duration.as_millis());
    }
}
