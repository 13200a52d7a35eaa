//! Effect system with compile-time known effect variants
//!
//! The catalog stores effects in an enum so the scheduler can own them in a
//! fixed-capacity collection. Each variant implements the `Effect` trait.

mod color_fill;
mod palette_flame;
mod rainbow;
mod vu_meter;

use alloc::string::String;

pub use color_fill::ColorFillEffect;
use embassy_time::{Duration, Instant};
pub use palette_flame::{MAX_FLAME_LEDS, PaletteFlameEffect};
pub use rainbow::RainbowEffect;
pub use vu_meter::VuMeterEffect;

use crate::audio::AudioPeaks;
use crate::catalog::EffectConfig;
use crate::color::{RED, WHITE, rgb_from_u32};
use crate::error::InitError;
use crate::surface::Surface;

/// Maximum length of a friendly name in bytes
pub const NAME_CAPACITY: usize = 32;

pub type EffectName = heapless::String<NAME_CAPACITY>;

const EFFECT_NAME_COLOR_FILL: &str = "Color Fill";
const EFFECT_NAME_RAINBOW: &str = "Rainbow";
const EFFECT_NAME_PALETTE_FLAME: &str = "Palette Flame";
const EFFECT_NAME_VU_METER: &str = "VU Meter";

const EFFECT_ID_COLOR_FILL: u8 = 0;
const EFFECT_ID_RAINBOW: u8 = 1;
const EFFECT_ID_PALETTE_FLAME: u8 = 2;
const EFFECT_ID_VU_METER: u8 = 3;

/// Build a friendly name, truncated to [`NAME_CAPACITY`] on a char boundary
pub fn effect_name(text: &str) -> EffectName {
    let mut name = EffectName::new();
    for ch in text.chars() {
        if name.push(ch).is_err() {
            break;
        }
    }
    name
}

/// Identity and runtime cap shared by every effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectInfo {
    name: EffectName,
    max_effect_time: Option<Duration>,
}

impl EffectInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: effect_name(name),
            max_effect_time: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn max_effect_time(&self) -> Option<Duration> {
        self.max_effect_time
    }
}

/// Per-frame inputs handed to [`Effect::draw`]
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub now: Instant,
    /// Latest audio peaks, read only
    pub peaks: &'a AudioPeaks,
}

pub trait Effect {
    fn info(&self) -> &EffectInfo;

    fn info_mut(&mut self) -> &mut EffectInfo;

    /// Prepare the effect for the attached surfaces
    fn init<S: Surface>(&mut self, surfaces: &[S]) -> Result<(), InitError> {
        largest_surface(surfaces).map(|_| ())
    }

    /// Reset state when the effect becomes active
    fn start(&mut self, _now: Instant) {}

    /// Render a single frame.
    ///
    /// Surfaces are shared with other effects and the network path, so no
    /// state may be assumed to survive from the previous call.
    fn draw<S: Surface>(&mut self, frame: &FrameContext<'_>, surfaces: &mut [S]);

    /// Whether a VU meter overlay makes sense on top of this effect
    fn can_display_vu_meter(&self) -> bool {
        true
    }

    /// Store effect specific parameters
    fn write_config(&self, _config: &mut EffectConfig) {}
}

/// LED count of the largest surface, rejecting an empty surface set
pub(crate) fn largest_surface<S: Surface>(surfaces: &[S]) -> Result<usize, InitError> {
    let count = surfaces
        .iter()
        .map(Surface::led_count)
        .max()
        .ok_or(InitError::NoSurfaces)?;
    if count == 0 {
        return Err(InitError::EmptySurface);
    }
    Ok(count)
}

/// Known effect kinds, tagged with the number stored in configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectKind {
    ColorFill = EFFECT_ID_COLOR_FILL,
    Rainbow = EFFECT_ID_RAINBOW,
    PaletteFlame = EFFECT_ID_PALETTE_FLAME,
    VuMeter = EFFECT_ID_VU_METER,
}

impl EffectKind {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_COLOR_FILL => Self::ColorFill,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            EFFECT_ID_PALETTE_FLAME => Self::PaletteFlame,
            EFFECT_ID_VU_METER => Self::VuMeter,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Default friendly name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColorFill => EFFECT_NAME_COLOR_FILL,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
            Self::PaletteFlame => EFFECT_NAME_PALETTE_FLAME,
            Self::VuMeter => EFFECT_NAME_VU_METER,
        }
    }
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Solid single color
    ColorFill(ColorFillEffect),
    /// Hue cycle across the strip
    Rainbow(RainbowEffect),
    /// Audio reactive flame through a four color palette
    PaletteFlame(PaletteFlameEffect),
    /// Peak level bar
    VuMeter(VuMeterEffect),
}

macro_rules! dispatch {
    ($slot:expr, $effect:ident => $body:expr) => {
        match $slot {
            EffectSlot::ColorFill($effect) => $body,
            EffectSlot::Rainbow($effect) => $body,
            EffectSlot::PaletteFlame($effect) => $body,
            EffectSlot::VuMeter($effect) => $body,
        }
    };
}

impl EffectSlot {
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::ColorFill(_) => EffectKind::ColorFill,
            Self::Rainbow(_) => EffectKind::Rainbow,
            Self::PaletteFlame(_) => EffectKind::PaletteFlame,
            Self::VuMeter(_) => EffectKind::VuMeter,
        }
    }

    pub fn friendly_name(&self) -> &str {
        dispatch!(self, effect => effect.info().name())
    }

    /// Longest uninterrupted run this effect allows, if it caps itself
    pub fn maximum_effect_time(&self) -> Option<Duration> {
        dispatch!(self, effect => effect.info().max_effect_time())
    }

    pub fn can_display_vu_meter(&self) -> bool {
        dispatch!(self, effect => effect.can_display_vu_meter())
    }

    /// Override the friendly name
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        dispatch!(&mut self, effect => effect.info_mut().name = effect_name(name));
        self
    }

    /// Cap how long the effect runs before rotation moves on
    #[must_use]
    pub fn with_max_effect_time(mut self, limit: Duration) -> Self {
        dispatch!(&mut self, effect => effect.info_mut().max_effect_time = Some(limit));
        self
    }

    pub fn init<S: Surface>(&mut self, surfaces: &[S]) -> Result<(), InitError> {
        dispatch!(self, effect => effect.init(surfaces))
    }

    pub fn start(&mut self, now: Instant) {
        dispatch!(self, effect => effect.start(now));
    }

    pub fn draw<S: Surface>(&mut self, frame: &FrameContext<'_>, surfaces: &mut [S]) {
        dispatch!(self, effect => effect.draw(frame, surfaces));
    }

    /// Serialize into a configuration record
    pub fn to_config(&self) -> EffectConfig {
        let mut config = EffectConfig {
            kind: self.kind().as_raw(),
            name: String::from(self.friendly_name()),
            max_effect_time_ms: self.maximum_effect_time().map(|limit| limit.as_millis()),
            ..EffectConfig::default()
        };
        dispatch!(self, effect => effect.write_config(&mut config));
        config
    }

    /// Resolve a configuration record's type tag to an effect.
    ///
    /// Returns `None` for unknown tags.
    pub fn from_config(config: &EffectConfig) -> Option<Self> {
        let color = config.color.map(rgb_from_u32);
        let speed = config.speed_ms.map(Duration::from_millis);

        let mut slot = match EffectKind::from_raw(config.kind)? {
            EffectKind::ColorFill => Self::ColorFill(ColorFillEffect::new(color.unwrap_or(WHITE))),
            EffectKind::Rainbow => {
                let mut rainbow = RainbowEffect::default();
                if let Some(cycle) = speed {
                    rainbow = rainbow.with_cycle_duration(cycle);
                }
                Self::Rainbow(rainbow)
            }
            EffectKind::PaletteFlame => Self::PaletteFlame(PaletteFlameEffect::new(
                color.unwrap_or(RED),
                config.color2.map(rgb_from_u32),
            )),
            EffectKind::VuMeter => {
                let mut meter = VuMeterEffect::default();
                if let Some(color) = color {
                    meter = meter.with_color(color);
                }
                Self::VuMeter(meter)
            }
        };

        if !config.name.is_empty() {
            slot = slot.with_name(&config.name);
        }
        if let Some(limit) = config.max_effect_time_ms {
            slot = slot.with_max_effect_time(Duration::from_millis(limit));
        }
        Some(slot)
    }
}
