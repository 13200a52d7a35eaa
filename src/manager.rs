//! Effect scheduler: catalog, enabled set, rotation timer, crossfade fader
//! and the remote color override.
//!
//! Selection (`current`) and override are independent: installing or
//! clearing an override never moves the rotation position.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use crate::catalog::{self, Catalog, EnabledFlags, MAX_EFFECTS};
use crate::color::{BLACK, RED, Rgb, WHITE};
use crate::effect::{ColorFillEffect, EffectSlot, FrameContext, PaletteFlameEffect};
use crate::error::{ConfigError, IndexError, InitError};
use crate::math8::ratio8;
use crate::surface::Surface;

/// Default ceiling on a single effect's run
pub const DEFAULT_EFFECT_INTERVAL: Duration = Duration::from_millis(30_000);

/// Default length of the fade in and fade out windows
pub const DEFAULT_CROSSFADE: Duration = Duration::from_millis(1_500);

const ZERO: Duration = Duration::from_millis(0);

const OVERRIDE_NAME: &str = "Custom Fire";

/// Scheduler settings
#[derive(Debug, Clone, Copy)]
pub struct EffectManagerConfig {
    /// Longest uninterrupted run of one effect; zero disables rotation
    pub rotation_interval: Duration,
    /// Fade window at the start and end of each run
    pub crossfade: Duration,
    /// Rotate through every entry, ignoring the enabled set
    pub play_all: bool,
    pub show_vu: bool,
}

impl Default for EffectManagerConfig {
    fn default() -> Self {
        Self {
            rotation_interval: DEFAULT_EFFECT_INTERVAL,
            crossfade: DEFAULT_CROSSFADE,
            play_all: false,
            show_vu: true,
        }
    }
}

/// Owns the effect catalog and decides what is drawn each frame.
///
/// The catalog is never empty once constructed.
pub struct EffectManager<S: Surface, const CHANNELS: usize> {
    surfaces: [S; CHANNELS],

    catalog: Catalog,
    enabled: EnabledFlags,
    enabled_count: usize,
    current: usize,

    rotation_interval: Duration,
    crossfade: Duration,
    play_all: bool,
    show_vu: bool,

    /// Start of the active run; `None` until the next tick starts it
    effect_start: Option<Instant>,

    remote_override: Option<EffectSlot>,
    last_override_color: Rgb,
}

impl<S: Surface, const CHANNELS: usize> EffectManager<S, CHANNELS> {
    /// Create a manager over `surfaces` with an explicit catalog
    pub fn new(
        surfaces: [S; CHANNELS],
        effects: impl IntoIterator<Item = EffectSlot>,
        config: &EffectManagerConfig,
    ) -> Result<Self, ConfigError> {
        let mut manager = Self::unloaded(surfaces, config);
        manager.load_catalog(effects)?;
        Ok(manager)
    }

    /// Create a manager from a persisted catalog document
    pub fn from_document(
        surfaces: [S; CHANNELS],
        document: &[u8],
        config: &EffectManagerConfig,
    ) -> Result<Self, ConfigError> {
        let mut manager = Self::unloaded(surfaces, config);
        manager.load_catalog_from_config(document)?;
        Ok(manager)
    }

    /// Create a manager with the built-in catalog
    pub fn with_default_catalog(surfaces: [S; CHANNELS], config: &EffectManagerConfig) -> Self {
        let mut manager = Self::unloaded(surfaces, config);
        let catalog = catalog::default_catalog();
        let enabled = catalog.iter().map(|_| true).collect();
        manager.install(catalog, enabled);
        manager
    }

    /// Load the document, falling back to the built-in catalog
    pub fn from_document_or_default(
        surfaces: [S; CHANNELS],
        document: &[u8],
        config: &EffectManagerConfig,
    ) -> Self {
        let mut manager = Self::with_default_catalog(surfaces, config);
        if let Err(error) = manager.load_catalog_from_config(document) {
            log::warn!("using default effect catalog: {}", error);
        }
        manager
    }

    fn unloaded(surfaces: [S; CHANNELS], config: &EffectManagerConfig) -> Self {
        Self {
            surfaces,
            catalog: Catalog::new(),
            enabled: EnabledFlags::new(),
            enabled_count: 0,
            current: 0,
            rotation_interval: config.rotation_interval,
            crossfade: config.crossfade,
            play_all: config.play_all,
            show_vu: config.show_vu,
            effect_start: None,
            remote_override: None,
            last_override_color: RED,
        }
    }

    /// Replace the catalog; every entry starts enabled
    pub fn load_catalog(
        &mut self,
        effects: impl IntoIterator<Item = EffectSlot>,
    ) -> Result<(), ConfigError> {
        let mut catalog = Catalog::new();
        for effect in effects {
            catalog
                .push(effect)
                .map_err(|_| ConfigError::TooManyEffects { max: MAX_EFFECTS })?;
        }
        if catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        let enabled = catalog.iter().map(|_| true).collect();
        self.install(catalog, enabled);
        Ok(())
    }

    /// Replace the catalog and enabled set from a persisted document.
    ///
    /// On error the current catalog is kept untouched.
    pub fn load_catalog_from_config(&mut self, document: &[u8]) -> Result<(), ConfigError> {
        let loaded = catalog::parse_catalog(document)?;
        self.install(loaded.effects, loaded.enabled);
        Ok(())
    }

    /// Serialize the catalog and enabled set
    pub fn save_catalog(&self) -> Result<Vec<u8>, ConfigError> {
        catalog::serialize_catalog(&self.catalog, &self.enabled)
    }

    fn install(&mut self, mut catalog: Catalog, mut enabled: EnabledFlags) {
        self.remote_override = None;

        for (effect, flag) in catalog.iter_mut().zip(enabled.iter_mut()) {
            if let Err(error) = effect.init(&self.surfaces) {
                log::warn!("could not initialize effect {}: {}", effect.friendly_name(), error);
                *flag = false;
            }
        }

        self.enabled_count = enabled.iter().filter(|flag| **flag).count();
        self.catalog = catalog;
        self.enabled = enabled;
        self.current = 0;
        self.restart();

        log::info!(
            "loaded {} effects, {} enabled",
            self.catalog.len(),
            self.enabled_count
        );

        if self.enabled_count == 0 {
            self.show_black();
        }
    }

    pub fn effects(&self) -> &[EffectSlot] {
        &self.catalog
    }

    pub fn effect_count(&self) -> usize {
        self.catalog.len()
    }

    pub const fn enabled_count(&self) -> usize {
        self.enabled_count
    }

    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Enabled state of entry `index`; out of range reads as disabled
    pub fn is_enabled(&self, index: usize) -> bool {
        self.enabled.get(index).copied().unwrap_or(false)
    }

    fn check_index(&self, index: usize) -> Result<(), IndexError> {
        if index < self.catalog.len() {
            return Ok(());
        }
        let error = IndexError {
            index,
            count: self.catalog.len(),
        };
        log::warn!("{}", error);
        Err(error)
    }

    /// Enable entry `index`.
    ///
    /// Enabling the first entry out of none clears the override so rotation
    /// becomes visible again.
    pub fn enable(&mut self, index: usize) -> Result<(), IndexError> {
        self.check_index(index)?;
        if !self.enabled[index] {
            self.enabled[index] = true;
            if self.enabled_count == 0 {
                self.clear_global_color_override();
            }
            self.enabled_count += 1;
        }
        Ok(())
    }

    /// Disable entry `index`.
    ///
    /// Disabling the last enabled entry shows black instead of a frozen frame.
    pub fn disable(&mut self, index: usize) -> Result<(), IndexError> {
        self.check_index(index)?;
        if self.enabled[index] {
            self.enabled[index] = false;
            self.enabled_count -= 1;
            if self.enabled_count == 0 {
                self.show_black();
            }
        }
        Ok(())
    }

    fn show_black(&mut self) {
        if let Err(error) = self.set_global_color_override(BLACK) {
            log::warn!("could not show black fallback: {}", error);
        }
    }

    /// Install a transient effect in `color` that supersedes rotation.
    ///
    /// Black and white become a plain fill, other colors a flame blending
    /// towards the previous override color. If the effect cannot be
    /// initialized the previous state is kept.
    pub fn set_global_color_override(&mut self, color: Rgb) -> Result<(), InitError> {
        let mut effect = if color == BLACK || color == WHITE {
            EffectSlot::ColorFill(ColorFillEffect::new(color))
        } else {
            EffectSlot::PaletteFlame(PaletteFlameEffect::new(
                color,
                Some(self.last_override_color),
            ))
            .with_name(OVERRIDE_NAME)
        };

        effect.init(&self.surfaces).inspect_err(|error| {
            log::warn!("global color override rejected: {}", error);
        })?;

        log::debug!("global color override {:?}", color);
        self.last_override_color = color;
        self.remote_override = Some(effect);
        self.restart();
        Ok(())
    }

    /// Drop the override; rotation restarts at the current index on the
    /// next tick
    pub fn clear_global_color_override(&mut self) {
        if self.remote_override.take().is_some() {
            self.restart();
        }
    }

    pub const fn has_override(&self) -> bool {
        self.remote_override.is_some()
    }

    /// Advance to the next entry, skipping disabled ones unless playing all
    pub fn next_effect(&mut self) {
        self.step(|current, count| (current + 1) % count);
    }

    /// Go back to the previous entry, skipping disabled ones unless playing all
    pub fn previous_effect(&mut self) {
        self.step(|current, count| (current + count - 1) % count);
    }

    /// Move in one direction until an eligible entry is found, giving up
    /// after a full lap.
    fn step(&mut self, advance: impl Fn(usize, usize) -> usize) {
        let count = self.catalog.len();
        if count == 0 {
            return;
        }
        for _ in 0..count {
            self.current = advance(self.current, count);
            if self.enabled_count == 0 || self.play_all || self.enabled[self.current] {
                break;
            }
        }
        self.restart();
        log::debug!("current effect: {}", self.current_effect_name());
    }

    /// Jump to entry `index`
    pub fn select_effect(&mut self, index: usize) -> Result<(), IndexError> {
        self.check_index(index)?;
        self.current = index;
        self.restart();
        Ok(())
    }

    /// Rotation effect at the current index
    pub fn current_effect(&self) -> &EffectSlot {
        &self.catalog[self.current]
    }

    /// Effect that is drawn: the override if present, else rotation
    pub fn active_effect(&self) -> &EffectSlot {
        self.remote_override
            .as_ref()
            .unwrap_or_else(|| self.current_effect())
    }

    pub fn current_effect_name(&self) -> &str {
        self.active_effect().friendly_name()
    }

    pub fn set_play_all(&mut self, play_all: bool) {
        self.play_all = play_all;
    }

    pub const fn play_all(&self) -> bool {
        self.play_all
    }

    /// Change the rotation interval; zero runs the current effect forever
    pub fn set_rotation_interval(&mut self, interval: Duration) {
        self.rotation_interval = interval;
    }

    pub const fn rotation_interval(&self) -> Duration {
        self.rotation_interval
    }

    pub fn set_crossfade(&mut self, crossfade: Duration) {
        self.crossfade = crossfade;
    }

    /// Show or hide the VU meter, returning the previous setting.
    ///
    /// Hiding clears the primary surface since not every effect redraws
    /// all pixels.
    pub fn show_vu(&mut self, show: bool) -> bool {
        let previous = self.show_vu;
        self.show_vu = show;
        if !show {
            if let Some(surface) = self.surfaces.first_mut() {
                surface.clear();
            }
        }
        previous
    }

    pub fn is_vu_visible(&self) -> bool {
        self.show_vu && self.current_effect().can_display_vu_meter()
    }

    pub fn surfaces(&self) -> &[S; CHANNELS] {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut [S; CHANNELS] {
        &mut self.surfaces
    }

    fn restart(&mut self) {
        self.effect_start = None;
    }

    fn ensure_started(&mut self, now: Instant) {
        if self.effect_start.is_some() {
            return;
        }
        match self.remote_override.as_mut() {
            Some(effect) => effect.start(now),
            None => {
                if let Some(effect) = self.catalog.get_mut(self.current) {
                    effect.start(now);
                }
            }
        }
        self.effect_start = Some(now);
    }

    /// Time spent in the active run
    pub fn time_used(&self, now: Instant) -> Duration {
        self.effect_start
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or(ZERO)
    }

    /// Length of the active run, or `None` when rotation is disabled.
    ///
    /// An effect's own maximum time caps the global rotation interval.
    pub fn effective_interval(&self) -> Option<Duration> {
        if self.rotation_interval == ZERO {
            return None;
        }
        let interval = match self.current_effect().maximum_effect_time() {
            Some(limit) => self.rotation_interval.min(limit),
            None => self.rotation_interval,
        };
        Some(interval)
    }

    /// Time left in the active run, or `None` when rotation is disabled
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.effective_interval()
            .map(|interval| interval.checked_sub(self.time_used(now)).unwrap_or(ZERO))
    }

    /// Start a pending run and rotate when the active run has expired
    pub fn tick(&mut self, now: Instant) {
        self.ensure_started(now);

        let Some(interval) = self.effective_interval() else {
            return;
        };
        let used = self.time_used(now);
        if used >= interval {
            log::debug!("{}ms elapsed: next effect", used.as_millis());
            self.next_effect();
            self.ensure_started(now);
        }
    }

    /// Draw the override if present, else the current rotation effect
    pub fn draw(&mut self, frame: &FrameContext<'_>) {
        self.ensure_started(frame.now);

        match self.remote_override.as_mut() {
            Some(effect) => effect.draw(frame, &mut self.surfaces),
            None => {
                if let Some(effect) = self.catalog.get_mut(self.current) {
                    effect.draw(frame, &mut self.surfaces);
                }
            }
        }
    }

    /// Crossfade brightness (0-255) for the active run.
    ///
    /// Ramps up over the first crossfade window, holds, and ramps down over
    /// the last one. Fixed at full brightness with fewer than two effects or
    /// with rotation disabled.
    pub fn fader(&self, now: Instant) -> u8 {
        if self.catalog.len() < 2 {
            return 255;
        }
        let Some(interval) = self.effective_interval() else {
            return 255;
        };

        let used = self.time_used(now);
        let remaining = interval.checked_sub(used).unwrap_or(ZERO);

        if used < self.crossfade {
            ratio8(used, self.crossfade)
        } else if remaining < self.crossfade {
            ratio8(remaining, self.crossfade)
        } else {
            255
        }
    }

    /// One render step: expire timers, draw, and return the fader
    pub fn update(&mut self, frame: &FrameContext<'_>) -> u8 {
        self.tick(frame.now);
        self.draw(frame);
        self.fader(frame.now)
    }
}
