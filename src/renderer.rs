use embassy_time::{Duration, Instant};

use crate::admin::AdminReceiver;
use crate::audio::AudioPeakCell;
use crate::color::{BLACK, Rgb, scale_color};
use crate::effect::FrameContext;
use crate::frame_buffer::ChannelFrameBuffers;
use crate::manager::EffectManager;
use crate::surface::{LedSurface, Surface};
use crate::timestamp::Timestamp;

/// How long network frames keep priority after the last one was shown
pub const DEFAULT_NETWORK_HOLD: Duration = Duration::from_millis(1_000);

/// Configuration for the render tick
#[derive(Debug, Clone, Copy)]
pub struct RendererConfig {
    pub network_hold: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            network_hold: DEFAULT_NETWORK_HOLD,
        }
    }
}

/// What produced the last rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSource {
    /// Override or rotation effect from the scheduler
    Effects,
    /// Synchronized frames from the network buffers
    Network,
}

/// Render tick - the per-frame orchestrator
///
/// Applies pending admin commands, pulls due network frames, otherwise lets
/// the scheduler draw, and composites the surfaces with the crossfade fader
/// into the output frame.
pub struct Renderer<
    'a,
    const CHANNELS: usize,
    const LEDS: usize,
    const DEPTH: usize,
    const ADMIN_QUEUE_SIZE: usize,
> {
    // External dependencies and configuration
    buffers: &'a ChannelFrameBuffers<CHANNELS, LEDS, DEPTH>,
    peaks: &'a AudioPeakCell,
    admin: AdminReceiver<'a, ADMIN_QUEUE_SIZE>,
    network_hold: Duration,

    // Internal state
    manager: EffectManager<LedSurface<LEDS>, CHANNELS>,
    last_network_frame: Option<Instant>,
    source: RenderSource,
    fader: u8,
    output: [[Rgb; LEDS]; CHANNELS],
}

impl<'a, const CHANNELS: usize, const LEDS: usize, const DEPTH: usize, const ADMIN_QUEUE_SIZE: usize>
    Renderer<'a, CHANNELS, LEDS, DEPTH, ADMIN_QUEUE_SIZE>
{
    pub fn new(
        manager: EffectManager<LedSurface<LEDS>, CHANNELS>,
        buffers: &'a ChannelFrameBuffers<CHANNELS, LEDS, DEPTH>,
        peaks: &'a AudioPeakCell,
        admin: AdminReceiver<'a, ADMIN_QUEUE_SIZE>,
        config: &RendererConfig,
    ) -> Self {
        Self {
            buffers,
            peaks,
            admin,
            network_hold: config.network_hold,
            manager,
            last_network_frame: None,
            source: RenderSource::Effects,
            fader: 255,
            output: [[BLACK; LEDS]; CHANNELS],
        }
    }

    /// Process one frame
    ///
    /// `now` drives effect timing, `wall_clock` is compared against sender
    /// timestamps to decide which network frames are due.
    pub fn render(&mut self, now: Instant, wall_clock: Timestamp) -> &[[Rgb; LEDS]; CHANNELS] {
        self.admin.process_pending(&mut self.manager);

        if self.pull_network_frames(now, wall_clock) {
            self.source = RenderSource::Network;
            self.fader = 255;
        } else {
            self.source = RenderSource::Effects;
            let peaks = self.peaks.snapshot();
            let frame = FrameContext {
                now,
                peaks: &peaks,
            };
            self.fader = self.manager.update(&frame);
        }

        self.composite();
        &self.output
    }

    /// Copy due network frames onto their surfaces.
    ///
    /// Returns whether the network currently has priority.
    fn pull_network_frames(&mut self, now: Instant, wall_clock: Timestamp) -> bool {
        let mut received = false;
        for (channel, surface) in self.manager.surfaces_mut().iter_mut().enumerate() {
            let Some(frame) = self.buffers.take_due(channel, wall_clock) else {
                continue;
            };
            for (index, color) in frame.pixels().iter().enumerate() {
                surface.set_pixel(index, *color);
            }
            received = true;
        }

        if received {
            self.last_network_frame = Some(now);
        }
        self.last_network_frame
            .is_some_and(|shown| now.saturating_duration_since(shown) < self.network_hold)
    }

    /// Scale surface contents by the fader into the output frame.
    ///
    /// The surfaces themselves keep full brightness for the next draw.
    fn composite(&mut self) {
        for (output, surface) in self.output.iter_mut().zip(self.manager.surfaces()) {
            for (pixel, color) in output.iter_mut().zip(surface.leds()) {
                *pixel = scale_color(*color, self.fader);
            }
        }
    }

    /// Crossfade brightness applied to the last frame
    pub const fn fader(&self) -> u8 {
        self.fader
    }

    pub const fn source(&self) -> RenderSource {
        self.source
    }

    /// Last composited output
    pub fn output(&self) -> &[[Rgb; LEDS]; CHANNELS] {
        &self.output
    }

    pub fn manager(&self) -> &EffectManager<LedSurface<LEDS>, CHANNELS> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut EffectManager<LedSurface<LEDS>, CHANNELS> {
        &mut self.manager
    }
}
