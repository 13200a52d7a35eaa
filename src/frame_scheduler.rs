//! Frame pacing for the render task.
//!
//! Portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::timestamp::Timestamp;
use crate::{OutputDriver, Renderer};

/// Default target frame rate (90 FPS).
pub const DEFAULT_FPS: u32 = 90;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Drives a [`Renderer`] at a fixed rate and hands every channel's output
/// to the driver.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(renderer, driver);
///
/// loop {
///     let result = scheduler.tick(Instant::now(), wall_clock());
///     Timer::after(result.sleep_duration).await;
/// }
/// ```
pub struct FrameScheduler<
    'a,
    O: OutputDriver,
    const CHANNELS: usize,
    const LEDS: usize,
    const DEPTH: usize,
    const ADMIN_QUEUE_SIZE: usize,
> {
    output: O,
    renderer: Renderer<'a, CHANNELS, LEDS, DEPTH, ADMIN_QUEUE_SIZE>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<
    'a,
    O: OutputDriver,
    const CHANNELS: usize,
    const LEDS: usize,
    const DEPTH: usize,
    const ADMIN_QUEUE_SIZE: usize,
> FrameScheduler<'a, O, CHANNELS, LEDS, DEPTH, ADMIN_QUEUE_SIZE>
{
    /// Create a new frame scheduler at [`DEFAULT_FPS`].
    pub fn new(renderer: Renderer<'a, CHANNELS, LEDS, DEPTH, ADMIN_QUEUE_SIZE>, driver: O) -> Self {
        Self::with_frame_duration(renderer, driver, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        renderer: Renderer<'a, CHANNELS, LEDS, DEPTH, ADMIN_QUEUE_SIZE>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            renderer,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Render one frame, write every channel and return timing information.
    ///
    /// Falling more than two frames behind resets the schedule to `now`
    /// instead of bursting to catch up.
    pub fn tick(&mut self, now: Instant, wall_clock: Timestamp) -> FrameResult {
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let frames = self.renderer.render(now, wall_clock);
        for (channel, frame) in frames.iter().enumerate() {
            self.output.write(channel, frame);
        }

        self.next_frame += self.frame_duration;

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration: self.next_frame.saturating_duration_since(now),
        }
    }

    /// Get a reference to the renderer.
    pub fn renderer(&self) -> &Renderer<'a, CHANNELS, LEDS, DEPTH, ADMIN_QUEUE_SIZE> {
        &self.renderer
    }

    /// Get a mutable reference to the renderer.
    pub fn renderer_mut(&mut self) -> &mut Renderer<'a, CHANNELS, LEDS, DEPTH, ADMIN_QUEUE_SIZE> {
        &mut self.renderer
    }

    /// Get a reference to the output driver.
    pub fn output(&self) -> &O {
        &self.output
    }
}
