//! Bounded, timestamp ordered frame buffers for network driven channels.
//!
//! Frames are only ever appended or replaced at the newest position, so the
//! buffer stays ordered by sender timestamp without re-sorting. A channel
//! that receives faster than it is drained loses its oldest frames.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::color::{BLACK, Rgb};
use crate::protocol::PixelFrame;
use crate::timestamp::Timestamp;

/// One timestamped pixel delivery for a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const LEDS: usize> {
    timestamp: Timestamp,
    pixels: [Rgb; LEDS],
}

impl<const LEDS: usize> Frame<LEDS> {
    pub const fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            pixels: [BLACK; LEDS],
        }
    }

    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Copy a wire payload into this frame.
    ///
    /// Payloads longer than the channel are cut off, shorter ones leave the
    /// remaining pixels black.
    pub fn update_from_wire(&mut self, frame: &PixelFrame<'_>) {
        self.timestamp = frame.timestamp;
        self.pixels = [BLACK; LEDS];
        for (pixel, color) in self.pixels.iter_mut().zip(frame.pixels()) {
            *pixel = color;
        }
    }
}

/// How an incoming frame was merged into a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The newest frame had the same timestamp and was overwritten
    Updated,
    /// A new frame was appended, possibly evicting the oldest one
    Appended,
}

/// Diagnostic snapshot of a buffer relative to a wall-clock time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferStats {
    pub depth: usize,
    pub capacity: usize,
    /// Seconds since the oldest buffered frame's timestamp
    pub oldest_age: Option<f64>,
    /// Seconds since the newest buffered frame's timestamp
    pub newest_age: Option<f64>,
}

/// Frames for a single channel, oldest first, at most `DEPTH` of them.
///
/// `DEPTH` must be non-zero.
#[derive(Debug)]
pub struct FrameBuffer<const LEDS: usize, const DEPTH: usize> {
    frames: Deque<Frame<LEDS>, DEPTH>,
}

impl<const LEDS: usize, const DEPTH: usize> Default for FrameBuffer<LEDS, DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LEDS: usize, const DEPTH: usize> FrameBuffer<LEDS, DEPTH> {
    pub const fn new() -> Self {
        Self {
            frames: Deque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of buffered frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub const fn capacity(&self) -> usize {
        DEPTH
    }

    /// Allocate a frame at the newest position, evicting the oldest one
    /// when the buffer is full.
    ///
    /// `DEPTH` is at least one (`heapless` rejects a zero capacity deque at
    /// compile time), so a slot is always available after the eviction.
    pub fn get_new_frame(&mut self, timestamp: Timestamp) -> Option<&mut Frame<LEDS>> {
        if self.frames.is_full() {
            self.frames.pop_front();
        }
        self.frames.push_back(Frame::new(timestamp)).ok()?;
        self.frames.back_mut()
    }

    pub fn peek_newest(&self) -> Option<&Frame<LEDS>> {
        self.frames.back()
    }

    pub fn peek_oldest(&self) -> Option<&Frame<LEDS>> {
        self.frames.front()
    }

    /// Buffered frames, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Frame<LEDS>> {
        self.frames.iter()
    }

    /// Merge a decoded pixel frame into the buffer.
    ///
    /// A frame whose timestamp equals the newest buffered one replaces it in
    /// place (re-delivery of the same logical frame); anything else is
    /// appended, so `Appended` always means the frame was stored.
    pub fn ingest(&mut self, frame: &PixelFrame<'_>) -> IngestOutcome {
        if let Some(newest) = self.frames.back_mut() {
            if newest.timestamp == frame.timestamp {
                log::trace!("updating existing frame");
                newest.update_from_wire(frame);
                return IngestOutcome::Updated;
            }
        }

        log::trace!("no match, appending new frame");
        if let Some(slot) = self.get_new_frame(frame.timestamp) {
            slot.update_from_wire(frame);
        }
        IngestOutcome::Appended
    }

    /// Remove every frame that is due at `now` and return the newest of them.
    ///
    /// Older due frames are stale: a newer one is already ready to show.
    pub fn take_due(&mut self, now: Timestamp) -> Option<Frame<LEDS>> {
        let mut due = None;
        while self
            .frames
            .front()
            .is_some_and(|oldest| oldest.timestamp <= now)
        {
            due = self.frames.pop_front();
        }
        due
    }

    pub fn age_of_oldest(&self, now: Timestamp) -> Option<f64> {
        self.peek_oldest().map(|frame| frame.timestamp.age_at(now))
    }

    pub fn age_of_newest(&self, now: Timestamp) -> Option<f64> {
        self.peek_newest().map(|frame| frame.timestamp.age_at(now))
    }

    pub fn stats(&self, now: Timestamp) -> BufferStats {
        BufferStats {
            depth: self.depth(),
            capacity: DEPTH,
            oldest_age: self.age_of_oldest(now),
            newest_age: self.age_of_newest(now),
        }
    }
}

/// Frame buffers for every output channel behind one shared lock.
///
/// The lock is held for a single append, update, eviction or read, never
/// across decoding or drawing.
pub struct ChannelFrameBuffers<const CHANNELS: usize, const LEDS: usize, const DEPTH: usize> {
    inner: Mutex<RefCell<[FrameBuffer<LEDS, DEPTH>; CHANNELS]>>,
}

impl<const CHANNELS: usize, const LEDS: usize, const DEPTH: usize> Default
    for ChannelFrameBuffers<CHANNELS, LEDS, DEPTH>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const CHANNELS: usize, const LEDS: usize, const DEPTH: usize>
    ChannelFrameBuffers<CHANNELS, LEDS, DEPTH>
{
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new([const { FrameBuffer::new() }; CHANNELS])),
        }
    }

    pub const fn channels(&self) -> usize {
        CHANNELS
    }

    /// Run `f` against one channel's buffer inside the critical section.
    ///
    /// Returns `None` for an unknown channel.
    pub fn with_channel<R>(
        &self,
        channel: usize,
        f: impl FnOnce(&mut FrameBuffer<LEDS, DEPTH>) -> R,
    ) -> Option<R> {
        critical_section::with(|cs| {
            let mut buffers = self.inner.borrow(cs).borrow_mut();
            buffers.get_mut(channel).map(f)
        })
    }

    pub fn ingest(&self, channel: usize, frame: &PixelFrame<'_>) -> Option<IngestOutcome> {
        self.with_channel(channel, |buffer| buffer.ingest(frame))
    }

    pub fn take_due(&self, channel: usize, now: Timestamp) -> Option<Frame<LEDS>> {
        self.with_channel(channel, |buffer| buffer.take_due(now))
            .flatten()
    }

    pub fn depth(&self, channel: usize) -> usize {
        self.with_channel(channel, |buffer| buffer.depth())
            .unwrap_or(0)
    }

    pub fn stats(&self, channel: usize, now: Timestamp) -> Option<BufferStats> {
        self.with_channel(channel, |buffer| buffer.stats(now))
    }
}
