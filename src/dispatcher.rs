//! Routes decoded wire commands into the shared frame buffers and the
//! audio peak cell.

use crate::audio::AudioPeakCell;
use crate::error::ProtocolError;
use crate::frame_buffer::{ChannelFrameBuffers, IngestOutcome};
use crate::protocol::{self, Command};

/// Result of dispatching one payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Peak levels were published for `bands` bands
    Peaks { bands: usize },
    /// A pixel frame was applied to the channels in `channels`
    Pixels {
        /// Bit per channel that received the frame
        channels: u16,
        /// Bit per channel where the newest frame was updated in place
        updated: u16,
    },
}

/// Network side entry point: decode once, then fan out.
///
/// The payload is validated in full before any channel is touched, so a
/// malformed frame never reaches a subset of channels.
pub struct IngestionDispatcher<'a, const CHANNELS: usize, const LEDS: usize, const DEPTH: usize> {
    buffers: &'a ChannelFrameBuffers<CHANNELS, LEDS, DEPTH>,
    peaks: &'a AudioPeakCell,
}

impl<'a, const CHANNELS: usize, const LEDS: usize, const DEPTH: usize>
    IngestionDispatcher<'a, CHANNELS, LEDS, DEPTH>
{
    pub const fn new(
        buffers: &'a ChannelFrameBuffers<CHANNELS, LEDS, DEPTH>,
        peaks: &'a AudioPeakCell,
    ) -> Self {
        Self { buffers, peaks }
    }

    /// Decode `payload` and apply it.
    ///
    /// Errors are per payload; the caller logs and keeps receiving.
    pub fn dispatch(&self, payload: &[u8]) -> Result<Dispatched, ProtocolError> {
        let command = protocol::decode(payload).inspect_err(|error| {
            log::warn!("dropping {} byte payload: {}", payload.len(), error);
        })?;

        match command {
            Command::PeakData(peaks) => {
                let bands = peaks.bands().len();
                log::trace!("peak data for {} bands", bands);
                self.peaks.publish(peaks);
                Ok(Dispatched::Peaks { bands })
            }
            Command::PixelFrame(frame) => {
                log::trace!(
                    "pixel frame mask {:#06x}, {} pixels, at {}.{:06}",
                    frame.channel_mask,
                    frame.len(),
                    frame.timestamp.seconds,
                    frame.timestamp.micros
                );
                let mut channels = 0u16;
                let mut updated = 0u16;
                for channel in frame.channels(CHANNELS) {
                    let bit = 1 << channel;
                    channels |= bit;
                    if self.buffers.ingest(channel, &frame) == Some(IngestOutcome::Updated) {
                        updated |= bit;
                    }
                }
                Ok(Dispatched::Pixels { channels, updated })
            }
        }
    }
}
