#![no_std]

extern crate alloc;

pub mod admin;
pub mod audio;
pub mod catalog;
pub mod color;
pub mod dispatcher;
pub mod effect;
pub mod error;
pub mod frame_buffer;
pub mod frame_scheduler;
#[cfg(feature = "esp32-log")]
pub mod logger;
pub mod manager;
pub mod math8;
pub mod protocol;
pub mod renderer;
pub mod surface;
pub mod timestamp;

pub use admin::{AdminCommand, AdminQueue, AdminReceiver, AdminSender};
pub use audio::{AudioPeakCell, AudioPeaks};
pub use catalog::{EffectConfig, default_catalog};
pub use dispatcher::{Dispatched, IngestionDispatcher};
pub use effect::{EffectKind, EffectSlot, FrameContext};
pub use error::{AdminError, ConfigError, IndexError, InitError, ProtocolError};
pub use frame_buffer::{ChannelFrameBuffers, Frame, FrameBuffer, IngestOutcome};
pub use frame_scheduler::FrameScheduler;
pub use manager::{EffectManager, EffectManagerConfig};
pub use protocol::{Command, decode};
pub use renderer::{RenderSource, Renderer, RendererConfig};
pub use surface::{LedSurface, Surface};
pub use timestamp::Timestamp;

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write one channel's composited colors
    fn write(&mut self, channel: usize, colors: &[Rgb]);
}
