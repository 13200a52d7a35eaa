//! Latest audio peak levels shared between the receive and render tasks.
//!
//! No history is kept: every decoded peak frame replaces the previous one.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Vec;

/// Maximum number of frequency bands carried by a peak frame
pub const MAX_BANDS: usize = 16;

/// One snapshot of per-band peak levels (nominally 0.0-1.0)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioPeaks {
    bands: Vec<f32, MAX_BANDS>,
}

impl AudioPeaks {
    pub const fn new() -> Self {
        Self { bands: Vec::new() }
    }

    /// Build from a slice, dropping bands beyond [`MAX_BANDS`]
    pub fn from_levels(levels: &[f32]) -> Self {
        let mut peaks = Self::new();
        for &level in levels.iter().take(MAX_BANDS) {
            let _ = peaks.push(level);
        }
        peaks
    }

    /// Append a band level
    ///
    /// Returns the level back if all bands are already in use
    pub fn push(&mut self, level: f32) -> Result<(), f32> {
        self.bands.push(level)
    }

    pub fn bands(&self) -> &[f32] {
        &self.bands
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Mean level across bands, clamped to 0.0-1.0; silence without data
    #[allow(clippy::cast_precision_loss)]
    pub fn level(&self) -> f32 {
        if self.bands.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.bands.iter().map(|level| level.clamp(0.0, 1.0)).sum();
        sum / self.bands.len() as f32
    }
}

/// Single-writer, single-reader cell holding the latest [`AudioPeaks`].
///
/// Reads and writes are whole snapshots taken inside a critical section.
pub struct AudioPeakCell {
    inner: Mutex<RefCell<AudioPeaks>>,
}

impl Default for AudioPeakCell {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPeakCell {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(AudioPeaks::new())),
        }
    }

    /// Replace the latest peaks
    pub fn publish(&self, peaks: AudioPeaks) {
        critical_section::with(|cs| {
            *self.inner.borrow(cs).borrow_mut() = peaks;
        });
    }

    /// Copy of the latest peaks
    pub fn snapshot(&self) -> AudioPeaks {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().clone())
    }
}
