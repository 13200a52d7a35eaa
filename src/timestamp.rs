/// Sender wall-clock time attached to every pixel frame.
///
/// Ordering is lexicographic on `(seconds, micros)`, which matches
/// chronological order as long as `micros` stays below one second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub seconds: u64,
    pub micros: u64,
}

const MICROS_PER_SECOND: u64 = 1_000_000;

impl Timestamp {
    pub const fn new(seconds: u64, micros: u64) -> Self {
        Self { seconds, micros }
    }

    pub const fn from_micros(total: u64) -> Self {
        Self {
            seconds: total / MICROS_PER_SECOND,
            micros: total % MICROS_PER_SECOND,
        }
    }

    /// Seconds as a float, for diagnostics
    #[allow(clippy::cast_precision_loss)]
    pub fn as_secs_f64(self) -> f64 {
        self.seconds as f64 + self.micros as f64 / MICROS_PER_SECOND as f64
    }

    /// Seconds elapsed from `self` until `now`; negative for frames
    /// scheduled in the future.
    pub fn age_at(self, now: Timestamp) -> f64 {
        now.as_secs_f64() - self.as_secs_f64()
    }
}
