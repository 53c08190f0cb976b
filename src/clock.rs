//! # Wall Clock Access
//!
//! Everything time-related the face needs from the platform goes through
//! [`TimeSource`]: the current instant in milliseconds and the system's
//! default UTC offset. Tests substitute a fixed clock; the binary uses
//! [`SystemClock`], backed by chrono.

use crate::ClockSample;
use chrono::{DateTime, Datelike, FixedOffset, Local, Offset, TimeZone, Timelike, Utc};

/// Platform clock consumed by the engine.
pub trait TimeSource {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// The zone new samples should be taken in when the host asks for a refresh.
    fn default_zone(&self) -> FixedOffset;
}

/// Reads the operating system clock and local zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn default_zone(&self) -> FixedOffset {
        Local::now().offset().fix()
    }
}

/// A clock frozen at a given instant, handy for previews and tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    pub millis: i64,
    pub zone: FixedOffset,
}

impl TimeSource for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis
    }

    fn default_zone(&self) -> FixedOffset {
        self.zone
    }
}

impl ClockSample {
    /// Read every field from one zoned instant.
    pub fn from_datetime<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        let second = time.second() as f32 + time.timestamp_subsec_millis().min(999) as f32 / 1000.0;
        Self {
            year: time.year(),
            month: time.month(),
            day: time.day(),
            hour: time.hour(),
            minute: time.minute(),
            second,
        }
    }

    /// Sample the instant `millis` (Unix epoch) as seen in `zone`.
    ///
    /// Instants chrono cannot represent collapse to the epoch.
    pub fn at(millis: i64, zone: FixedOffset) -> Self {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
        Self::from_datetime(&utc.with_timezone(&zone))
    }
}
