//! Monotonic time primitives for trace measurement.
//!
//! Durations are measured against a process-wide epoch captured on first
//! use, so tick values are small, strictly non-decreasing, and immune to
//! wall-clock adjustments. Nanosecond granularity; the trace file format
//! downsamples to microseconds on export.

use std::ops::{Add, AddAssign, Sub};
use std::sync::OnceLock;
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();

fn epoch() -> Instant {
    *EPOCH.get_or_init(Instant::now)
}

/// A point on the process-wide monotonic clock, in nanoseconds since the
/// epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticks(u64);

impl Ticks {
    pub fn now() -> Self {
        Ticks(epoch().elapsed().as_nanos() as u64)
    }

    pub const fn from_nanos(nanos: u64) -> Self {
        Ticks(nanos)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Microseconds, by integer division.
    pub const fn as_micros(self) -> u64 {
        self.0 / 1000
    }
}

impl Sub for Ticks {
    type Output = TickDelta;

    fn sub(self, rhs: Ticks) -> TickDelta {
        TickDelta(self.0.saturating_sub(rhs.0))
    }
}

/// The span between two [`Ticks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickDelta(u64);

impl TickDelta {
    pub const ZERO: TickDelta = TickDelta(0);

    pub const fn from_nanos(nanos: u64) -> Self {
        TickDelta(nanos)
    }

    pub const fn from_millis(millis: u64) -> Self {
        TickDelta(millis * 1_000_000)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Microseconds, by integer division.
    pub const fn as_micros(self) -> u64 {
        self.0 / 1000
    }

    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }
}

impl Add for TickDelta {
    type Output = TickDelta;

    fn add(self, rhs: TickDelta) -> TickDelta {
        TickDelta(self.0 + rhs.0)
    }
}

impl AddAssign for TickDelta {
    fn add_assign(&mut self, rhs: TickDelta) {
        self.0 += rhs.0;
    }
}
