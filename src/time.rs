//! Time abstraction traits for platform-agnostic timing.
//!
//! The pipeline only ever asks "how many milliseconds have passed since this
//! instant", so the traits stay deliberately small. Implement them over your
//! platform's monotonic millisecond timer (e.g. a wrapping 32-bit counter).

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations over wrapping hardware counters should return the
    /// wrapped difference rather than panic.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}
