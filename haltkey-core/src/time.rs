//! Time source abstraction
//!
//! Timestamps are milliseconds since boot held in a `u32`. The counter wraps
//! after roughly 49.7 days of uptime, so every interval is computed with
//! wrapping subtraction and never by comparing two raw timestamps.

/// Milliseconds since an arbitrary start point (wraps at `u32::MAX`)
pub type Millis = u32;

/// Monotonic time source
///
/// Implementations must never block. The firmware backs this with the
/// embassy time driver; tests use a manually advanced counter.
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> Millis;
}

/// Milliseconds elapsed from `since` to `now`
///
/// Wrapping subtraction keeps intervals correct across counter rollover.
/// A clock that steps backwards produces a very large value, which reads as
/// "long overdue" and can only cause an action to fire early, never late.
#[inline]
pub fn elapsed_ms(now: Millis, since: Millis) -> Millis {
    now.wrapping_sub(since)
}

/// Check whether at least `period` has passed since `since`
#[inline]
pub fn has_elapsed(now: Millis, since: Millis, period: Millis) -> bool {
    elapsed_ms(now, since) >= period
}
