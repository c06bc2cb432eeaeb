//! Quiet-period debouncing driven by the event loop clock.
//!
//! A [`Debouncer`] holds at most one pending value. Every `queue` replaces
//! the value and restarts the quiet period, so a burst of calls collapses to
//! the last one. The owner polls [`Debouncer::take_ready`] with the current
//! time and receives the value once the quiet period has elapsed.

/// Holds the latest queued value until `delay_ms` passes without a new one.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Replace any pending value and restart the quiet period at `now_ms`.
    pub fn queue(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let queued_at = self.pending.as_ref()?.1;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Take the pending value immediately, ignoring the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Milliseconds left before the pending value becomes ready.
    pub fn time_until_ready(&self, now_ms: u64) -> Option<u64> {
        let (_, queued_at) = self.pending.as_ref()?;
        Some(
            self.delay_ms
                .saturating_sub(now_ms.saturating_sub(*queued_at)),
        )
    }
}
