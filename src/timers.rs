//! RAII timing of build phases.

use std::time::{Duration, Instant};

/// Adds the time between creation and drop to `slot`.
///
/// ```rust,ignore
/// let mut compose = Duration::ZERO;
/// {
///     let _timer = PhaseTimer::new(&mut compose);
///     // ... compose the document ...
/// }
/// ```
pub(crate) struct PhaseTimer<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub(crate) fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}

pub(crate) fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}
