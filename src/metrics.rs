//! Vendor-agnostic build metrics via a pluggable sink.
//!
//! Only compiled with the `observability` feature. Implement [`MetricsSink`]
//! and install it once with [`set_sink`]; every call to [`crate::build`] then
//! reports a [`BuildStats`] and its [`BuildPhases`].
//!
//! ```ignore
//! use bucket_policy_core::metrics::{BuildStats, MetricsSink};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! struct CounterSink {
//!     builds: AtomicU64,
//! }
//!
//! impl MetricsSink for CounterSink {
//!     fn on_build(&self, stats: &BuildStats) {
//!         self.builds.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! bucket_policy_core::metrics::set_sink(Arc::new(CounterSink { builds: AtomicU64::new(0) }));
//! ```

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::warn;

use crate::profile::Profile;

/// Outcome of one successful policy build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildStats {
    /// Wall-clock time for composition and serialization of the resolved
    /// profile. Name lookup is not included.
    pub duration: Duration,
    pub profile: Profile,
    pub bucket: String,
    /// Number of statements in the composed document.
    pub statements: usize,
    /// Length of the canonical JSON in bytes.
    pub bytes: usize,
}

/// Per-phase timings of a build, in milliseconds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildPhases {
    pub compose_ms: f64,
    pub serialize_ms: f64,
    pub total_ms: f64,
}

impl BuildPhases {
    /// Time not accounted for by the measured phases.
    pub fn overhead_ms(&self) -> f64 {
        self.total_ms - (self.compose_ms + self.serialize_ms)
    }
}

/// Consumer of build metrics. Called synchronously on the build path, so
/// implementations must be cheap and thread-safe.
pub trait MetricsSink: Send + Sync {
    fn on_build(&self, stats: &BuildStats);

    /// Phase breakdown of the same build. Default: ignored.
    fn on_build_phases(&self, _stats: &BuildStats, _phases: &BuildPhases) {}
}

static SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

/// Install the global sink. Only the first call takes effect; builds that
/// happen before any sink is installed are not reported.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    if SINK.set(sink).is_err() {
        warn!(
            "Metrics sink was already initialized. Ignoring subsequent set_sink call."
        );
    }
}

pub(crate) fn record_build(stats: BuildStats, phases: BuildPhases) {
    if let Some(sink) = SINK.get() {
        sink.on_build(&stats);
        sink.on_build_phases(&stats, &phases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overhead() {
        let phases = BuildPhases {
            compose_ms: 0.25,
            serialize_ms: 0.5,
            total_ms: 1.0,
        };
        assert!((phases.overhead_ms() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = BuildStats {
            duration: Duration::from_micros(10),
            profile: Profile::ReadOnly,
            bucket: "logs".to_string(),
            statements: 3,
            bytes: 400,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["profile"], "readonly");
        assert_eq!(value["statements"], 3);
    }
}
