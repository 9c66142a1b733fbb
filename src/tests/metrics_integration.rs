#![cfg(feature = "observability")]

//! Metrics sink integration tests.
//!
//! The sink is process-global and can only be installed once, so every test
//! shares one recording sink and runs serially.

use std::sync::{Arc, Mutex, OnceLock};

use serial_test::serial;

use crate::metrics::{BuildPhases, BuildStats, MetricsSink, set_sink};
use crate::timers::as_millis_f64;
use crate::{Profile, build};

#[derive(Default)]
struct RecordingSink {
    builds: Mutex<Vec<BuildStats>>,
    phases: Mutex<Vec<(String, BuildPhases)>>,
}

impl RecordingSink {
    fn builds_for(&self, bucket: &str) -> Vec<BuildStats> {
        self.builds
            .lock()
            .unwrap()
            .iter()
            .filter(|stats| stats.bucket == bucket)
            .cloned()
            .collect()
    }

    fn phases_for(&self, bucket: &str) -> Vec<BuildPhases> {
        self.phases
            .lock()
            .unwrap()
            .iter()
            .filter(|(b, _)| b == bucket)
            .map(|(_, phases)| phases.clone())
            .collect()
    }
}

impl MetricsSink for RecordingSink {
    fn on_build(&self, stats: &BuildStats) {
        self.builds.lock().unwrap().push(stats.clone());
    }

    fn on_build_phases(&self, stats: &BuildStats, phases: &BuildPhases) {
        self.phases
            .lock()
            .unwrap()
            .push((stats.bucket.clone(), phases.clone()));
    }
}

// Other tests build concurrently and report into the same sink, so each test
// uses its own bucket name and only looks at its own records.
fn recording_sink() -> Arc<RecordingSink> {
    static RECORDER: OnceLock<Arc<RecordingSink>> = OnceLock::new();
    RECORDER
        .get_or_init(|| {
            let sink = Arc::new(RecordingSink::default());
            set_sink(sink.clone());
            sink
        })
        .clone()
}

#[test]
#[serial]
fn test_build_records_stats() {
    let sink = recording_sink();

    let bytes = build("readonly", "metrics-stats").unwrap();

    let builds = sink.builds_for("metrics-stats");
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0].profile, Profile::ReadOnly);
    assert_eq!(builds[0].statements, 3);
    assert_eq!(builds[0].bytes, bytes.len());

    let phases = sink.phases_for("metrics-stats");
    assert_eq!(phases.len(), 1);
    assert!(phases[0].overhead_ms() > -1e-9);
    assert_eq!(as_millis_f64(builds[0].duration), phases[0].total_ms);
}

#[test]
#[serial]
fn test_failed_build_records_nothing() {
    let sink = recording_sink();

    assert!(build("nonsense", "metrics-failed").is_err());

    assert!(sink.builds_for("metrics-failed").is_empty());
    assert!(sink.phases_for("metrics-failed").is_empty());
}

#[test]
#[serial]
fn test_second_sink_is_ignored() {
    let sink = recording_sink();

    set_sink(Arc::new(RecordingSink::default()));
    build("public", "metrics-second").unwrap();

    assert_eq!(sink.builds_for("metrics-second").len(), 1);
}
