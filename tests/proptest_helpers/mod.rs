#![allow(dead_code)]

use admgraph::model::{Gain, Importance, Language, Time};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Times up to ten hours, at nanosecond resolution.
pub fn arb_time() -> impl Strategy<Value = Time> {
    (0u64..36_000 * 1_000_000_000).prop_map(Time::from_nanos)
}

/// Non-zero times up to one hour, in whole milliseconds.
pub fn arb_positive_millis() -> impl Strategy<Value = Time> {
    (1u64..3_600_000).prop_map(Time::from_millis)
}

pub fn arb_importance() -> impl Strategy<Value = Importance> {
    (0u8..=10).prop_map(|v| Importance::new(v).expect("in range"))
}

pub fn arb_gain() -> impl Strategy<Value = Gain> {
    prop_oneof![
        (-60.0f64..20.0).prop_map(Gain::from_db),
        (0.0f64..8.0).prop_map(Gain::from_linear),
    ]
}

pub fn arb_language() -> impl Strategy<Value = Language> {
    "[a-z]{2,3}".prop_map(|code| Language::new(code).expect("valid code"))
}

/// Directed edges over `nodes` pack formats, self-loops included.
pub fn arb_edges(nodes: usize, max_edges: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..nodes, 0..nodes), 0..=max_edges)
}
