// Proptest prelude: shared configuration for integration tests.
//
// Env knobs:
// - PROPTEST_CASES: number of cases per property (default 8; games are slow).
// - PROPTEST_MAX_SHRINK_MS: optional cap for shrinking time in milliseconds.

use proptest::prelude::ProptestConfig;

pub fn proptest_prelude_config() -> ProptestConfig {
    let base = ProptestConfig::default();

    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(8)
        .max(1);

    let max_shrink_time = std::env::var("PROPTEST_MAX_SHRINK_MS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(base.max_shrink_time);

    ProptestConfig {
        // Disable persistence to silence regression-file warnings
        failure_persistence: None,
        cases,
        max_shrink_time,
        ..base
    }
}
