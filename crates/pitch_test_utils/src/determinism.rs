//! Repeatability testing utilities.
//!
//! Provides a harness for checking that analysis stages return identical
//! output for identical input.
//!
//! # Testing Strategy
//!
//! Most of the engine is a pure function of its input, so repeated calls
//! must agree bit for bit. The exception is counter-formation placement,
//! which adds a bounded vertical jitter to every outfield marker. For that
//! stage two checks apply instead:
//!
//! - **Pinned jitter**: with [`pitch_core::jitter::NoJitter`] or
//!   [`pitch_core::jitter::FixedJitter`] the output is fully repeatable.
//! - **Live jitter**: with a real RNG, every field except `top` must match
//!   exactly and `top` may differ by at most twice the jitter amplitude.
//!
//! Floats do not implement `Hash`, so fingerprints hash the raw bits.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use pitch_core::analysis::TacticalReport;
use pitch_core::point::Point;

/// Result of a repeatability test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatabilityResult {
    /// Whether all runs produced identical fingerprints.
    pub is_repeatable: bool,
    /// Fingerprint from each run.
    pub fingerprints: Vec<u64>,
}

impl RepeatabilityResult {
    fn from_fingerprints(fingerprints: Vec<u64>) -> Self {
        let is_repeatable = fingerprints.windows(2).all(|w| w[0] == w[1]);
        Self {
            is_repeatable,
            fingerprints,
        }
    }

    /// Get all unique fingerprints (should be 1 for a repeatable stage).
    #[must_use]
    pub fn unique_fingerprints(&self) -> Vec<u64> {
        let mut unique = self.fingerprints.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different fingerprints.
    pub fn assert_repeatable(&self) {
        if !self.is_repeatable {
            let unique = self.unique_fingerprints();
            panic!(
                "Stage is not repeatable!\n\
                 Runs: {}\n\
                 Unique fingerprints: {} (expected 1)\n\
                 All fingerprints: {:?}",
                self.fingerprints.len(),
                unique.len(),
                self.fingerprints
            );
        }
    }
}

/// Run a stage several times and compare fingerprints.
///
/// # Example
///
/// ```ignore
/// use pitch_test_utils::determinism::{fingerprint_points, verify_repeatable};
///
/// let result = verify_repeatable(5, || reposition_companions(phase, &green, &black), |out| {
///     fingerprint_points(out)
/// });
/// result.assert_repeatable();
/// ```
pub fn verify_repeatable<T, Run, Fingerprint>(
    runs: usize,
    run: Run,
    fingerprint: Fingerprint,
) -> RepeatabilityResult
where
    Run: Fn() -> T,
    Fingerprint: Fn(&T) -> u64,
{
    let fingerprints = (0..runs).map(|_| fingerprint(&run())).collect();
    RepeatabilityResult::from_fingerprints(fingerprints)
}

/// Run a stage on several threads at once and compare fingerprints.
///
/// Uses scoped threads so `run` can borrow test data.
pub fn verify_repeatable_parallel<T, Run, Fingerprint>(
    threads: usize,
    run: Run,
    fingerprint: Fingerprint,
) -> RepeatabilityResult
where
    Run: Fn() -> T + Sync,
    Fingerprint: Fn(&T) -> u64 + Sync,
{
    let fingerprints = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| fingerprint(&run())))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("analysis thread panicked"))
            .collect()
    });
    RepeatabilityResult::from_fingerprints(fingerprints)
}

fn hash_point<H: Hasher>(point: &Point, hasher: &mut H) {
    point.id.hash(hasher);
    point.left.map(f64::to_bits).hash(hasher);
    point.top.map(f64::to_bits).hash(hasher);
}

/// Fingerprint an ordered list of points.
#[must_use]
pub fn fingerprint_points(points: &[Point]) -> u64 {
    let mut hasher = DefaultHasher::new();
    points.len().hash(&mut hasher);
    for point in points {
        hash_point(point, &mut hasher);
    }
    hasher.finish()
}

/// Fingerprint a full report.
#[must_use]
pub fn fingerprint_report(report: &TacticalReport) -> u64 {
    let mut hasher = DefaultHasher::new();
    report.detected_formation.hash(&mut hasher);
    report.phase.hash(&mut hasher);
    fingerprint_points(&report.red).hash(&mut hasher);
    fingerprint_points(&report.green_adjusted).hash(&mut hasher);
    hasher.finish()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Assert two synthesized teams agree except for vertical jitter.
///
/// `ids` and `left` must match exactly; `top` may differ by at most
/// `2 * amplitude` (each side drew its own offset). The first entry is the
/// goalkeeper, which carries no jitter and must match exactly.
///
/// # Panics
///
/// Panics on any mismatch.
pub fn assert_equal_modulo_jitter(a: &[Point], b: &[Point], amplitude: f64) {
    assert_eq!(a.len(), b.len(), "team sizes differ");
    for (i, (pa, pb)) in a.iter().zip(b).enumerate() {
        assert_eq!(pa.id, pb.id, "id mismatch at {i}");
        assert_eq!(pa.left, pb.left, "left mismatch at {i}");
        let (ta, tb) = (pa.top.unwrap_or(f64::NAN), pb.top.unwrap_or(f64::NAN));
        if i == 0 {
            assert_eq!(ta.to_bits(), tb.to_bits(), "goalkeeper moved: {ta} vs {tb}");
        } else {
            assert!(
                (ta - tb).abs() <= 2.0 * amplitude,
                "top drift at {i} exceeds jitter: {ta} vs {tb}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_core::prelude::*;

    use crate::fixtures;

    #[test]
    fn test_fingerprint_distinguishes_order() {
        let a = [Point::new(Some(1), 1.0, 2.0), Point::new(Some(2), 3.0, 4.0)];
        let b = [a[1], a[0]];
        assert_ne!(fingerprint_points(&a), fingerprint_points(&b));
        let same = a;
        assert_eq!(fingerprint_points(&a), fingerprint_points(&same));
    }

    #[test]
    fn test_pinned_analysis_is_repeatable() {
        let snapshot = fixtures::midfield_snapshot();
        verify_repeatable(
            5,
            || analyze(&snapshot, FormationLibrary::builtin(), &mut NoJitter),
            fingerprint_report,
        )
        .assert_repeatable();
    }

    #[test]
    fn test_parallel_classification_is_repeatable() {
        let snapshot = fixtures::midfield_snapshot();
        verify_repeatable_parallel(
            4,
            || {
                (
                    detect_formation(&snapshot.black),
                    classify_phase(snapshot.ball.as_ref(), &snapshot.green, &snapshot.black),
                )
            },
            compute_hash,
        )
        .assert_repeatable();
    }

    #[test]
    fn test_live_jitter_stays_within_bounds() {
        let snapshot = fixtures::midfield_snapshot();
        let lib = FormationLibrary::builtin();
        let a = analyze(&snapshot, lib, &mut RngJitter::thread_local());
        let b = analyze(&snapshot, lib, &mut RngJitter::thread_local());
        assert_eq!(a.detected_formation, b.detected_formation);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.green_adjusted, b.green_adjusted);
        assert_equal_modulo_jitter(&a.red, &b.red, pitch_core::synthesis::JITTER_AMPLITUDE);
    }

    #[test]
    #[should_panic(expected = "not repeatable")]
    fn test_assert_repeatable_reports_divergence() {
        let counter = std::sync::atomic::AtomicU64::new(0);
        verify_repeatable(
            3,
            || counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed),
            |n| *n,
        )
        .assert_repeatable();
    }
}
