//! Randomness used by counter-formation placement.
//!
//! Synthesized players get a small vertical wobble so repeated requests do
//! not stack markers on the exact same pixels. The draw goes through
//! [`JitterSource`] so tests can pin it.

use rand::Rng;

/// Source of bounded offsets.
pub trait JitterSource {
    /// Draw an offset in `[-amplitude, amplitude)`.
    fn sample(&mut self, amplitude: f64) -> f64;
}

/// Uniform jitter backed by any [`Rng`].
#[derive(Debug, Clone)]
pub struct RngJitter<R> {
    rng: R,
}

impl<R: Rng> RngJitter<R> {
    /// Wrap an RNG.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<rand::rngs::ThreadRng> {
    /// Jitter drawn from the thread-local RNG.
    #[must_use]
    pub fn thread_local() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> JitterSource for RngJitter<R> {
    fn sample(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.gen::<f64>() * 2.0 * amplitude - amplitude
    }
}

/// Always returns the same offset, clamped to the requested amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&mut self, amplitude: f64) -> f64 {
        self.0.max(-amplitude).min(amplitude)
    }
}

/// No jitter at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn sample(&mut self, _amplitude: f64) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rng_jitter_stays_in_range() {
        let mut jitter = RngJitter::new(StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            let v = jitter.sample(6.0);
            assert!((-6.0..6.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let mut a = RngJitter::new(StdRng::seed_from_u64(42));
        let mut b = RngJitter::new(StdRng::seed_from_u64(42));
        for _ in 0..16 {
            assert_eq!(a.sample(6.0), b.sample(6.0));
        }
    }

    #[test]
    fn test_fixed_jitter_is_clamped() {
        assert_eq!(FixedJitter(10.0).sample(6.0), 6.0);
        assert_eq!(FixedJitter(-2.0).sample(6.0), -2.0);
        assert_eq!(NoJitter.sample(6.0), 0.0);
    }
}
