//! Deterministic random source
//!
//! One `MatchRng` is created per match and threaded by `&mut` through every
//! stochastic call, for both players and the physics. Reproducibility depends
//! on the call order staying fixed, so the type deliberately has no `Clone`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seeded uniform + Gaussian sampler
#[derive(Debug)]
pub struct MatchRng {
    seed: u64,
    rng: Pcg32,
    /// Second deviate of the last polar pair, returned by the next `gaussian`
    spare: Option<f64>,
    draws: u64,
}

impl MatchRng {
    /// Create a new stream from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            spare: None,
            draws: 0,
        }
    }

    /// Seed this stream was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of uniforms consumed so far (useful when diffing replays)
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform value in [0, 1)
    pub fn next(&mut self) -> f64 {
        self.draws += 1;
        self.rng.random::<f64>()
    }

    /// Uniform value in [lo, hi)
    pub fn uniform_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next()
    }

    /// Normally distributed value (Marsaglia polar method)
    ///
    /// Each accepted pair of uniforms yields two deviates; the second is cached
    /// and returned by the following call.
    pub fn gaussian(&mut self, mean: f64, stddev: f64) -> f64 {
        if let Some(z) = self.spare.take() {
            return mean + stddev * z;
        }

        loop {
            let u = 2.0 * self.next() - 1.0;
            let v = 2.0 * self.next() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                let factor = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(v * factor);
                return mean + stddev * u * factor;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = MatchRng::new(42);
        let mut b = MatchRng::new(42);

        for _ in 0..100 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
            assert_eq!(a.gaussian(1.0, 2.0).to_bits(), b.gaussian(1.0, 2.0).to_bits());
        }
        assert_eq!(a.draws(), b.draws());
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = MatchRng::new(1);
        let mut b = MatchRng::new(2);
        let same = (0..16).filter(|_| a.next() == b.next()).count();
        assert!(same < 16);
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = MatchRng::new(7);
        for _ in 0..1000 {
            let x = rng.next();
            assert!((0.0..1.0).contains(&x));
            let y = rng.uniform_range(-3.0, 5.0);
            assert!((-3.0..5.0).contains(&y));
        }
    }

    #[test]
    fn test_gaussian_caches_second_deviate() {
        let mut rng = MatchRng::new(9);
        let _ = rng.gaussian(0.0, 1.0);
        let after_first = rng.draws();
        assert!(after_first >= 2 && after_first % 2 == 0);

        // Second call is served from the cache
        let _ = rng.gaussian(0.0, 1.0);
        assert_eq!(rng.draws(), after_first);
    }

    #[test]
    fn test_gaussian_zero_stddev_still_consumes() {
        let mut rng = MatchRng::new(11);
        let x = rng.gaussian(3.5, 0.0);
        assert_eq!(x, 3.5);
        assert!(rng.draws() >= 2);
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = MatchRng::new(2024);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.gaussian(10.0, 2.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 10.0).abs() < 0.1, "mean {}", mean);
        assert!((var.sqrt() - 2.0).abs() < 0.1, "stddev {}", var.sqrt());
    }
}
