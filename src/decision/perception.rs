//! Spin reading
//!
//! How well a receiver sees the spin on an incoming ball. Difficulty is the
//! product of the sender's deception attribute and the effort put into this
//! particular stroke, so a ball is only hard to read when both are high.

use crate::math::{EPSILON, Vec3, clamp01};
use crate::params::PerceptionParams;
use crate::rng::MatchRng;

/// Outcome of reading one incoming ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRead {
    pub difficulty: f64,
    pub accuracy: f64,
    pub perceived: Vec3,
    /// ‖perceived − actual‖ / ‖actual‖, clamped to [0, 1]
    pub misread: f64,
}

/// Read difficulty in [0, 1]
///
/// `sender_deception` is the sender's 0-100 attribute, `effort` the [0, 1]
/// deception effort of the stroke.
pub fn read_difficulty(sender_deception: f64, effort: f64, params: &PerceptionParams) -> f64 {
    clamp01(clamp01(sender_deception / 100.0) * clamp01(effort) * params.difficulty_scale)
}

/// Read accuracy in [min_accuracy, 1]
pub fn read_accuracy(spin_read: f64, difficulty: f64, params: &PerceptionParams) -> f64 {
    let raw = params.base_accuracy + clamp01(spin_read / 100.0) * params.attribute_scale
        - clamp01(difficulty) * params.difficulty_penalty;
    raw.clamp(params.min_accuracy.min(1.0), 1.0)
}

/// Normalised distance between perceived and actual spin
pub fn misread(actual: Vec3, perceived: Vec3) -> f64 {
    let magnitude = actual.length();
    if magnitude < EPSILON {
        return 0.0;
    }
    clamp01((perceived - actual).length() / magnitude)
}

/// Perceive the spin of an incoming ball
///
/// A spinning ball always consumes three Gaussians (x, y, z) so the stream
/// position does not depend on the read. A spinless ball draws nothing. An
/// undisguised ball (zero difficulty) is seen exactly.
pub fn read_spin(
    actual: Vec3,
    sender_deception: f64,
    effort: f64,
    receiver_spin_read: f64,
    params: &PerceptionParams,
    rng: &mut MatchRng,
) -> SpinRead {
    let difficulty = read_difficulty(sender_deception, effort, params);
    let accuracy = read_accuracy(receiver_spin_read, difficulty, params);

    let magnitude = actual.length();
    if magnitude < EPSILON {
        return SpinRead {
            difficulty,
            accuracy,
            perceived: actual,
            misread: 0.0,
        };
    }

    let stddev = if difficulty > 0.0 {
        params.noise_scale * (1.0 - accuracy) * magnitude
    } else {
        0.0
    };
    let noise = Vec3::new(
        rng.gaussian(0.0, stddev),
        rng.gaussian(0.0, stddev),
        rng.gaussian(0.0, stddev),
    );
    let perceived = actual + noise;

    SpinRead {
        difficulty,
        accuracy,
        perceived,
        misread: misread(actual, perceived),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_effort_is_perfect_read() {
        let params = PerceptionParams::default();
        let mut rng = MatchRng::new(1);
        let spin = Vec3::new(-70.0, 5.0, 30.0);

        let read = read_spin(spin, 100.0, 0.0, 10.0, &params, &mut rng);
        assert_eq!(read.difficulty, 0.0);
        assert_eq!(read.perceived, spin);
        assert_eq!(read.misread, 0.0);
        // Stream still advances by the same amount as a disguised read
        assert!(rng.draws() >= 4);
    }

    #[test]
    fn test_difficulty_is_multiplicative() {
        let params = PerceptionParams::default();
        assert_eq!(read_difficulty(0.0, 1.0, &params), 0.0);
        assert_eq!(read_difficulty(100.0, 0.0, &params), 0.0);
        assert!((read_difficulty(80.0, 0.5, &params) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_falls_with_difficulty() {
        let params = PerceptionParams::default();
        let easy = read_accuracy(60.0, 0.0, &params);
        let hard = read_accuracy(60.0, 1.0, &params);
        assert!(hard < easy);
        assert!(hard >= params.min_accuracy);
        let generous = PerceptionParams {
            base_accuracy: 0.8,
            ..params
        };
        assert_eq!(read_accuracy(100.0, 0.0, &generous), 1.0);
    }

    #[test]
    fn test_spinless_ball_draws_nothing() {
        let params = PerceptionParams::default();
        let mut rng = MatchRng::new(2);
        let read = read_spin(Vec3::ZERO, 100.0, 1.0, 0.0, &params, &mut rng);
        assert_eq!(read.perceived, Vec3::ZERO);
        assert_eq!(read.misread, 0.0);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_disguised_ball_is_misread() {
        let params = PerceptionParams::default();
        let mut rng = MatchRng::new(3);
        let spin = Vec3::new(-90.0, 0.0, 40.0);
        let read = read_spin(spin, 100.0, 1.0, 0.0, &params, &mut rng);
        assert!(read.difficulty > 0.9);
        assert_ne!(read.perceived, spin);
        assert!(read.misread > 0.0);
    }

    proptest! {
        #[test]
        fn prop_read_values_in_range(
            seed in any::<u64>(),
            deception in -20.0f64..150.0,
            effort in -0.5f64..1.5,
            spin_read in -20.0f64..150.0,
            sx in -150.0f64..150.0,
            sz in -150.0f64..150.0,
        ) {
            let params = PerceptionParams::default();
            let mut rng = MatchRng::new(seed);
            let spin = Vec3::new(sx, 0.0, sz);
            let read = read_spin(spin, deception, effort, spin_read, &params, &mut rng);
            prop_assert!((0.0..=1.0).contains(&read.difficulty));
            prop_assert!((params.min_accuracy..=1.0).contains(&read.accuracy));
            prop_assert!((0.0..=1.0).contains(&read.misread));
        }
    }
}
