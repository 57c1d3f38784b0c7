//! Vector math
//!
//! Positions are cm, velocities cm/s, spin rev/s. glam's double-precision
//! vectors do the heavy lifting; this module adds the scalar helpers the
//! physics and decision code share.

pub use glam::{DVec2 as Vec2, DVec3 as Vec3};

/// Values below this are treated as zero in division guards
pub const EPSILON: f64 = 1e-9;

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Clamp to [-1, 1]
#[inline]
pub fn clamp_signed(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Sign as ±1.0; zero maps to +1.0
#[inline]
pub fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Horizontal (x, y) part of a 3D vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Lift a 2D point onto height `z`
#[inline]
pub fn with_height(p: Vec2, z: f64) -> Vec3 {
    Vec3::new(p.x, p.y, z)
}

/// Rotate a 2D vector by `angle` radians
#[inline]
pub fn rotate2(v: Vec2, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Move `from` toward `to` by at most `max_step`
pub fn step_toward(from: Vec2, to: Vec2, max_step: f64) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_step.max(0.0) || dist < EPSILON {
        to
    } else {
        from + delta * (max_step.max(0.0) / dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_clamps() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp_signed(-2.0), -1.0);
        assert_eq!(clamp_signed(0.25), 0.25);
    }

    #[test]
    fn test_lerp_and_sign() {
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 1.0);
    }

    #[test]
    fn test_rotate2_quarter_turn() {
        let r = rotate2(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert!(r.x.abs() < 1e-12);
        assert!((r.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_step_toward() {
        let from = Vec2::ZERO;
        let to = Vec2::new(3.0, 4.0);
        assert_eq!(step_toward(from, to, 10.0), to);

        let mid = step_toward(from, to, 2.5);
        assert!((mid.length() - 2.5).abs() < 1e-12);
        assert!((mid.x / mid.y - 0.75).abs() < 1e-12);

        assert_eq!(step_toward(to, to, 0.0), to);
    }

    #[test]
    fn test_cross_product_convention() {
        // Spin about -x on a ball travelling +y is topspin: Magnus pushes down
        let omega = Vec3::new(-1.0, 0.0, 0.0);
        let v = Vec3::new(0.0, 1.0, 0.0);
        assert!(omega.cross(v).z < 0.0);
    }
}
