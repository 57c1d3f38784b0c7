//! Table bounce response
//!
//! Restitution on the vertical axis, spin-friction coupling on the horizontal
//! axes. Friction opposes the sliding velocity of the contact point
//! (`v + ω × r` with `r = (0, 0, -R)`), so topspin kicks the ball forward and
//! backspin checks it.

use std::f64::consts::TAU;

use crate::math::Vec3;
use crate::params::SimulationParameters;

/// Velocity and spin leaving the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceResult {
    pub velocity: Vec3,
    pub spin: Vec3,
}

/// Apply the table bounce to an incoming velocity (cm/s) and spin (rev/s)
pub fn bounce(velocity: Vec3, spin: Vec3, params: &SimulationParameters) -> BounceResult {
    let e = params.bounce.restitution;
    let mu = params.bounce.friction;
    let r = params.ball.radius();

    // Surface speed of the ball at the contact point from spin alone (cm/s)
    let omega = spin * TAU;
    let out = Vec3::new(
        velocity.x + mu * r * omega.y,
        velocity.y - mu * r * omega.x,
        -velocity.z * e,
    );

    BounceResult {
        velocity: out,
        spin: spin * (1.0 - mu),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_spin_vertical_restitution() {
        let params = SimulationParameters::default();
        let incoming = Vec3::new(30.0, 800.0, -400.0);
        let out = bounce(incoming, Vec3::ZERO, &params);

        assert!((out.velocity.z - 400.0 * params.bounce.restitution).abs() < 1e-9);
        assert!((out.velocity.x - 30.0).abs() < 1e-9);
        assert!((out.velocity.y - 800.0).abs() < 1e-9);
        assert_eq!(out.spin, Vec3::ZERO);
    }

    #[test]
    fn test_topspin_kicks_forward() {
        let params = SimulationParameters::default();
        // Travelling +y, topspin is rotation about -x
        let incoming = Vec3::new(0.0, 600.0, -300.0);
        let top = bounce(incoming, Vec3::new(-50.0, 0.0, 0.0), &params);
        let back = bounce(incoming, Vec3::new(50.0, 0.0, 0.0), &params);

        assert!(top.velocity.y > 600.0);
        assert!(back.velocity.y < 600.0);
    }

    #[test]
    fn test_spin_attenuated_uniformly() {
        let params = SimulationParameters::default();
        let spin = Vec3::new(10.0, -20.0, 30.0);
        let out = bounce(Vec3::new(0.0, 100.0, -100.0), spin, &params);
        let keep = 1.0 - params.bounce.friction;

        assert!((out.spin - spin * keep).length() < 1e-12);
    }

    #[test]
    fn test_sidespin_about_vertical_has_no_horizontal_kick() {
        let params = SimulationParameters::default();
        let incoming = Vec3::new(0.0, 500.0, -200.0);
        let out = bounce(incoming, Vec3::new(0.0, 0.0, 80.0), &params);
        assert!((out.velocity.x).abs() < 1e-12);
        assert!((out.velocity.y - 500.0).abs() < 1e-12);
    }
}
