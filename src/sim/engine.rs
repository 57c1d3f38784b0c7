//! Physics engine facade
//!
//! Combines the bounce, quality/error and trajectory models into the four
//! operations the rally loop needs: read an incoming ball, play a rally
//! stroke, serve, and move back into position.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::math::{EPSILON, Vec2, Vec3, clamp01, clamp_signed, horizontal, sign, step_toward};
use crate::params::SimulationParameters;
use crate::player::{PaddleSide, Player};
use crate::rng::MatchRng;

use super::quality::{apply_execution_error, rally_quality, risk_level, serve_quality};
use super::state::{
    ArrivalState, BallFlight, ReachableSides, ServeIntention, ShotIntention, TableSide,
};
use super::trajectory::{simulate_serve, simulate_trajectory};

/// Physical operations a player's strokes go through
pub trait BallPhysics {
    /// Describe an incoming ball from the receiver's point of view
    fn analyze_arrival(
        &self,
        incoming: &BallFlight,
        receiver: &Player,
        receiver_position: Vec2,
    ) -> ArrivalState;

    /// Play a rally stroke from the arrival contact point
    fn execute_shot(
        &self,
        player: &Player,
        contact: &ArrivalState,
        intention: &ShotIntention,
        rng: &mut MatchRng,
    ) -> BallFlight;

    /// Serve from behind the end line of `server_side`
    fn execute_serve(
        &self,
        player: &Player,
        server_side: TableSide,
        intention: &ServeIntention,
        rng: &mut MatchRng,
    ) -> BallFlight;

    /// Move toward `target` as far as footwork allows in `time_available`
    fn compute_recovery(
        &self,
        current: Vec2,
        target: Vec2,
        player: &Player,
        time_available: f64,
    ) -> Vec2;
}

/// Physics implementations selectable per player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsEngineKind {
    #[default]
    Standard,
}

impl PhysicsEngineKind {
    pub fn build(self, params: Arc<SimulationParameters>) -> PhysicsEngine {
        match self {
            PhysicsEngineKind::Standard => PhysicsEngine::new(params),
        }
    }
}

/// Speed (cm/s) and spin (rev/s) ceilings after equipment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeCeilings {
    pub speed: f64,
    pub spin: f64,
}

/// Standard physics: closed-form aim, Gaussian execution error, integrated flight
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    params: Arc<SimulationParameters>,
}

impl PhysicsEngine {
    pub fn new(params: Arc<SimulationParameters>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Ceilings for one paddle side with blade, rubber and rubber-type modifiers
    pub fn effective_ceilings(&self, player: &Player, side: PaddleSide) -> StrokeCeilings {
        let cap = player.capability(side);
        let rubber = player.equipment.rubber(side);
        let modifier = self.params.equipment_modifier(rubber.kind);

        StrokeCeilings {
            speed: cap.power * player.equipment.blade.speed * rubber.speed * modifier.speed,
            spin: cap.spin * rubber.spin * modifier.spin,
        }
    }

    /// Ball speed for a power fraction; zero power still reaches the table
    fn shot_speed(&self, ceiling: f64, power: f64) -> f64 {
        let min = self.params.shot.min_speed_fraction;
        ceiling * (min + (1.0 - min) * clamp01(power))
    }

    /// Launch velocity that lands at `target` and clears the net by `clearance`
    ///
    /// The horizontal component gets a fixed share of `speed`; the vertical
    /// component is solved in closed form (no drag or lift). When the flight
    /// crosses the net the larger of the landing and clearance solutions wins.
    /// Flight time is bounded by `shot.min_flight_time` and
    /// `step.max_flight_time`, and the horizontal speed never exceeds its
    /// share of the budget, so a ball too slow to reach the target falls
    /// short. No budget at all drops the ball from the contact point.
    pub fn solve_launch_velocity(
        &self,
        start: Vec3,
        target: Vec2,
        clearance: f64,
        speed: f64,
    ) -> Vec3 {
        let g = self.params.air.gravity;
        let horizontal_speed = speed.max(0.0) * self.params.shot.horizontal_fraction;
        if horizontal_speed <= EPSILON {
            return Vec3::ZERO;
        }

        let min_time = self.params.shot.min_flight_time;
        let max_time = self.params.step.max_flight_time.max(min_time);
        let delta = target - horizontal(start);
        let distance = delta.length();
        let flight_time = (distance / horizontal_speed).clamp(min_time, max_time);
        let flat = if distance / flight_time > horizontal_speed {
            delta * (horizontal_speed / distance)
        } else {
            delta / flight_time
        };

        let mut vz = (0.5 * g * flight_time * flight_time - start.z) / flight_time;

        if start.y * target.y < 0.0 {
            let net_time = flight_time * start.y.abs() / (start.y.abs() + target.y.abs());
            if net_time > EPSILON {
                let height = self.params.table.net_height + clearance.max(0.0);
                let vz_net = (height - start.z + 0.5 * g * net_time * net_time) / net_time;
                vz = vz.max(vz_net);
            }
        }

        Vec3::new(flat.x, flat.y, vz)
    }

    fn serve_position(&self, server_side: TableSide) -> Vec3 {
        let serve = &self.params.serve;
        Vec3::new(
            0.0,
            server_side.sign() * (self.params.table.half_length() + serve.behind_end_line),
            serve.contact_height,
        )
    }
}

/// Spin vector for a stroke travelling along `direction`
///
/// Topspin turns about `ẑ × d̂`, sidespin about `ẑ`. The two direction
/// components are normalised so the result has length `magnitude`; there is
/// no gyrospin component along the direction of travel.
pub fn spin_vector(direction: Vec2, topspin: f64, sidespin: f64, magnitude: f64) -> Vec3 {
    let d = direction.try_normalize().unwrap_or(Vec2::Y);
    let top = clamp_signed(topspin);
    let side = clamp_signed(sidespin);
    let norm = (top * top + side * side).sqrt();
    if norm < EPSILON || magnitude <= 0.0 {
        return Vec3::ZERO;
    }

    let top_axis = Vec3::new(-d.y, d.x, 0.0);
    (top_axis * top + Vec3::Z * side) * (magnitude / norm)
}

impl BallPhysics for PhysicsEngine {
    fn analyze_arrival(
        &self,
        incoming: &BallFlight,
        receiver: &Player,
        receiver_position: Vec2,
    ) -> ArrivalState {
        let p = &self.params;
        let landing = incoming.landing_position();
        let landing_velocity = incoming.landing_velocity();

        // The receiver meets the ball where its post-bounce path passes
        // closest to them, before it comes back down to the table
        let rebound = horizontal(landing_velocity);
        let airborne = 2.0 * landing_velocity.z.max(0.0) / p.air.gravity.max(EPSILON);
        let latest = p.arrival.max_contact_delay.min(airborne);
        let rebound_speed_sq = rebound.length_squared();
        let delay = if rebound_speed_sq > EPSILON {
            let toward = (receiver_position - horizontal(landing)).dot(rebound);
            (toward / rebound_speed_sq).min(latest).max(0.0)
        } else {
            0.0
        };
        let meet = horizontal(landing) + rebound * delay;

        let contact_height = p.arrival.base_contact_height
            + p.arrival.contact_height_per_speed * landing_velocity.z.abs();
        let contact = Vec3::new(meet.x, meet.y, contact_height);

        let travelled = (meet - horizontal(incoming.start_position)).length();
        let speed = incoming.velocity.length();
        let time_available = if speed > EPSILON {
            travelled / speed
        } else {
            p.arrival.fallback_time
        };

        let distance = (horizontal(contact) - receiver_position).length();
        let reach = p.movement.speed_for(receiver.attributes.footwork) * time_available;
        let deficit = if reach > EPSILON {
            clamp01(distance / reach)
        } else if distance > EPSILON {
            1.0
        } else {
            0.0
        };

        let reachable = if deficit > p.arrival.stretch_threshold {
            // Facing the net: a right-hander on the negative half has the
            // forehand toward +x
            let facing = -sign(receiver_position.y);
            let rel_x = contact.x - receiver_position.x;
            if rel_x * facing * receiver.handedness.sign() >= 0.0 {
                ReachableSides::Only(PaddleSide::Forehand)
            } else {
                ReachableSides::Only(PaddleSide::Backhand)
            }
        } else {
            ReachableSides::Both
        };

        ArrivalState {
            contact_position: contact,
            velocity: landing_velocity,
            spin: incoming.landing_spin(),
            time_available,
            reachable,
            deficit,
        }
    }

    fn execute_shot(
        &self,
        player: &Player,
        contact: &ArrivalState,
        intention: &ShotIntention,
        rng: &mut MatchRng,
    ) -> BallFlight {
        let p = &self.params;
        let side = intention.side;
        let cap = player.capability(side);
        let ceilings = self.effective_ceilings(player, side);

        let power = clamp01(intention.power);
        let spin_intensity = clamp01(intention.spin_intensity);
        let speed = self.shot_speed(ceilings.speed, power);
        let spin_magnitude = ceilings.spin * spin_intensity;
        let risk = risk_level(power, spin_intensity);
        let quality = rally_quality(
            cap.consistency,
            contact.deficit,
            contact.time_available,
            risk,
            p,
        );

        let start = contact.contact_position;
        let velocity =
            self.solve_launch_velocity(start, intention.target, intention.net_clearance, speed);
        let spin = spin_vector(
            horizontal(velocity),
            intention.topspin,
            intention.sidespin,
            spin_magnitude,
        );

        let executed = apply_execution_error(velocity, spin, quality, cap.accuracy, p, rng);
        let trajectory = simulate_trajectory(start, executed.velocity, executed.spin, p, rng);

        log::debug!(
            "{} {:?} shot q={:.2} risk={:.2} -> {:?} at ({:.1}, {:.1})",
            player.name,
            side,
            quality,
            risk,
            trajectory.event,
            trajectory.landing_position.x,
            trajectory.landing_position.y
        );

        BallFlight {
            start_position: start,
            velocity: executed.velocity,
            spin: executed.spin,
            trajectory,
            quality,
        }
    }

    fn execute_serve(
        &self,
        player: &Player,
        server_side: TableSide,
        intention: &ServeIntention,
        rng: &mut MatchRng,
    ) -> BallFlight {
        let p = &self.params;
        let side = intention.side;
        let cap = player.capability(side);
        let ceilings = self.effective_ceilings(player, side);

        let power = clamp01(intention.power);
        let spin_intensity = clamp01(intention.spin_intensity);
        let speed = self.shot_speed(ceilings.speed * p.serve.speed_factor, power);
        let spin_magnitude = ceilings.spin * p.serve.spin_factor * spin_intensity;
        let risk = risk_level(power, spin_intensity);
        let quality = serve_quality(player.attributes.service, cap.consistency, risk, p);

        let start = self.serve_position(server_side);
        let velocity =
            self.solve_launch_velocity(start, intention.target, intention.net_clearance, speed);
        let spin = spin_vector(
            horizontal(velocity),
            intention.topspin,
            intention.sidespin,
            spin_magnitude,
        );

        let executed = apply_execution_error(velocity, spin, quality, cap.accuracy, p, rng);
        let trajectory =
            simulate_serve(start, executed.velocity, executed.spin, server_side, p, rng);

        log::debug!(
            "{} serves q={:.2} -> {:?}, first bounce {:?}",
            player.name,
            quality,
            trajectory.event,
            trajectory.first_bounce
        );

        BallFlight {
            start_position: start,
            velocity: executed.velocity,
            spin: executed.spin,
            trajectory,
            quality,
        }
    }

    fn compute_recovery(
        &self,
        current: Vec2,
        target: Vec2,
        player: &Player,
        time_available: f64,
    ) -> Vec2 {
        let max_step =
            self.params.movement.speed_for(player.attributes.footwork) * time_available.max(0.0);
        step_toward(current, target, max_step)
    }
}
