//! Ball flight integration
//!
//! Fixed-timestep semi-implicit Euler under gravity, drag and Magnus lift.
//! A flight segment runs until the first event: a net fault, a table bounce,
//! a landing off the table, or the step cap.
//!
//! Events are located by linear interpolation between the last two steps, so
//! the reported crossing height and landing point do not depend on where the
//! step boundary happened to fall.

use std::f64::consts::TAU;

use crate::math::{EPSILON, Vec3, sign};
use crate::params::SimulationParameters;
use crate::rng::MatchRng;

use super::bounce::bounce;
use super::state::{FlightEvent, TableSide, TrajectoryResult};

/// Per-flight force constants, resolved once from the parameters
#[derive(Debug, Clone, Copy)]
struct AirModel {
    gravity: f64,
    /// k / m (1/cm)
    drag: f64,
    /// c / m (dimensionless, ω in rad/s)
    magnus: f64,
}

impl AirModel {
    fn new(params: &SimulationParameters) -> Self {
        let m = params.ball.mass;
        Self {
            gravity: params.air.gravity,
            drag: if params.air.drag_enabled {
                params.drag_constant() / m
            } else {
                0.0
            },
            magnus: if params.air.magnus_enabled {
                params.magnus_constant() / m
            } else {
                0.0
            },
        }
    }

    /// gravity + drag + Magnus (cm/s²); spin in rev/s
    fn acceleration(&self, velocity: Vec3, spin: Vec3) -> Vec3 {
        let gravity = Vec3::new(0.0, 0.0, -self.gravity);
        let drag = velocity * (-self.drag * velocity.length());
        let magnus = (spin * TAU).cross(velocity) * self.magnus;
        gravity + drag + magnus
    }
}

/// Acceleration acting on a ball with the given velocity and spin
pub fn acceleration(velocity: Vec3, spin: Vec3, params: &SimulationParameters) -> Vec3 {
    AirModel::new(params).acceleration(velocity, spin)
}

/// Running state of one segment
struct Flight {
    start: Vec3,
    apex: f64,
    net_contact: bool,
    crossed_net: bool,
}

impl Flight {
    fn finish(
        &self,
        event: FlightEvent,
        position: Vec3,
        velocity: Vec3,
        spin: Vec3,
        flight_time: f64,
        edge_contact: bool,
    ) -> TrajectoryResult {
        let on_table = event == FlightEvent::Landed;
        TrajectoryResult {
            start_position: self.start,
            apex: self.apex,
            landing_position: position,
            landing_velocity: velocity,
            landing_spin: spin,
            net_contact: self.net_contact,
            edge_contact,
            crossed_net: self.crossed_net,
            on_table,
            flight_time,
            event,
            first_bounce: on_table.then_some(position),
        }
    }
}

/// Fly a ball from `start` until its next event
///
/// `rng` is only consumed when the ball lands in the edge band.
pub fn simulate_trajectory(
    start: Vec3,
    velocity: Vec3,
    spin: Vec3,
    params: &SimulationParameters,
    rng: &mut MatchRng,
) -> TrajectoryResult {
    let air = AirModel::new(params);
    let table = &params.table;
    let dt = params.step.dt;

    // Side the ball leaves from; a start on the net line counts as the side
    // the ball is moving away from
    let start_side = if start.y.abs() > EPSILON {
        sign(start.y)
    } else {
        -sign(velocity.y)
    };

    let mut flight = Flight {
        start,
        apex: start.z,
        net_contact: false,
        crossed_net: false,
    };
    let mut pos = start;
    let mut vel = velocity;
    let mut t = 0.0;

    for _ in 0..params.step.max_steps() {
        let prev = pos;
        vel += air.acceleration(vel, spin) * dt;
        pos += vel * dt;
        t += dt;
        flight.apex = flight.apex.max(pos.z);

        // Net line
        if !flight.crossed_net && prev.y * start_side >= 0.0 && pos.y * start_side < 0.0 {
            let frac = prev.y / (prev.y - pos.y);
            let height = prev.z + frac * (pos.z - prev.z);
            let crossing = Vec3::new(prev.x + frac * (pos.x - prev.x), 0.0, height);
            let crossing_time = t - dt + frac * dt;

            if crossing.x.abs() > table.half_width() + params.net.post_overhang {
                // Around the post
                flight.crossed_net = true;
                log::trace!("passed outside the net at x={:.1}", crossing.x);
            } else if height <= 0.0 {
                flight.net_contact = true;
                log::debug!("net fault: crossed net line at h={:.2}", height);
                return flight.finish(
                    FlightEvent::NetFault,
                    crossing,
                    vel,
                    spin,
                    crossing_time,
                    false,
                );
            } else if height < table.net_height {
                flight.net_contact = true;
                if height >= table.net_height - params.net.clip_margin {
                    vel *= params.net.clip_retention;
                    flight.crossed_net = true;
                    log::trace!("net clip at h={:.2}, vel now {:?}", height, vel);
                } else {
                    log::debug!("into net at h={:.2}", height);
                    return flight.finish(
                        FlightEvent::IntoNet,
                        crossing,
                        vel,
                        spin,
                        crossing_time,
                        false,
                    );
                }
            } else {
                flight.crossed_net = true;
            }
        }

        // Table plane
        if prev.z >= 0.0 && pos.z < 0.0 {
            let frac = prev.z / (prev.z - pos.z);
            let x = prev.x + frac * (pos.x - prev.x);
            let y = prev.y + frac * (pos.y - prev.y);
            let landing = Vec3::new(x, y, 0.0);
            let landing_time = t - dt + frac * dt;

            if !table.contains(x, y) {
                log::debug!("off table at ({:.1}, {:.1})", x, y);
                return flight.finish(
                    FlightEvent::OffTable,
                    landing,
                    vel,
                    spin,
                    landing_time,
                    false,
                );
            }

            let edge_contact = table.half_width() - x.abs() <= params.edge.margin
                || table.half_length() - y.abs() <= params.edge.margin;

            let mut out = bounce(vel, spin, params);
            if edge_contact {
                let sd = params.edge.deflection_stddev;
                out.velocity.x += rng.gaussian(0.0, sd);
                out.velocity.y += rng.gaussian(0.0, sd);
                out.velocity.z *= rng.uniform_range(params.edge.vertical_retention_min, 1.0);
                log::trace!("edge ball at ({:.1}, {:.1})", x, y);
            }

            return flight.finish(
                FlightEvent::Landed,
                landing,
                out.velocity,
                out.spin,
                landing_time,
                edge_contact,
            );
        }
    }

    log::warn!(
        "flight exceeded {:.2}s step budget without an event; check step parameters",
        params.step.max_flight_time
    );
    flight.finish(FlightEvent::Timeout, pos, vel, spin, t, false)
}

/// Fly a serve: contact to first bounce, then on from the bounce
///
/// A first bounce that misses the table or stays on the server's half is a
/// fault and is returned as-is for the umpire.
pub fn simulate_serve(
    start: Vec3,
    velocity: Vec3,
    spin: Vec3,
    server_side: TableSide,
    params: &SimulationParameters,
    rng: &mut MatchRng,
) -> TrajectoryResult {
    let first = simulate_trajectory(start, velocity, spin, params, rng);
    if !first.landed_on(server_side.opposite()) {
        log::debug!("serve fault: {:?} at y={:.1}", first.event, first.landing_position.y);
        return first;
    }

    let second = simulate_trajectory(
        first.landing_position,
        first.landing_velocity,
        first.landing_spin,
        params,
        rng,
    );

    TrajectoryResult {
        start_position: first.start_position,
        apex: first.apex.max(second.apex),
        landing_position: second.landing_position,
        landing_velocity: second.landing_velocity,
        landing_spin: second.landing_spin,
        net_contact: first.net_contact || second.net_contact,
        edge_contact: first.edge_contact || second.edge_contact,
        crossed_net: first.crossed_net || second.crossed_net,
        on_table: second.on_table,
        flight_time: first.flight_time + second.flight_time,
        event: second.event,
        first_bounce: first.first_bounce,
    }
}
