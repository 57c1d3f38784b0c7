//! Flight, arrival and intention records
//!
//! Everything that crosses the boundary between the physics, the decision
//! code and the external umpire lives here. All records are plain values.

use serde::{Deserialize, Serialize};

use crate::math::{Vec2, Vec3};
use crate::player::PaddleSide;

/// One half of the table, named by the sign of its y coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableSide {
    Negative,
    Positive,
}

impl TableSide {
    /// Side containing `y` (the net line counts as positive)
    pub fn of(y: f64) -> Self {
        if y < 0.0 {
            TableSide::Negative
        } else {
            TableSide::Positive
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            TableSide::Negative => -1.0,
            TableSide::Positive => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            TableSide::Negative => TableSide::Positive,
            TableSide::Positive => TableSide::Negative,
        }
    }

    pub fn contains(self, y: f64) -> bool {
        y * self.sign() > 0.0
    }
}

/// How a flight segment ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightEvent {
    /// Bounced on the table; the rally continues from the bounce state
    Landed,
    /// Reached the net line at or below table level
    NetFault,
    /// Struck the net too low to clip over
    IntoNet,
    /// Reached table height outside the playing surface
    OffTable,
    /// Step budget exhausted without an event
    Timeout,
}

/// Physical outcome of one flight segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    pub start_position: Vec3,
    /// Highest z reached (cm)
    pub apex: f64,
    pub landing_position: Vec3,
    /// Post-bounce velocity on a table landing, last velocity otherwise
    pub landing_velocity: Vec3,
    pub landing_spin: Vec3,
    pub net_contact: bool,
    pub edge_contact: bool,
    pub crossed_net: bool,
    pub on_table: bool,
    /// Seconds
    pub flight_time: f64,
    pub event: FlightEvent,
    /// First table contact within this segment
    pub first_bounce: Option<Vec3>,
}

impl TrajectoryResult {
    /// Whether the segment ended with a bounce on `side`
    pub fn landed_on(&self, side: TableSide) -> bool {
        self.on_table && side.contains(self.landing_position.y)
    }

    /// Whether the segment ended in the net
    pub fn in_net(&self) -> bool {
        matches!(self.event, FlightEvent::NetFault | FlightEvent::IntoNet)
    }
}

/// A struck ball: what was actually launched plus where it went
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallFlight {
    pub start_position: Vec3,
    /// Launch velocity after execution error
    pub velocity: Vec3,
    /// Launch spin after execution error (rev/s)
    pub spin: Vec3,
    pub trajectory: TrajectoryResult,
    /// Execution quality achieved [0, 1]
    pub quality: f64,
}

impl BallFlight {
    pub fn landing_position(&self) -> Vec3 {
        self.trajectory.landing_position
    }

    pub fn landing_velocity(&self) -> Vec3 {
        self.trajectory.landing_velocity
    }

    pub fn landing_spin(&self) -> Vec3 {
        self.trajectory.landing_spin
    }
}

/// Paddle sides the receiver can get to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReachableSides {
    Both,
    Only(PaddleSide),
}

impl ReachableSides {
    pub fn contains(self, side: PaddleSide) -> bool {
        match self {
            ReachableSides::Both => true,
            ReachableSides::Only(s) => s == side,
        }
    }
}

/// The incoming ball as the receiver sees it, before perception noise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrivalState {
    pub contact_position: Vec3,
    pub velocity: Vec3,
    /// rev/s
    pub spin: Vec3,
    /// Seconds
    pub time_available: f64,
    pub reachable: ReachableSides,
    /// 0 = ideal, 1 = maximal stretch
    pub deficit: f64,
}

/// What a player wants to do with a rally ball
///
/// Fractions are relative to the player's own ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotIntention {
    pub side: PaddleSide,
    /// [0, 1]
    pub power: f64,
    /// [0, 1]
    pub spin_intensity: f64,
    /// [-1, 1], positive = topspin
    pub topspin: f64,
    /// [-1, 1]
    pub sidespin: f64,
    pub target: Vec2,
    /// cm above the net tape
    pub net_clearance: f64,
    /// [0, 1]
    pub deception: f64,
    pub recovery_target: Vec2,
}

/// What a server wants to do
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServeIntention {
    pub side: PaddleSide,
    pub power: f64,
    pub spin_intensity: f64,
    pub topspin: f64,
    pub sidespin: f64,
    pub target: Vec2,
    pub net_clearance: f64,
    pub deception: f64,
}
