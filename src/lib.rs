//! Rally Sim - table tennis rally simulation core
//!
//! Core modules:
//! - `sim`: Ball flight, bounce, execution error and the physics facade
//! - `decision`: Tendency-driven shot selection, spin reading, fatigue
//! - `params`: Every tunable constant, with sparse overrides
//! - `player`: Player capability data
//! - `rng`: The seeded random stream shared by a whole match
//!
//! Scoring, serve rotation and tournament bookkeeping live outside this
//! crate; it only resolves the physical course of a rally.

pub mod decision;
pub mod math;
pub mod params;
pub mod player;
pub mod rng;
pub mod sim;

pub use decision::{
    AnyDecisionEngine, DecisionEngine, DecisionEngineKind, DecisionState, EngineRegistry,
    PointSummary, RallyShot, ScoreState, ServeContext, ShotContext, TendencyDecisionEngine,
};
pub use math::{Vec2, Vec3};
pub use params::{ConfigError, ParameterOverrides, SimulationParameters};
pub use player::{EngineSelection, PaddleSide, Player};
pub use rng::MatchRng;
pub use sim::{
    ArrivalState, BallFlight, BallPhysics, FlightEvent, PhysicsEngine, PhysicsEngineKind,
    ServeIntention, ShotIntention, TableSide, TrajectoryResult,
};
