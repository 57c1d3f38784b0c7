//! Ball physics
//!
//! Everything here is deterministic given the parameters and the shared
//! `MatchRng`:
//! - Fixed timestep only
//! - Seeded RNG only, consumed in a fixed order
//! - No I/O

pub mod bounce;
pub mod engine;
pub mod quality;
pub mod state;
pub mod trajectory;

pub use bounce::{BounceResult, bounce};
pub use engine::{BallPhysics, PhysicsEngine, PhysicsEngineKind, StrokeCeilings, spin_vector};
pub use quality::{
    ExecutionError, accuracy_multiplier, apply_execution_error, rally_quality, risk_level,
    serve_quality,
};
pub use state::{
    ArrivalState, BallFlight, FlightEvent, ReachableSides, ServeIntention, ShotIntention,
    TableSide, TrajectoryResult,
};
pub use trajectory::{acceleration, simulate_serve, simulate_trajectory};
