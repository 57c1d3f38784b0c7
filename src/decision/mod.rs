//! Player decisions
//!
//! A decision engine turns match context into a serve or shot intention.
//! Engines are stateless; the per-player mutable state (fatigue, last spin
//! read) is a `DecisionState` value owned by the caller and passed in on
//! every call, so a match can be inspected or replayed at any point.

pub mod fatigue;
pub mod perception;
pub mod targeting;
pub mod tendency;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::math::{Vec2, Vec3};
use crate::params::SimulationParameters;
use crate::player::{PaddleSide, Player};
use crate::rng::MatchRng;
use crate::sim::{ArrivalState, BallFlight, PhysicsEngine, ServeIntention, ShotIntention, TableSide};

pub use perception::{SpinRead, read_spin};
pub use tendency::TendencyDecisionEngine;

/// Per-player state carried across decisions for a whole match
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DecisionState {
    /// [0, 1]
    pub fatigue: f64,
    /// Misread of the last incoming ball, [0, 1]
    pub last_misread: f64,
    /// Spin the player believed the last incoming ball carried (rev/s)
    pub last_perceived_spin: Vec3,
}

/// Score situation as the umpire reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub own_points: u32,
    pub opponent_points: u32,
    pub own_games: u32,
    pub opponent_games: u32,
    pub deuce: bool,
    /// Either player is one point from the game
    pub game_point: bool,
    /// Either player is one point from the match
    pub match_point: bool,
}

impl ScoreState {
    pub fn is_pressure(&self) -> bool {
        self.deuce || self.game_point || self.match_point
    }
}

/// The stroke that produced the incoming ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RallyShot {
    pub side: PaddleSide,
    /// Deception effort the sender put into it
    pub deception: f64,
    pub flight: BallFlight,
}

/// Outcome of a finished point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSummary {
    pub won: bool,
    pub rally_length: u32,
}

pub struct ServeContext<'a> {
    pub player: &'a Player,
    pub opponent: &'a Player,
    pub server_side: TableSide,
    pub opponent_position: Vec2,
    pub score: &'a ScoreState,
    /// Most recent first; accepted for engines that want form
    pub recent_points: &'a [PointSummary],
}

pub struct ShotContext<'a> {
    pub player: &'a Player,
    pub opponent: &'a Player,
    /// Half the player is defending
    pub side: TableSide,
    pub arrival: &'a ArrivalState,
    pub opponent_position: Vec2,
    pub score: &'a ScoreState,
    pub last_shot: Option<&'a RallyShot>,
    pub recent_points: &'a [PointSummary],
}

/// Decision capability the rally loop drives
pub trait DecisionEngine {
    fn decide_serve(
        &self,
        state: &mut DecisionState,
        ctx: &ServeContext<'_>,
        rng: &mut MatchRng,
    ) -> ServeIntention;

    fn decide_shot(
        &self,
        state: &mut DecisionState,
        ctx: &ShotContext<'_>,
        rng: &mut MatchRng,
    ) -> ShotIntention;

    fn on_point_end(&self, _state: &mut DecisionState) {}

    fn on_game_end(&self, state: &mut DecisionState);

    fn on_timeout(&self, state: &mut DecisionState);
}

/// Decision implementations selectable per player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionEngineKind {
    #[default]
    Tendency,
}

/// A resolved decision engine (static dispatch)
#[derive(Debug, Clone)]
pub enum AnyDecisionEngine {
    Tendency(TendencyDecisionEngine),
}

impl DecisionEngine for AnyDecisionEngine {
    fn decide_serve(
        &self,
        state: &mut DecisionState,
        ctx: &ServeContext<'_>,
        rng: &mut MatchRng,
    ) -> ServeIntention {
        match self {
            AnyDecisionEngine::Tendency(e) => e.decide_serve(state, ctx, rng),
        }
    }

    fn decide_shot(
        &self,
        state: &mut DecisionState,
        ctx: &ShotContext<'_>,
        rng: &mut MatchRng,
    ) -> ShotIntention {
        match self {
            AnyDecisionEngine::Tendency(e) => e.decide_shot(state, ctx, rng),
        }
    }

    fn on_point_end(&self, state: &mut DecisionState) {
        match self {
            AnyDecisionEngine::Tendency(e) => e.on_point_end(state),
        }
    }

    fn on_game_end(&self, state: &mut DecisionState) {
        match self {
            AnyDecisionEngine::Tendency(e) => e.on_game_end(state),
        }
    }

    fn on_timeout(&self, state: &mut DecisionState) {
        match self {
            AnyDecisionEngine::Tendency(e) => e.on_timeout(state),
        }
    }
}

/// Resolves a player's engine selection once per match
#[derive(Debug, Clone)]
pub struct EngineRegistry {
    params: Arc<SimulationParameters>,
}

impl EngineRegistry {
    pub fn new(params: Arc<SimulationParameters>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Arc<SimulationParameters> {
        &self.params
    }

    pub fn decision_engine(&self, player: &Player) -> AnyDecisionEngine {
        match player.engines.decision {
            DecisionEngineKind::Tendency => {
                AnyDecisionEngine::Tendency(TendencyDecisionEngine::new(Arc::clone(&self.params)))
            }
        }
    }

    pub fn physics_engine(&self, player: &Player) -> PhysicsEngine {
        player.engines.physics.build(Arc::clone(&self.params))
    }
}
