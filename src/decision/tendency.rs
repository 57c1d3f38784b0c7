//! Tendency-driven decision engine
//!
//! Turns 0-100 tendencies into per-shot fractions with Gaussian noise, shaped
//! by an effective risk level that reacts to score pressure and to how badly
//! the player is out of position.

use std::sync::Arc;

use crate::math::{EPSILON, Vec2, Vec3, clamp01, clamp_signed, lerp};
use crate::params::{
    ClearanceParams, PressureParams, RecoveryParams, SafetyParams, SimulationParameters,
};
use crate::player::PaddleSide;
use crate::rng::MatchRng;
use crate::sim::{ReachableSides, ServeIntention, ShotIntention, TableSide};

use super::fatigue::{decision_drain, drained, recovered};
use super::perception::read_spin;
use super::targeting::{rally_target, select_side, serve_target, side_score};
use super::{DecisionEngine, DecisionState, ScoreState, ServeContext, ShotContext};

/// Map a 0-100 tendency to [0, 1] with one Gaussian of noise
pub fn map_tendency(tendency: f64, noise_stddev: f64, rng: &mut MatchRng) -> f64 {
    clamp01(tendency / 100.0 + rng.gaussian(0.0, noise_stddev))
}

/// As `map_tendency`, with the base pushed away from 0.5 by effective risk
pub fn map_risk_tendency(
    tendency: f64,
    risk: f64,
    amplification: f64,
    noise_stddev: f64,
    rng: &mut MatchRng,
) -> f64 {
    let base = clamp01(tendency / 100.0);
    let pushed = base + (base - 0.5) * clamp01(risk) * amplification;
    clamp01(pushed + rng.gaussian(0.0, noise_stddev))
}

/// Map a 0-100 tendency to a signed direction in [-1, 1] (50 = neutral)
pub fn map_direction(tendency: f64, noise_stddev: f64, rng: &mut MatchRng) -> f64 {
    clamp_signed(map_tendency(tendency, noise_stddev, rng) * 2.0 - 1.0)
}

/// Risk after score pressure
///
/// Off pressure points risk is unchanged. On them it shifts by up to
/// `max_adjustment`: down for mentally strong players, up for weak ones.
pub fn pressure_adjusted(
    risk: f64,
    mental: f64,
    score: &ScoreState,
    params: &PressureParams,
) -> f64 {
    if !score.is_pressure() {
        return clamp01(risk);
    }
    let composure = clamp_signed((mental - params.neutral_mental) / params.mental_span);
    clamp01(risk - params.max_adjustment * composure)
}

/// Risk after the positional-safety override
pub fn safety_adjusted(risk: f64, deficit: f64, params: &SafetyParams) -> f64 {
    let risk = clamp01(risk);
    let span = 1.0 - params.deficit_threshold;
    if deficit <= params.deficit_threshold || span < EPSILON {
        return risk;
    }
    let excess = clamp01((deficit - params.deficit_threshold) / span);
    clamp01(risk * (1.0 - params.max_reduction * excess))
}

fn clearance(value: f64, min: f64, max: f64) -> f64 {
    lerp(min, max.max(min), clamp01(value))
}

/// Ready position on `own_side` after a stroke made at `contact_x`
pub fn recovery_target(
    contact_x: f64,
    own_side: TableSide,
    half_length: f64,
    params: &RecoveryParams,
) -> Vec2 {
    Vec2::new(
        contact_x * (1.0 - clamp01(params.centering)),
        own_side.sign() * (half_length + params.depth),
    )
}

/// The default decision engine
#[derive(Debug, Clone)]
pub struct TendencyDecisionEngine {
    params: Arc<SimulationParameters>,
}

impl TendencyDecisionEngine {
    pub fn new(params: Arc<SimulationParameters>) -> Self {
        Self { params }
    }

    fn clearance_params(&self) -> &ClearanceParams {
        &self.params.decision.clearance
    }
}

impl DecisionEngine for TendencyDecisionEngine {
    fn decide_serve(
        &self,
        state: &mut DecisionState,
        ctx: &ServeContext<'_>,
        rng: &mut MatchRng,
    ) -> ServeIntention {
        let p = &self.params;
        let d = &p.decision;
        let noise = d.tendency.noise_stddev;
        let amp = d.tendency.risk_amplification;
        let tendencies = &ctx.player.serve;

        // Nothing incoming to read on a serve
        state.last_misread = 0.0;
        state.last_perceived_spin = Vec3::ZERO;

        let risk = pressure_adjusted(
            tendencies.aggression / 100.0,
            ctx.player.attributes.mental,
            ctx.score,
            &d.pressure,
        );

        let forehand_pref = clamp01(tendencies.forehand / 100.0);
        let side = select_side(
            ReachableSides::Both,
            forehand_pref,
            1.0 - forehand_pref,
            &d.side_selection,
            rng,
        );

        let power = map_risk_tendency(tendencies.power, risk, amp, noise, rng);
        let spin_intensity = map_risk_tendency(tendencies.spin, risk, amp, noise, rng);
        let topspin = map_direction(tendencies.topspin, noise, rng);
        let sidespin = map_direction(tendencies.sidespin, noise, rng);
        let target = serve_target(ctx.player, ctx.server_side, p, rng);
        let c = self.clearance_params();
        let net_clearance = clearance(
            map_tendency(tendencies.net_clearance, noise, rng),
            c.serve_min,
            c.serve_max,
        );
        let deception = map_tendency(tendencies.deception, noise, rng);

        log::debug!(
            "{} serve: {:?} power={:.2} spin={:.2} target=({:.1}, {:.1}) risk={:.2}",
            ctx.player.name,
            side,
            power,
            spin_intensity,
            target.x,
            target.y,
            risk
        );

        ServeIntention {
            side,
            power,
            spin_intensity,
            topspin,
            sidespin,
            target,
            net_clearance,
            deception,
        }
    }

    fn decide_shot(
        &self,
        state: &mut DecisionState,
        ctx: &ShotContext<'_>,
        rng: &mut MatchRng,
    ) -> ShotIntention {
        let p = &self.params;
        let d = &p.decision;
        let noise = d.tendency.noise_stddev;
        let amp = d.tendency.risk_amplification;
        let player = ctx.player;
        let tendencies = &player.stroke;
        let arrival = ctx.arrival;

        state.fatigue = drained(
            state.fatigue,
            decision_drain(arrival.deficit, player.attributes.stamina, &d.fatigue),
        );

        let effort = ctx.last_shot.map_or(0.0, |shot| shot.deception);
        let read = read_spin(
            arrival.spin,
            ctx.opponent.attributes.deception,
            effort,
            player.attributes.spin_read,
            &d.perception,
            rng,
        );
        state.last_misread = read.misread;
        state.last_perceived_spin = read.perceived;

        let risk = pressure_adjusted(
            tendencies.aggression / 100.0,
            player.attributes.mental,
            ctx.score,
            &d.pressure,
        );
        let risk = safety_adjusted(risk, arrival.deficit, &d.safety);

        let side = select_side(
            arrival.reachable,
            side_score(player, PaddleSide::Forehand, &d.side_selection),
            side_score(player, PaddleSide::Backhand, &d.side_selection),
            &d.side_selection,
            rng,
        );

        let power = map_risk_tendency(tendencies.power, risk, amp, noise, rng);
        let spin_intensity = map_risk_tendency(tendencies.spin, risk, amp, noise, rng);
        let topspin = map_direction(tendencies.topspin, noise, rng);
        let sidespin = map_direction(tendencies.sidespin, noise, rng);
        let target = rally_target(player, ctx.side, ctx.opponent_position.x, risk, p, rng);
        let c = self.clearance_params();
        let net_clearance = clearance(
            map_tendency(tendencies.net_clearance, noise, rng),
            c.min,
            c.max,
        );
        let deception = map_tendency(tendencies.deception, noise, rng);

        let recovery_target = recovery_target(
            arrival.contact_position.x,
            ctx.side,
            p.table.half_length(),
            &d.recovery,
        );

        log::debug!(
            "{} shot: {:?} power={:.2} spin={:.2} risk={:.2} misread={:.2} fatigue={:.3}",
            player.name,
            side,
            power,
            spin_intensity,
            risk,
            read.misread,
            state.fatigue
        );

        ShotIntention {
            side,
            power,
            spin_intensity,
            topspin,
            sidespin,
            target,
            net_clearance,
            deception,
            recovery_target,
        }
    }

    fn on_game_end(&self, state: &mut DecisionState) {
        state.fatigue = recovered(state.fatigue, self.params.decision.fatigue.game_recovery);
    }

    fn on_timeout(&self, state: &mut DecisionState) {
        state.fatigue = recovered(state.fatigue, self.params.decision.fatigue.timeout_recovery);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{PointSummary, RallyShot};
    use crate::player::Player;
    use crate::sim::{ArrivalState, BallFlight, FlightEvent, TrajectoryResult};
    use proptest::prelude::*;

    fn engine() -> TendencyDecisionEngine {
        TendencyDecisionEngine::new(Arc::new(SimulationParameters::default()))
    }

    fn arrival(spin: Vec3, reachable: ReachableSides, deficit: f64) -> ArrivalState {
        ArrivalState {
            contact_position: Vec3::new(-20.0, 110.0, 30.0),
            velocity: Vec3::new(0.0, 650.0, 180.0),
            spin,
            time_available: 0.45,
            reachable,
            deficit,
        }
    }

    fn previous_shot(deception: f64) -> RallyShot {
        let trajectory = TrajectoryResult {
            start_position: Vec3::new(0.0, -150.0, 25.0),
            apex: 30.0,
            landing_position: Vec3::new(-20.0, 90.0, 0.0),
            landing_velocity: Vec3::new(0.0, 650.0, 180.0),
            landing_spin: Vec3::new(-50.0, 0.0, 0.0),
            net_contact: false,
            edge_contact: false,
            crossed_net: true,
            on_table: true,
            flight_time: 0.3,
            event: FlightEvent::Landed,
            first_bounce: Some(Vec3::new(-20.0, 90.0, 0.0)),
        };
        RallyShot {
            side: PaddleSide::Forehand,
            deception,
            flight: BallFlight {
                start_position: trajectory.start_position,
                velocity: Vec3::new(0.0, 900.0, 70.0),
                spin: Vec3::new(-60.0, 0.0, 0.0),
                trajectory,
                quality: 0.7,
            },
        }
    }

    #[test]
    fn test_risk_mapping_pushes_away_from_middle() {
        let mut rng = MatchRng::new(1);
        assert!(map_risk_tendency(80.0, 1.0, 0.5, 0.0, &mut rng) > 0.8);
        assert!(map_risk_tendency(20.0, 1.0, 0.5, 0.0, &mut rng) < 0.2);
        assert_eq!(map_risk_tendency(50.0, 1.0, 0.5, 0.0, &mut rng), 0.5);
        assert_eq!(map_risk_tendency(80.0, 0.0, 0.5, 0.0, &mut rng), 0.8);
    }

    #[test]
    fn test_pressure_depends_on_mental() {
        let params = PressureParams::default();
        let calm = ScoreState::default();
        let tense = ScoreState {
            game_point: true,
            ..ScoreState::default()
        };

        assert_eq!(pressure_adjusted(0.5, 90.0, &calm, &params), 0.5);
        assert!(pressure_adjusted(0.5, 90.0, &tense, &params) < 0.5);
        assert!(pressure_adjusted(0.5, 10.0, &tense, &params) > 0.5);
        assert_eq!(pressure_adjusted(0.5, params.neutral_mental, &tense, &params), 0.5);

        let full = pressure_adjusted(0.5, 100.0, &tense, &params);
        assert!((full - (0.5 - params.max_adjustment)).abs() < 1e-12);
    }

    #[test]
    fn test_safety_override() {
        let params = SafetyParams::default();
        assert_eq!(safety_adjusted(0.8, params.deficit_threshold, &params), 0.8);
        let worst = safety_adjusted(0.8, 1.0, &params);
        assert!((worst - 0.8 * (1.0 - params.max_reduction)).abs() < 1e-12);
        let mid = safety_adjusted(0.8, 0.75, &params);
        assert!(mid < 0.8 && mid > worst);
    }

    #[test]
    fn test_recovery_target_on_own_half() {
        let params = RecoveryParams::default();
        let r = recovery_target(50.0, TableSide::Positive, 137.0, &params);
        assert!((r.x - 50.0 * (1.0 - params.centering)).abs() < 1e-12);
        assert!((r.y - (137.0 + params.depth)).abs() < 1e-12);
        let r = recovery_target(50.0, TableSide::Negative, 137.0, &params);
        assert!(r.y < -137.0);
    }

    #[test]
    fn test_shot_drains_fatigue_and_records_read() {
        let engine = engine();
        let me = Player::new("Me");
        let them = Player::new("Them");
        let arrival = arrival(Vec3::new(-50.0, 0.0, 10.0), ReachableSides::Both, 0.3);
        let last = previous_shot(0.8);
        let score = ScoreState::default();
        let ctx = ShotContext {
            player: &me,
            opponent: &them,
            side: TableSide::Positive,
            arrival: &arrival,
            opponent_position: Vec2::new(10.0, -200.0),
            score: &score,
            last_shot: Some(&last),
            recent_points: &[],
        };

        let mut state = DecisionState::default();
        let mut rng = MatchRng::new(7);
        let intention = engine.decide_shot(&mut state, &ctx, &mut rng);

        assert!(state.fatigue > 0.0);
        assert!(state.last_misread > 0.0);
        assert!(intention.target.y < 0.0);
        assert!(intention.recovery_target.y > 0.0);
    }

    #[test]
    fn test_undisguised_ball_read_exactly() {
        let engine = engine();
        let me = Player::new("Me");
        let mut them = Player::new("Them");
        them.attributes.deception = 100.0;
        let spin = Vec3::new(-50.0, 0.0, 10.0);
        let arrival = arrival(spin, ReachableSides::Both, 0.0);
        let last = previous_shot(0.0);
        let score = ScoreState::default();
        let ctx = ShotContext {
            player: &me,
            opponent: &them,
            side: TableSide::Positive,
            arrival: &arrival,
            opponent_position: Vec2::ZERO,
            score: &score,
            last_shot: Some(&last),
            recent_points: &[],
        };

        let mut state = DecisionState::default();
        engine.decide_shot(&mut state, &ctx, &mut MatchRng::new(8));
        assert_eq!(state.last_perceived_spin, spin);
        assert_eq!(state.last_misread, 0.0);
    }

    #[test]
    fn test_stretched_receiver_uses_only_side() {
        let engine = engine();
        let me = Player::new("Me");
        let them = Player::new("Them");
        let arrival = arrival(Vec3::ZERO, ReachableSides::Only(PaddleSide::Backhand), 0.9);
        let score = ScoreState::default();
        let ctx = ShotContext {
            player: &me,
            opponent: &them,
            side: TableSide::Positive,
            arrival: &arrival,
            opponent_position: Vec2::ZERO,
            score: &score,
            last_shot: None,
            recent_points: &[],
        };

        let mut rng = MatchRng::new(9);
        let intention = engine.decide_shot(&mut DecisionState::default(), &ctx, &mut rng);
        assert_eq!(intention.side, PaddleSide::Backhand);

        // Spinless and one side: ten Gaussians, nothing else
        let mut reference = MatchRng::new(9);
        for _ in 0..10 {
            reference.gaussian(0.0, 1.0);
        }
        assert_eq!(rng.draws(), reference.draws());
    }

    #[test]
    fn test_decisions_are_deterministic() {
        let engine = engine();
        let me = Player::new("Me");
        let them = Player::new("Them");
        let arrival = arrival(Vec3::new(-40.0, 5.0, 20.0), ReachableSides::Both, 0.4);
        let last = previous_shot(0.5);
        let score = ScoreState {
            deuce: true,
            ..ScoreState::default()
        };
        let points = [PointSummary {
            won: true,
            rally_length: 5,
        }];
        let ctx = ShotContext {
            player: &me,
            opponent: &them,
            side: TableSide::Positive,
            arrival: &arrival,
            opponent_position: Vec2::new(-30.0, -190.0),
            score: &score,
            last_shot: Some(&last),
            recent_points: &points,
        };
        let serve_ctx = ServeContext {
            player: &me,
            opponent: &them,
            server_side: TableSide::Negative,
            opponent_position: Vec2::new(0.0, 200.0),
            score: &score,
            recent_points: &points,
        };

        let run = |seed| {
            let mut rng = MatchRng::new(seed);
            let mut state = DecisionState::default();
            let serve = engine.decide_serve(&mut state, &serve_ctx, &mut rng);
            let shot = engine.decide_shot(&mut state, &ctx, &mut rng);
            (serve, shot, state)
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_fatigue_lifecycle() {
        let engine = engine();
        let mut state = DecisionState {
            fatigue: 0.6,
            ..DecisionState::default()
        };
        engine.on_point_end(&mut state);
        assert_eq!(state.fatigue, 0.6);
        engine.on_game_end(&mut state);
        assert!((state.fatigue - 0.6 * (1.0 - 0.5)).abs() < 1e-12);
        engine.on_timeout(&mut state);
        assert!((state.fatigue - 0.3 * (1.0 - 0.3)).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_intention_in_bounds(
            seed in any::<u64>(),
            deficit in 0.0f64..1.0,
            aggression in 0.0f64..100.0,
            mental in 0.0f64..100.0,
            sx in -120.0f64..120.0,
            pressure in any::<bool>(),
        ) {
            let engine = engine();
            let mut me = Player::new("Me");
            me.stroke.aggression = aggression;
            me.attributes.mental = mental;
            let them = Player::new("Them");
            let arrival = arrival(Vec3::new(sx, 0.0, 15.0), ReachableSides::Both, deficit);
            let last = previous_shot(0.6);
            let score = ScoreState { match_point: pressure, ..ScoreState::default() };
            let ctx = ShotContext {
                player: &me,
                opponent: &them,
                side: TableSide::Negative,
                arrival: &arrival,
                opponent_position: Vec2::new(20.0, 200.0),
                score: &score,
                last_shot: Some(&last),
                recent_points: &[],
            };

            let mut state = DecisionState::default();
            let s = engine.decide_shot(&mut state, &ctx, &mut MatchRng::new(seed));
            prop_assert!((0.0..=1.0).contains(&s.power));
            prop_assert!((0.0..=1.0).contains(&s.spin_intensity));
            prop_assert!((-1.0..=1.0).contains(&s.topspin));
            prop_assert!((-1.0..=1.0).contains(&s.sidespin));
            prop_assert!((0.0..=1.0).contains(&s.deception));
            prop_assert!((0.0..=1.0).contains(&state.last_misread));
            prop_assert!((0.0..=1.0).contains(&state.fatigue));
            prop_assert!(s.target.y > 0.0);
        }

        #[test]
        fn prop_adjusted_risk_in_unit_range(
            risk in -0.5f64..1.5,
            mental in -50.0f64..150.0,
            deficit in 0.0f64..1.0,
        ) {
            let score = ScoreState { deuce: true, ..ScoreState::default() };
            let r = pressure_adjusted(risk, mental, &score, &PressureParams::default());
            prop_assert!((0.0..=1.0).contains(&r));
            let r = safety_adjusted(r, deficit, &SafetyParams::default());
            prop_assert!((0.0..=1.0).contains(&r));
        }
    }
}
