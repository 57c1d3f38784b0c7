//! Paddle side selection and target placement

use crate::math::{EPSILON, Vec2, clamp01, lerp, sign};
use crate::params::{SideSelectionParams, SimulationParameters};
use crate::player::{PaddleSide, Player};
use crate::rng::MatchRng;
use crate::sim::{ReachableSides, TableSide};

use super::tendency::map_tendency;

/// How good a player's stroke on `side` is, in [0, 1]
pub fn side_score(player: &Player, side: PaddleSide, params: &SideSelectionParams) -> f64 {
    let cap = player.capability(side);
    let terms = [
        (params.power_weight, clamp01(cap.power / params.reference_speed)),
        (params.spin_weight, clamp01(cap.spin / params.reference_spin)),
        (params.accuracy_weight, clamp01(cap.accuracy / 100.0)),
        (params.consistency_weight, clamp01(cap.consistency / 100.0)),
    ];
    let total: f64 = terms.iter().map(|(w, _)| w.max(0.0)).sum();
    if total < EPSILON {
        return 0.0;
    }
    terms.iter().map(|(w, v)| w.max(0.0) * v).sum::<f64>() / total
}

/// Pick a paddle side
///
/// A single reachable side is taken as-is with no draws. Otherwise each side
/// scores `preference × weight + uniform × (1 − weight)`, forehand first.
pub fn select_side(
    reachable: ReachableSides,
    forehand_score: f64,
    backhand_score: f64,
    params: &SideSelectionParams,
    rng: &mut MatchRng,
) -> PaddleSide {
    match reachable {
        ReachableSides::Only(side) => side,
        ReachableSides::Both => {
            let w = clamp01(params.preference_weight);
            let fh = forehand_score * w + rng.next() * (1.0 - w);
            let bh = backhand_score * w + rng.next() * (1.0 - w);
            if fh >= bh {
                PaddleSide::Forehand
            } else {
                PaddleSide::Backhand
            }
        }
    }
}

/// Distance from the net, as a signed y on `half`, for a depth fraction
fn depth_y(half: TableSide, depth: f64, params: &SimulationParameters) -> f64 {
    let t = &params.decision.targeting;
    let fraction = lerp(t.short_depth, t.deep_depth, clamp01(depth));
    half.sign() * fraction * params.table.half_length()
}

/// Clamp a point onto the legal part of `half`
fn clamp_to_half(p: Vec2, half: TableSide, max_x: f64, params: &SimulationParameters) -> Vec2 {
    let hl = params.table.half_length();
    let near = params.decision.targeting.net_margin.min(hl);
    let depth = (p.y * half.sign()).clamp(near, hl);
    Vec2::new(p.x.clamp(-max_x, max_x), half.sign() * depth)
}

/// Target for a rally stroke played from `own_side`
///
/// Draws four Gaussians: depth, width, x jitter, y jitter.
pub fn rally_target(
    player: &Player,
    own_side: TableSide,
    opponent_x: f64,
    risk: f64,
    params: &SimulationParameters,
    rng: &mut MatchRng,
) -> Vec2 {
    let t = &params.decision.targeting;
    let noise = params.decision.tendency.noise_stddev;
    let hw = params.table.half_width();
    let half = own_side.opposite();

    let depth = map_tendency(player.stroke.depth, noise, rng);
    let width = map_tendency(player.stroke.width, noise, rng);

    // Width tendency picks a lane; the opponent bias pulls toward the far edge
    let lane_x = (width * 2.0 - 1.0) * hw;
    let away_side = if opponent_x.abs() > EPSILON {
        -sign(opponent_x)
    } else {
        sign(lane_x)
    };
    let aim_x = lerp(lane_x, away_side * hw, clamp01(t.opponent_bias_weight));

    let margin = (t.base_edge_margin * (1.0 - clamp01(risk))).max(t.min_edge_margin);
    let limit = (hw - margin).max(0.0);
    let aim = Vec2::new(aim_x.clamp(-limit, limit), depth_y(half, depth, params));

    let jitter = Vec2::new(rng.gaussian(0.0, t.jitter_x), rng.gaussian(0.0, t.jitter_y));
    clamp_to_half(aim + jitter, half, hw, params)
}

/// Target for a serve from `server_side`; always on the opposite half
///
/// Same draw pattern as `rally_target`.
pub fn serve_target(
    player: &Player,
    server_side: TableSide,
    params: &SimulationParameters,
    rng: &mut MatchRng,
) -> Vec2 {
    let t = &params.decision.targeting;
    let noise = params.decision.tendency.noise_stddev;
    let half = server_side.opposite();
    let max_x = params.table.half_width() * clamp01(params.serve.width_fraction);

    let depth = map_tendency(player.serve.depth, noise, rng);
    let width = map_tendency(player.serve.width, noise, rng);
    let aim = Vec2::new((width * 2.0 - 1.0) * max_x, depth_y(half, depth, params));

    let jitter = Vec2::new(rng.gaussian(0.0, t.jitter_x), rng.gaussian(0.0, t.jitter_y));
    clamp_to_half(aim + jitter, half, max_x, params)
}
