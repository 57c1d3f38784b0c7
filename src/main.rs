//! Rally Sim demo driver
//!
//! Plays a handful of points between two sample players with a bare-bones
//! umpire and logs every stroke. Run with `RUST_LOG=debug` to see the
//! physics and decision traces.
//!
//! Usage: `rally-sim [seed] [points]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::sync::Arc;

    use rally_sim::player::{Handedness, RubberKind, StrokeCapability};
    use rally_sim::{
        AnyDecisionEngine, BallFlight, BallPhysics, DecisionEngine, DecisionState, EngineRegistry,
        MatchRng, PhysicsEngine, Player, PointSummary, RallyShot, ScoreState, ServeContext,
        ShotContext, SimulationParameters, TableSide, Vec2,
    };

    /// Longest rally before the point is called a let
    const MAX_STROKES: usize = 60;
    const GAME_POINTS: u32 = 11;

    struct Seat {
        player: Player,
        side: TableSide,
        decision: AnyDecisionEngine,
        physics: PhysicsEngine,
        state: DecisionState,
        position: Vec2,
        points: u32,
        games: u32,
    }

    impl Seat {
        fn new(player: Player, side: TableSide, registry: &EngineRegistry) -> Self {
            let decision = registry.decision_engine(&player);
            let physics = registry.physics_engine(&player);
            let position = ready_position(side, registry.params());
            Self {
                player,
                side,
                decision,
                physics,
                state: DecisionState::default(),
                position,
                points: 0,
                games: 0,
            }
        }
    }

    fn ready_position(side: TableSide, params: &SimulationParameters) -> Vec2 {
        Vec2::new(
            0.0,
            side.sign() * (params.table.half_length() + params.decision.recovery.depth),
        )
    }

    fn attacker() -> Player {
        let mut p = Player::new("Attacker");
        p.attributes.footwork = 75.0;
        p.stroke.aggression = 70.0;
        p.stroke.power = 65.0;
        p.stroke.topspin = 85.0;
        p.equipment.blade.speed = 1.1;
        p
    }

    fn defender() -> Player {
        let mut p = Player::new("Defender");
        p.handedness = Handedness::Left;
        p.attributes.spin_read = 75.0;
        p.attributes.deception = 70.0;
        p.stroke.aggression = 30.0;
        p.stroke.power = 35.0;
        p.stroke.topspin = 55.0;
        p.stroke.depth = 80.0;
        p.backhand = StrokeCapability {
            power: 1300.0,
            spin: 120.0,
            accuracy: 70.0,
            consistency: 82.0,
        };
        p.equipment.backhand.kind = RubberKind::LongPips;
        p
    }

    fn score_for(me: &Seat, them: &Seat) -> ScoreState {
        let near = |a: u32, b: u32| a + 1 >= GAME_POINTS && a > b;
        ScoreState {
            own_points: me.points,
            opponent_points: them.points,
            own_games: me.games,
            opponent_games: them.games,
            deuce: me.points >= GAME_POINTS - 1 && me.points == them.points,
            game_point: near(me.points, them.points) || near(them.points, me.points),
            match_point: false,
        }
    }

    /// Whether `flight`, hit by the other seat, is a good ball for `receiver`
    fn is_good(flight: &BallFlight, receiver: TableSide, serve: bool) -> bool {
        if serve {
            flight
                .trajectory
                .first_bounce
                .is_some_and(|b| receiver.contains(b.y))
        } else {
            flight.trajectory.landed_on(receiver)
        }
    }

    /// Play one point; returns the winning seat index and the stroke count
    fn play_point(
        seats: &mut [Seat; 2],
        server: usize,
        history: &[PointSummary],
        rng: &mut MatchRng,
    ) -> (usize, u32) {
        let receiver = 1 - server;
        let score = score_for(&seats[server], &seats[receiver]);
        let serve = {
            let (s, r) = (&seats[server], &seats[receiver]);
            let ctx = ServeContext {
                player: &s.player,
                opponent: &r.player,
                server_side: s.side,
                opponent_position: r.position,
                score: &score,
                recent_points: history,
            };
            let mut state = s.state;
            let intention = s.decision.decide_serve(&mut state, &ctx, rng);
            let flight = s.physics.execute_serve(&s.player, s.side, &intention, rng);
            (state, intention, flight)
        };
        seats[server].state = serve.0;
        let mut last = RallyShot {
            side: serve.1.side,
            deception: serve.1.deception,
            flight: serve.2,
        };

        let mut hitter = server;
        let mut strokes = 1;
        let mut is_serve = true;
        loop {
            let to = 1 - hitter;
            if !is_good(&last.flight, seats[to].side, is_serve) {
                log::info!(
                    "  {} misses: {:?} at ({:.1}, {:.1})",
                    seats[hitter].player.name,
                    last.flight.trajectory.event,
                    last.flight.landing_position().x,
                    last.flight.landing_position().y
                );
                return (to, strokes);
            }
            if strokes as usize >= MAX_STROKES {
                log::warn!("  rally capped at {MAX_STROKES} strokes, awarding to receiver");
                return (to, strokes);
            }

            let score = score_for(&seats[to], &seats[hitter]);
            let (me, them) = if to == 0 {
                let (a, b) = seats.split_at_mut(1);
                (&mut a[0], &b[0])
            } else {
                let (a, b) = seats.split_at_mut(1);
                (&mut b[0], &a[0])
            };

            let arrival = me
                .physics
                .analyze_arrival(&last.flight, &me.player, me.position);
            let ctx = ShotContext {
                player: &me.player,
                opponent: &them.player,
                side: me.side,
                arrival: &arrival,
                opponent_position: them.position,
                score: &score,
                last_shot: Some(&last),
                recent_points: history,
            };
            let intention = me.decision.decide_shot(&mut me.state, &ctx, rng);
            let flight = me.physics.execute_shot(&me.player, &arrival, &intention, rng);
            log::info!(
                "  {} {:?} q={:.2} deficit={:.2} misread={:.2} -> {:?}",
                me.player.name,
                intention.side,
                flight.quality,
                arrival.deficit,
                me.state.last_misread,
                flight.trajectory.event
            );

            let contact = Vec2::new(arrival.contact_position.x, arrival.contact_position.y);
            me.position = me.physics.compute_recovery(
                contact,
                intention.recovery_target,
                &me.player,
                flight.trajectory.flight_time,
            );

            last = RallyShot {
                side: intention.side,
                deception: intention.deception,
                flight,
            };
            hitter = to;
            strokes += 1;
            is_serve = false;
        }
    }

    pub fn run(seed: u64, points: u32) {
        let params = Arc::new(SimulationParameters::default());
        let registry = EngineRegistry::new(Arc::clone(&params));
        let mut rng = MatchRng::new(seed);
        let mut seats = [
            Seat::new(attacker(), TableSide::Negative, &registry),
            Seat::new(defender(), TableSide::Positive, &registry),
        ];
        let mut history: Vec<PointSummary> = Vec::new();

        log::info!(
            "{} vs {}, seed {}, {} points",
            seats[0].player.name,
            seats[1].player.name,
            seed,
            points
        );

        for n in 0..points {
            // Serve alternates every two points
            let server = ((n / 2) % 2) as usize;
            log::info!("Point {} ({} serving)", n + 1, seats[server].player.name);

            let (winner, strokes) = play_point(&mut seats, server, &history, &mut rng);
            seats[winner].points += 1;
            history.insert(
                0,
                PointSummary {
                    won: winner == 0,
                    rally_length: strokes,
                },
            );

            for seat in seats.iter_mut() {
                seat.decision.on_point_end(&mut seat.state);
                seat.position = ready_position(seat.side, &params);
            }

            let (a, b) = (seats[0].points, seats[1].points);
            if a.max(b) >= GAME_POINTS && a.abs_diff(b) >= 2 {
                let game_winner = if a > b { 0 } else { 1 };
                seats[game_winner].games += 1;
                log::info!("Game to {} ({a}-{b})", seats[game_winner].player.name);
                for seat in seats.iter_mut() {
                    seat.points = 0;
                    seat.decision.on_game_end(&mut seat.state);
                }
            }

            log::info!(
                "  -> {} wins after {} strokes; score {}-{}, games {}-{}, fatigue {:.3}/{:.3}",
                seats[winner].player.name,
                strokes,
                seats[0].points,
                seats[1].points,
                seats[0].games,
                seats[1].games,
                seats[0].state.fatigue,
                seats[1].state.fatigue
            );
        }

        println!(
            "{} {}-{} {} (games {}-{}), {} random draws",
            seats[0].player.name,
            seats[0].points,
            seats[1].points,
            seats[1].player.name,
            seats[0].games,
            seats[1].games,
            rng.draws()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let points = args.next().and_then(|s| s.parse().ok()).unwrap_or(11);

    demo::run(seed, points);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the product; there is no browser driver
}
