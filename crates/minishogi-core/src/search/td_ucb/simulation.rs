//! 1 回分のシミュレーション

use std::time::Instant;

use rand::prelude::*;

use crate::config::TdUcbConfig;
use crate::knowledge::TdSession;
use crate::movegen::{generate_legal, in_check};
use crate::position::Position;
use crate::types::{Color, Move};

use super::profile::{Profiler, Section};
use super::{from_side, outcome_for_bottom};

/// 根から最大 `rollout_depth` 手進めながら価値と手の統計を更新する
pub(super) fn run<R: Rng + ?Sized>(
    config: &TdUcbConfig,
    session: &mut TdSession<'_>,
    rng: &mut R,
    profiler: &mut Profiler,
    root: &Position,
) {
    let start = Instant::now();
    rollout(config, session, rng, profiler, root);
    profiler.observe(Section::Simulation, start.elapsed());
}

fn rollout<R: Rng + ?Sized>(
    config: &TdUcbConfig,
    session: &mut TdSession<'_>,
    rng: &mut R,
    profiler: &mut Profiler,
    root: &Position,
) {
    session.mark_dirty();
    let mut state = root.clone();
    for _ in 0..config.rollout_depth {
        let key = state.td_key();
        let current = session.value(&key);
        let side = state.side_to_move();
        let mut legal = profiler.time(Section::LegalGeneration, || generate_legal(&state, side));
        if legal.is_empty() {
            let value = if in_check(&state, side) {
                outcome_for_bottom(side.opponent())
            } else {
                0.0
            };
            session.set_value(&key, value);
            return;
        }

        let mv = profiler.time(Section::MoveSelection, || {
            select_move(config, session, rng, side, &key, &mut legal)
        });
        profiler.time(Section::MoveApply, || state.play_move(mv));

        let (reward, terminal) = profiler.time(Section::LegalGeneration, || {
            evaluate_outcome(&state, side)
        });
        let target = if terminal {
            reward
        } else {
            reward + config.gamma * session.value(&state.td_key())
        };
        session.set_value(&key, current + config.alpha * (target - current));
        session.record_move(&key, &mv.to_string(), target);

        if terminal {
            session.set_value_if_absent(&state.td_key(), reward);
            return;
        }
    }
}

/// UCB1 で手を選ぶ。シャッフル後に最初に見つかった未訪問の手を優先する
fn select_move<R: Rng + ?Sized>(
    config: &TdUcbConfig,
    session: &TdSession<'_>,
    rng: &mut R,
    side: Color,
    key: &str,
    legal: &mut [Move],
) -> Move {
    legal.shuffle(rng);
    let total = session.total_visits(key).max(1) as f64;
    let mut best = legal[0];
    let mut best_score = f64::NEG_INFINITY;
    for &mv in legal.iter() {
        let stat = session.move_stat(key, &mv.to_string()).filter(|s| s.visits > 0);
        let Some(stat) = stat else {
            return mv;
        };
        let visits = f64::from(stat.visits);
        let explore = config.exploration * ((total + 1.0).ln() / visits).sqrt();
        let score = from_side(side, stat.mean()) + explore;
        if score > best_score {
            best_score = score;
            best = mv;
        }
    }
    best
}

/// `mover` が指した直後の局面の報酬と終局判定（Bottom 視点）
fn evaluate_outcome(state: &Position, mover: Color) -> (f64, bool) {
    let side = state.side_to_move();
    if !generate_legal(state, side).is_empty() {
        return (0.0, false);
    }
    if in_check(state, side) {
        return (outcome_for_bottom(mover), true);
    }
    (0.0, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::TdKnowledge;
    use crate::types::{Piece, PieceType, Square};
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_evaluate_outcome() {
        let mut pos = Position::empty(Color::Bottom);
        pos.put_piece(Square::new(0, 0), Piece::new(Color::Bottom, PieceType::King));
        pos.put_piece(Square::new(0, 1), Piece::new(Color::Top, PieceType::Gold));
        pos.put_piece(Square::new(1, 0), Piece::new(Color::Top, PieceType::Gold));
        pos.put_piece(Square::new(1, 1), Piece::new(Color::Top, PieceType::King));
        assert_eq!(evaluate_outcome(&pos, Color::Top), (-1.0, true));
        assert_eq!(evaluate_outcome(&Position::initial(), Color::Top), (0.0, false));
    }

    #[test]
    fn test_unvisited_move_selected_first() {
        let store = TdKnowledge::transient();
        let mut session = store.session();
        let pos = Position::initial();
        let key = pos.td_key();
        let mut legal = generate_legal(&pos, Color::Bottom);
        let skip = legal[0];
        for mv in &legal[1..] {
            session.record_move(&key, &mv.to_string(), 1.0);
        }
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let config = TdUcbConfig::default();
        let picked = select_move(&config, &session, &mut rng, Color::Bottom, &key, &mut legal);
        assert_eq!(picked, skip);
    }

    #[test]
    fn test_terminal_step_updates_values() {
        let mut pos = Position::empty(Color::Bottom);
        pos.put_piece(Square::new(0, 5), Piece::new(Color::Top, PieceType::King));
        pos.put_piece(Square::new(1, 3), Piece::new(Color::Bottom, PieceType::Silver));
        pos.put_piece(Square::new(2, 4), Piece::new(Color::Bottom, PieceType::Gold));
        pos.put_piece(Square::new(4, 0), Piece::new(Color::Bottom, PieceType::King));
        pos.set_hand_count(Color::Bottom, PieceType::Pawn, 1);

        let store = TdKnowledge::transient();
        let config = TdUcbConfig::default();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        {
            let mut session = store.session();
            let mut profiler = Profiler::default();
            // 根の全手を 1 度ずつ試し終えるまで回す
            for _ in 0..200 {
                run(&config, &mut session, &mut rng, &mut profiler, &pos);
            }
            let snap = profiler.snapshot();
            assert_eq!(snap.simulation.count, 200);
            assert!(snap.move_apply.count >= 200);
            assert!(snap.legal_generation.count >= 2 * snap.move_apply.count);
        }
        let stats = store.move_stats_for(&pos.td_key()).unwrap();
        let mate = Move::new_drop(PieceType::Pawn, Square::new(0, 4)).to_string();
        assert_eq!(stats[&mate].mean(), 1.0);
        assert!(store.value_of(&pos.td_key()).unwrap() > 0.0);
    }
}
