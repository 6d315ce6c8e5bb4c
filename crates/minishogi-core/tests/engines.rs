//! エンジンを初期局面・詰み局面から動かすシナリオテスト

use std::sync::Arc;
use std::thread;

use minishogi_core::config::{EngineConfig, MctsConfig, TdUcbConfig};
use minishogi_core::movegen::{generate_legal, is_checkmate};
use minishogi_core::position::Position;
use minishogi_core::search::{
    AlphaBetaEngine, Engine, EngineError, MctsEngine, RandomEngine, TdUcbEngine,
};
use minishogi_core::types::Color;

const MATE_IN_ONE: &str = "k4/2G2/1S3/5/5/4K b P";

fn assert_legal(pos: &Position, engine: &dyn Engine) {
    let mv = engine.next_move(pos).unwrap();
    let legal = generate_legal(pos, pos.side_to_move());
    assert!(legal.contains(&mv), "{} returned illegal {mv}", engine.name());
}

fn assert_mates(pos: &Position, engine: &dyn Engine) {
    let mv = engine.next_move(pos).unwrap();
    let mut after = pos.apply_move(mv);
    after.pass_turn();
    assert!(is_checkmate(&after, Color::Top), "{} played {mv}", engine.name());
}

#[test]
fn test_default_engines_from_initial_position() {
    let config = EngineConfig::default();
    let pos = Position::initial();
    assert_legal(&pos, &AlphaBetaEngine::from_config(&config.alpha_beta));
    assert_legal(&pos, &MctsEngine::new(&config.mcts, 11));
    assert_legal(&pos, &RandomEngine::new(11));
    let td = TdUcbConfig {
        simulations: 60,
        ..config.td_ucb
    };
    assert_legal(&pos, &TdUcbEngine::new(&td, 11));
}

#[test]
fn test_top_to_move_is_supported() {
    let mut pos = Position::initial();
    pos.play_move(generate_legal(&pos, Color::Bottom)[0]);
    assert_eq!(pos.side_to_move(), Color::Top);
    assert_legal(&pos, &AlphaBetaEngine::new(2));
    let config = MctsConfig {
        iterations: 100,
        ..MctsConfig::default()
    };
    assert_legal(&pos, &MctsEngine::new(&config, 3));
}

#[test]
fn test_engines_find_mate_in_one() {
    let pos = Position::from_sfen(MATE_IN_ONE).unwrap();
    assert_mates(&pos, &AlphaBetaEngine::new(1));
    assert_mates(&pos, &AlphaBetaEngine::new(3));
}

#[test]
fn test_no_legal_moves_is_reported() {
    // 後手玉が詰んでいる局面で後手に手を求める
    let mut pos = Position::from_sfen(MATE_IN_ONE).unwrap();
    pos.play_move("P@a5".parse().unwrap());
    let engines: Vec<Box<dyn Engine>> = vec![
        Box::new(RandomEngine::new(1)),
        Box::new(AlphaBetaEngine::new(2)),
        Box::new(MctsEngine::new(&MctsConfig::default(), 1)),
        Box::new(TdUcbEngine::new(&TdUcbConfig::default(), 1)),
    ];
    for engine in &engines {
        assert!(matches!(engine.next_move(&pos), Err(EngineError::NoLegalMoves)));
    }
}

#[test]
fn test_shared_mcts_engine_across_threads() {
    let config = MctsConfig {
        iterations: 200,
        ..MctsConfig::default()
    };
    let engine = Arc::new(MctsEngine::new(&config, 99));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let pos = Position::initial();
                let mv = engine.next_move(&pos)?;
                Ok::<_, EngineError>((pos, mv))
            })
        })
        .collect();
    for handle in handles {
        let (pos, mv) = handle.join().unwrap().unwrap();
        assert!(generate_legal(&pos, Color::Bottom).contains(&mv));
    }
}

#[test]
fn test_short_selfplay_game_stays_legal() {
    let bottom = AlphaBetaEngine::new(2);
    let top = RandomEngine::new(5);
    let mut pos = Position::initial();
    for _ in 0..30 {
        let side = pos.side_to_move();
        if generate_legal(&pos, side).is_empty() {
            break;
        }
        let engine: &dyn Engine = match side {
            Color::Bottom => &bottom,
            Color::Top => &top,
        };
        let mv = engine.next_move(&pos).unwrap();
        assert!(generate_legal(&pos, side).contains(&mv));
        pos.play_move(mv);
    }
}
