//! TD(0) + UCB1 の自己対戦学習エンジン
//!
//! 木を持たない平坦なシミュレーションを `simulations` 回行う。各手順では
//!
//! 1. 局面キー（`td_key`）の手の統計から UCB1 で手を選ぶ（未訪問の手を即採用）
//! 2. 手を指し、終局なら Bottom 視点で ±1（千日手相当の手詰まりは 0）の報酬を得る
//! 3. 目標値 `reward + gamma * V(次局面)`（終局なら `reward`）へ `alpha` で価値を更新
//! 4. 局面・手の訪問数と累積リターンを更新
//!
//! 実際に指す手は、シャッフルした合法手のうち記録済み平均リターン（Top は符号反転）が
//! 最大のもの。呼び出し全体を 1 つのロックで直列化する。
//!
//! 保存は `save_if_needed` を呼んだときだけ行う。区間別の所要時間は
//! [`TdUcbEngine::profile_snapshot`] で取得できる。

mod profile;
mod simulation;

use std::path::Path;
use std::time::Instant;

use parking_lot::Mutex;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::TdUcbConfig;
use crate::knowledge::{KnowledgeFile, TdKnowledge};
use crate::movegen::generate_legal;
use crate::position::Position;
use crate::types::{Color, Move};

use super::{Engine, EngineError, seeded_rng};
use profile::{Profiler, Section};

pub use profile::{ProfileMetric, TdUcbProfile};

/// TD-UCB エンジン
pub struct TdUcbEngine {
    config: TdUcbConfig,
    rng: Mutex<Xoshiro256PlusPlus>,
    knowledge: TdKnowledge,
    profiler: Mutex<Profiler>,
}

impl TdUcbEngine {
    /// 学習結果を保存しないエンジン
    pub fn new(config: &TdUcbConfig, seed: u64) -> Self {
        Self::with_knowledge(config, seed, TdKnowledge::transient())
    }

    /// 学習結果を `path` に保存するエンジン
    ///
    /// 読み込みに失敗した場合は警告を出して空の表で始める。
    pub fn persistent(config: &TdUcbConfig, seed: u64, path: impl AsRef<Path>) -> Self {
        let file = KnowledgeFile::new(path.as_ref(), config.compress);
        let knowledge = match TdKnowledge::open(file.clone(), config.persist_move_stats) {
            Ok(knowledge) => knowledge,
            Err(e) => {
                log::warn!("td-ucb: failed to load knowledge: {e}");
                TdKnowledge::empty(file, config.persist_move_stats)
            }
        };
        Self::with_knowledge(config, seed, knowledge)
    }

    fn with_knowledge(config: &TdUcbConfig, seed: u64, knowledge: TdKnowledge) -> Self {
        TdUcbEngine {
            config: config.clone(),
            rng: Mutex::new(seeded_rng(seed)),
            knowledge,
            profiler: Mutex::new(Profiler::default()),
        }
    }

    pub fn config(&self) -> &TdUcbConfig {
        &self.config
    }

    /// 学習表（読み取り用）
    pub fn knowledge(&self) -> &TdKnowledge {
        &self.knowledge
    }

    /// これまでの区間別計測値
    pub fn profile_snapshot(&self) -> TdUcbProfile {
        self.profiler.lock().snapshot()
    }

    pub fn reset_profile(&self) {
        self.profiler.lock().reset();
    }
}

/// 勝者を Bottom 視点の値にする
#[inline]
pub(crate) fn outcome_for_bottom(winner: Color) -> f64 {
    match winner {
        Color::Bottom => 1.0,
        Color::Top => -1.0,
    }
}

/// 手番側から見た値に直す（値は Bottom 視点で保存している）
#[inline]
pub(crate) fn from_side(side: Color, value: f64) -> f64 {
    match side {
        Color::Bottom => value,
        Color::Top => -value,
    }
}

impl Engine for TdUcbEngine {
    fn name(&self) -> &'static str {
        "td-ucb"
    }

    fn next_move(&self, pos: &Position) -> Result<Move, EngineError> {
        let mut rng = self.rng.lock();
        let mut session = self.knowledge.session();
        let mut profiler = self.profiler.lock();
        let start = Instant::now();

        let side = pos.side_to_move();
        let mut legal = profiler.time(Section::LegalGeneration, || generate_legal(pos, side));
        if legal.is_empty() {
            profiler.observe(Section::NextMove, start.elapsed());
            return Err(EngineError::NoLegalMoves);
        }

        for _ in 0..self.config.simulations {
            simulation::run(&self.config, &mut session, &mut *rng, &mut profiler, pos);
        }

        legal.shuffle(&mut *rng);
        let key = pos.td_key();
        let mut best = legal[0];
        let mut best_score = f64::NEG_INFINITY;
        for &mv in &legal {
            let score = from_side(side, session.move_mean(&key, &mv.to_string()));
            if score > best_score {
                best_score = score;
                best = mv;
            }
        }
        log::debug!(
            "td-ucb: simulations={} value={:.4} best={best} score={best_score:.4}",
            self.config.simulations,
            session.value(&key)
        );
        profiler.observe(Section::NextMove, start.elapsed());
        Ok(best)
    }

    fn save_if_needed(&self) -> Result<(), EngineError> {
        self.knowledge.save_if_needed()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::is_checkmate;
    use crate::types::{Piece, PieceType, Square};

    fn small_config() -> TdUcbConfig {
        TdUcbConfig {
            simulations: 40,
            rollout_depth: 12,
            ..TdUcbConfig::default()
        }
    }

    fn drop_mate_position() -> Position {
        let mut pos = Position::empty(Color::Bottom);
        pos.put_piece(Square::new(0, 5), Piece::new(Color::Top, PieceType::King));
        pos.put_piece(Square::new(1, 3), Piece::new(Color::Bottom, PieceType::Silver));
        pos.put_piece(Square::new(2, 4), Piece::new(Color::Bottom, PieceType::Gold));
        pos.put_piece(Square::new(4, 0), Piece::new(Color::Bottom, PieceType::King));
        pos.set_hand_count(Color::Bottom, PieceType::Pawn, 1);
        pos
    }

    #[test]
    fn test_returns_legal_move_and_learns() {
        let engine = TdUcbEngine::new(&small_config(), 17);
        let pos = Position::initial();
        let mv = engine.next_move(&pos).unwrap();
        assert!(generate_legal(&pos, Color::Bottom).contains(&mv));
        assert!(engine.knowledge().value_of(&pos.td_key()).is_some());
        // 保存先がなければ未保存にならない
        assert!(!engine.knowledge().is_dirty());
        engine.save_if_needed().unwrap();
    }

    #[test]
    fn test_prefers_mating_move() {
        let config = TdUcbConfig {
            simulations: 400,
            rollout_depth: 4,
            ..TdUcbConfig::default()
        };
        let engine = TdUcbEngine::new(&config, 23);
        let pos = drop_mate_position();
        let mv = engine.next_move(&pos).unwrap();
        let mut next = pos.apply_move(mv);
        next.pass_turn();
        assert!(is_checkmate(&next, Color::Top), "{mv} does not mate");
    }

    #[test]
    fn test_sign_helpers() {
        assert_eq!(outcome_for_bottom(Color::Bottom), 1.0);
        assert_eq!(outcome_for_bottom(Color::Top), -1.0);
        assert_eq!(from_side(Color::Top, 0.25), -0.25);
        assert_eq!(from_side(Color::Bottom, 0.25), 0.25);
    }

    #[test]
    fn test_profile_snapshot_and_reset() {
        let config = small_config();
        let engine = TdUcbEngine::new(&config, 5);
        assert_eq!(engine.profile_snapshot(), TdUcbProfile::default());

        engine.next_move(&Position::initial()).unwrap();
        let snap = engine.profile_snapshot();
        assert_eq!(snap.next_move.count, 1);
        assert_eq!(snap.simulation.count, u64::from(config.simulations));
        assert!(snap.move_selection.count > 0);
        assert!(snap.move_apply.count > 0);
        assert!(snap.legal_generation.count > snap.move_apply.count);
        assert!(snap.next_move.max_ms >= snap.next_move.avg_ms);
        assert!(snap.next_move.total_ms >= snap.simulation.max_ms);

        engine.reset_profile();
        assert_eq!(engine.profile_snapshot(), TdUcbProfile::default());
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("td_ucb.txt");
        let pos = Position::initial();
        let key = pos.td_key();
        let value = {
            let engine = TdUcbEngine::persistent(&small_config(), 8, &path);
            engine.next_move(&pos).unwrap();
            assert!(engine.knowledge().is_dirty());
            engine.save_if_needed().unwrap();
            assert!(!engine.knowledge().is_dirty());
            engine.knowledge().value_of(&key).unwrap()
        };
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.lines().all(|l| l.starts_with("S\t")));

        let reloaded = TdUcbEngine::persistent(&small_config(), 9, &path);
        let loaded = reloaded.knowledge().value_of(&key).unwrap();
        assert!((loaded - value).abs() < 1e-9);
    }

    #[test]
    fn test_move_stats_persist_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("td_ucb.txt.gz");
        let config = TdUcbConfig {
            persist_move_stats: true,
            compress: true,
            ..small_config()
        };
        let pos = Position::initial();
        {
            let engine = TdUcbEngine::persistent(&config, 8, &path);
            engine.next_move(&pos).unwrap();
            engine.save_if_needed().unwrap();
        }
        let reloaded = TdUcbEngine::persistent(&config, 9, &path);
        let stats = reloaded.knowledge().move_stats_for(&pos.td_key()).unwrap();
        assert!(stats.values().any(|s| s.visits > 0));
    }
}
