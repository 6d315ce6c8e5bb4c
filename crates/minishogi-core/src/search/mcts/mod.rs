//! モンテカルロ木探索エンジン
//!
//! 1 回の `next_move` は次の 4 段階を反復回数だけ繰り返す。
//!
//! 1. 選択: 完全展開済みのノードを UCB1 でたどる（未訪問の子を優先）
//! 2. 展開: 未試行の手を 1 つランダムに子にする
//! 3. ロールアウト: ランダムな合法手で最大 `rollout_depth` 手進める
//! 4. 逆伝播: 根の手番側から見た報酬（勝ち 1 / 負け 0 / 未決着 0.5）を加算
//!
//! 返す手は訪問数最大の根の子。
//!
//! 保存先がある場合、探索前に根の局面の知識で子を事前展開し、探索後に根の子の統計を
//! 書き戻して保存する。共有状態（親乱数・知識）へのロックはその前後だけで取り、
//! 探索本体はロックなしで進むため、同じインスタンスへの並行呼び出しが並列に動く。

mod node;

use std::path::Path;

use parking_lot::Mutex;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::MctsConfig;
use crate::eval::material_balance;
use crate::knowledge::{KnowledgeFile, MctsKnowledge};
use crate::movegen::{generate_legal, in_check};
use crate::position::Position;
use crate::types::{Color, Move};

use super::{Engine, EngineError, seeded_rng};

use node::{ROOT, Tree};

/// ロールアウトの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Winner(Color),
    Undecided,
}

impl Outcome {
    /// `root` から見た報酬
    fn reward(self, root: Color) -> f64 {
        match self {
            Outcome::Winner(c) if c == root => 1.0,
            Outcome::Winner(_) => 0.0,
            Outcome::Undecided => 0.5,
        }
    }
}

/// モンテカルロ木探索エンジン
pub struct MctsEngine {
    iterations: u32,
    exploration: f64,
    rollout_depth: u32,
    rng: Mutex<Xoshiro256PlusPlus>,
    knowledge: MctsKnowledge,
}

impl MctsEngine {
    /// 知識を保存しないエンジン
    pub fn new(config: &MctsConfig, seed: u64) -> Self {
        Self::with_knowledge(config, seed, MctsKnowledge::disabled())
    }

    /// 知識を `path` に保存するエンジン
    ///
    /// 読み込みに失敗した場合は警告を出して空の知識で始める。
    pub fn persistent(config: &MctsConfig, seed: u64, path: impl AsRef<Path>) -> Self {
        let file = KnowledgeFile::new(path.as_ref(), config.compress);
        let knowledge = match MctsKnowledge::open(file.clone()) {
            Ok(knowledge) => knowledge,
            Err(e) => {
                log::warn!("mcts: failed to load knowledge: {e}");
                MctsKnowledge::empty(file)
            }
        };
        Self::with_knowledge(config, seed, knowledge)
    }

    fn with_knowledge(config: &MctsConfig, seed: u64, knowledge: MctsKnowledge) -> Self {
        MctsEngine {
            iterations: config.effective_iterations(),
            exploration: config.exploration,
            rollout_depth: config.rollout_depth,
            rng: Mutex::new(seeded_rng(seed)),
            knowledge,
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// 知識ストア（読み取り用）
    pub fn knowledge(&self) -> &MctsKnowledge {
        &self.knowledge
    }

    /// 呼び出しごとの乱数。親乱数からシードを 1 つ引く
    fn worker_rng(&self) -> Xoshiro256PlusPlus {
        let seed = self.rng.lock().random::<u64>();
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    fn rollout<R: Rng + ?Sized>(&self, start: &Position, root: Color, rng: &mut R) -> Outcome {
        let mut sim = start.clone();
        for _ in 0..self.rollout_depth {
            let side = sim.side_to_move();
            let moves = generate_legal(&sim, side);
            let Some(&mv) = moves.choose(rng) else {
                if in_check(&sim, side) {
                    return Outcome::Winner(side.opponent());
                }
                return Outcome::Undecided;
            };
            sim.play_move(mv);
        }
        match material_balance(&sim, root).signum() {
            1 => Outcome::Winner(root),
            -1 => Outcome::Winner(root.opponent()),
            _ => Outcome::Undecided,
        }
    }
}

impl Engine for MctsEngine {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn next_move(&self, pos: &Position) -> Result<Move, EngineError> {
        let root_player = pos.side_to_move();
        if generate_legal(pos, root_player).is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        let mut tree = Tree::new(pos.clone());
        let key = self.knowledge.is_persistent().then(|| pos.key());
        if let Some(key) = &key {
            tree.seed_root(&self.knowledge.snapshot(key));
        }

        let mut rng = self.worker_rng();
        for _ in 0..self.iterations {
            let mut id = tree.select(self.exploration);
            if !tree.node(id).is_fully_expanded() {
                id = tree.expand(id, &mut rng);
            }
            let outcome = self.rollout(&tree.node(id).pos, root_player, &mut rng);
            tree.backpropagate(id, outcome.reward(root_player));
        }

        let best = tree
            .best_root_child()
            .and_then(|id| tree.node(id).mv)
            .ok_or(EngineError::SearchFailed)?;
        log::debug!(
            "mcts: iterations={} nodes={} root_visits={} best={best}",
            self.iterations,
            tree.len(),
            tree.node(ROOT).visits
        );

        if let Some(key) = key {
            self.knowledge.record(key, tree.root_stats());
            if let Err(e) = self.knowledge.save_if_needed() {
                log::warn!("mcts: failed to persist knowledge: {e}");
            }
        }
        Ok(best)
    }

    fn save_if_needed(&self) -> Result<(), EngineError> {
        self.knowledge.save_if_needed()?;
        Ok(())
    }
}
