//! 置換表つき固定深さαβ探索
//!
//! 評価値は常に探索開始時の手番側（評価側）から見た値。
//! 評価側の手番では最大化、相手の手番では最小化する。

use std::cell::RefCell;

use crate::config::AlphaBetaConfig;
use crate::eval::{INFINITE_SCORE, evaluate};
use crate::movegen::generate_legal;
use crate::position::Position;
use crate::tt::{TranspositionTable, TtEntry, TtKey};
use crate::types::{Bound, Color, Move};

use super::{Engine, EngineError};

/// αβ探索エンジン
///
/// 置換表は `next_move` の呼び出しをまたいで保持する。`RefCell` を持つため `Sync` ではなく、
/// 1 つのインスタンスを複数スレッドから同時に使うことはできない。
pub struct AlphaBetaEngine {
    depth: i32,
    table: RefCell<TranspositionTable>,
}

impl AlphaBetaEngine {
    pub fn new(depth: u32) -> Self {
        AlphaBetaEngine {
            depth: depth.clamp(1, i32::MAX as u32) as i32,
            table: RefCell::new(TranspositionTable::new()),
        }
    }

    pub fn from_config(config: &AlphaBetaConfig) -> Self {
        Self::new(config.depth)
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// 置換表のエントリ数
    pub fn table_len(&self) -> usize {
        self.table.borrow().len()
    }

    /// 評価値と最善手を返す
    pub fn search(&self, pos: &Position, depth: i32, maximizer: Color) -> (i32, Option<Move>) {
        let mut scratch = pos.clone();
        let mut table = self.table.borrow_mut();
        search_node(
            &mut scratch,
            &mut table,
            depth,
            -INFINITE_SCORE,
            INFINITE_SCORE,
            maximizer,
        )
    }
}

fn search_node(
    pos: &mut Position,
    table: &mut TranspositionTable,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
    maximizer: Color,
) -> (i32, Option<Move>) {
    let (alpha_orig, beta_orig) = (alpha, beta);
    let key = TtKey::new(pos, maximizer);

    if let Some(entry) = table.probe(&key).filter(|e| e.is_usable(depth)) {
        match entry.bound {
            Bound::Exact => return (entry.score, entry.best_move),
            Bound::Lower => alpha = alpha.max(entry.score),
            Bound::Upper => beta = beta.min(entry.score),
        }
        if alpha >= beta {
            return (entry.score, entry.best_move);
        }
    }

    if depth == 0 {
        let score = evaluate(pos, maximizer, depth);
        table.store(key, TtEntry::leaf(depth, score));
        return (score, None);
    }

    let side = pos.side_to_move();
    let legal = generate_legal(pos, side);
    if legal.is_empty() {
        let score = evaluate(pos, maximizer, depth);
        table.store(key, TtEntry::leaf(depth, score));
        return (score, None);
    }

    let maximizing = side == maximizer;
    let mut best_score = if maximizing { -INFINITE_SCORE } else { INFINITE_SCORE };
    let mut best_move = None;
    for mv in legal {
        let undo = pos.do_move(mv);
        pos.pass_turn();
        let (score, _) = search_node(pos, table, depth - 1, alpha, beta, maximizer);
        pos.pass_turn();
        pos.undo_move(undo);

        if maximizing {
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(best_score);
        } else {
            if score < best_score {
                best_score = score;
                best_move = Some(mv);
            }
            beta = beta.min(best_score);
        }
        if beta <= alpha {
            break;
        }
    }

    table.store(
        key,
        TtEntry {
            depth,
            score: best_score,
            best_move,
            bound: Bound::classify(best_score, alpha_orig, beta_orig),
        },
    );
    (best_score, best_move)
}

impl Engine for AlphaBetaEngine {
    fn name(&self) -> &'static str {
        "alpha-beta"
    }

    fn next_move(&self, pos: &Position) -> Result<Move, EngineError> {
        let side = pos.side_to_move();
        if generate_legal(pos, side).is_empty() {
            return Err(EngineError::NoLegalMoves);
        }
        let (score, best) = self.search(pos, self.depth, side);
        log::debug!(
            "alpha-beta: depth={} score={} best={:?} tt={}",
            self.depth,
            score,
            best.map(|m| m.to_string()),
            self.table_len()
        );
        best.ok_or(EngineError::SearchFailed)
    }
}
