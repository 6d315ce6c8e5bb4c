//! 置換表エントリー

use crate::position::Position;
use crate::types::{Bound, Color, Move};

/// 置換表のキー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TtKey {
    board: String,
    side_to_move: Color,
    maximizer: Color,
}

impl TtKey {
    /// 局面と評価側からキーを作る
    pub fn new(pos: &Position, maximizer: Color) -> TtKey {
        TtKey {
            board: pos.board_key(),
            side_to_move: pos.side_to_move(),
            maximizer,
        }
    }
}

/// 置換表エントリー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    /// 残り探索深さ
    pub depth: i32,
    /// 評価側から見た値
    pub score: i32,
    /// 最善手（末端・合法手なしでは `None`）
    pub best_move: Option<Move>,
    pub bound: Bound,
}

impl TtEntry {
    /// 末端評価のエントリ
    #[inline]
    pub const fn leaf(depth: i32, score: i32) -> TtEntry {
        TtEntry {
            depth,
            score,
            best_move: None,
            bound: Bound::Exact,
        }
    }

    /// 要求深さ以上の探索結果か
    #[inline]
    pub const fn is_usable(&self, depth: i32) -> bool {
        self.depth >= depth
    }
}
