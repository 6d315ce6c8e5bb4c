//! 駒割り評価
//!
//! 盤上の駒と手駒の価値の合計を、指定した側から見た差として返す。
//! 成銀・と金は金と同じ価値で数える。

use crate::movegen::{in_check, is_checkmate};
use crate::position::Position;
use crate::types::{Color, Piece, PieceType};

/// 詰みの評価値
pub const CHECKMATE_SCORE: i32 = 100_000;
/// 探索窓の初期値
pub const INFINITE_SCORE: i32 = 1_000_000_000;
/// 王手をかけている（かけられている）ことの補正値
pub const CHECK_BONUS: i32 = 5;

/// 駒種の価値
#[inline]
pub const fn piece_type_value(pt: PieceType) -> i32 {
    match pt {
        PieceType::King => 1000,
        PieceType::Gold => 70,
        PieceType::Silver => 50,
        PieceType::Pawn => 10,
    }
}

/// 盤上の駒の価値
#[inline]
pub const fn piece_value(piece: Piece) -> i32 {
    if piece.moves_like_gold() {
        piece_type_value(PieceType::Gold)
    } else {
        piece_type_value(piece.piece_type)
    }
}

/// `color` から見た駒割り
pub fn material_balance(pos: &Position, color: Color) -> i32 {
    let board: i32 = pos
        .pieces()
        .map(|(_, p)| if p.color == color { piece_value(p) } else { -piece_value(p) })
        .sum();
    let hands: i32 = Color::ALL
        .into_iter()
        .flat_map(|c| pos.hand(c).iter().map(move |(pt, n)| (c, pt, n)))
        .map(|(c, pt, n)| {
            let v = piece_type_value(pt) * n as i32;
            if c == color { v } else { -v }
        })
        .sum();
    board + hands
}

/// `maximizer` から見た静的評価
///
/// 詰みは残り深さで補正し、早い詰みほど大きく（遅い被詰みほどましに）する。
pub fn evaluate(pos: &Position, maximizer: Color, depth: i32) -> i32 {
    if is_checkmate(pos, maximizer) {
        return -CHECKMATE_SCORE - depth;
    }
    let them = maximizer.opponent();
    if is_checkmate(pos, them) {
        return CHECKMATE_SCORE + depth;
    }
    let mut score = material_balance(pos, maximizer);
    if in_check(pos, maximizer) {
        score -= CHECK_BONUS;
    }
    if in_check(pos, them) {
        score += CHECK_BONUS;
    }
    score
}
