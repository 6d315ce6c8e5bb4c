//! 合法手の列挙
//!
//! 候補手を `try_move_as` で局面に適用し、次の 2 条件を満たすものだけを残す。
//!
//! 1. 指した側の玉に王手がかかっていない
//! 2. 移動（打った）後の駒に盤内の行き先が残っている
//!
//! 成りは移動先が成りゾーン（相手側 2 段）にある生の銀・歩にだけ選択肢として加わり、
//! 強制はされない（不成で行き所がなくなる場合は条件 2 で落ちる）。

use crate::position::Position;
use crate::types::{Color, Move, Piece, PieceType, RANK_NB, Square};

use super::attacks::{has_board_reach, in_check, reachable};

/// 升が `color` の成りゾーン（相手側の 2 段）にあるか
#[inline]
pub fn in_promotion_zone(color: Color, sq: Square) -> bool {
    match color {
        Color::Bottom => sq.rank() >= RANK_NB - 2,
        Color::Top => sq.rank() <= 1,
    }
}

/// `piece` が `to` への移動で成れるか
#[inline]
pub fn can_promote(piece: Piece, to: Square) -> bool {
    !piece.promoted && piece.piece_type.is_promotable() && in_promotion_zone(piece.color, to)
}

/// 候補手を試し、合法なら `out` に加える
fn push_if_legal(pos: &mut Position, color: Color, mv: Move, out: &mut Vec<Move>) {
    let to = mv.to();
    let guard = pos.try_move_as(color, mv);
    if in_check(&guard, color) {
        return;
    }
    let Some(placed) = guard.piece_on(to) else {
        return;
    };
    if has_board_reach(placed, to) {
        out.push(mv);
    }
}

fn collect_from(pos: &mut Position, color: Color, from: Square, out: &mut Vec<Move>) {
    let Some(piece) = pos.piece_on(from) else {
        return;
    };
    if piece.color != color {
        return;
    }
    for to in reachable(piece, from) {
        if pos.piece_on(to).is_some_and(|dest| dest.color == color) {
            continue;
        }
        push_if_legal(pos, color, Move::new_move(from, to, false), out);
        if can_promote(piece, to) {
            push_if_legal(pos, color, Move::new_move(from, to, true), out);
        }
    }
}

/// 同じ筋に自分の生の歩があるか（二歩判定）
fn file_has_own_pawn(pos: &Position, color: Color, file: usize) -> bool {
    (0..RANK_NB).any(|rank| {
        pos.piece_on(Square::new(file, rank))
            .is_some_and(|p| p.color == color && p.is_unpromoted_pawn())
    })
}

fn collect_drops(pos: &mut Position, color: Color, pt: PieceType, out: &mut Vec<Move>) {
    if !pos.hand(color).has(pt) {
        return;
    }
    let mut blocked = [false; crate::types::FILE_NB];
    if pt == PieceType::Pawn {
        for (file, flag) in blocked.iter_mut().enumerate() {
            *flag = file_has_own_pawn(pos, color, file);
        }
    }
    for to in Square::all() {
        if pos.piece_on(to).is_some() || blocked[to.file()] {
            continue;
        }
        push_if_legal(pos, color, Move::new_drop(pt, to), out);
    }
}

/// `color` の合法手をすべて列挙（盤上の手を升順、続いて駒打ちを駒種順）
///
/// `color` が手番側である必要はない。
pub fn generate_legal(pos: &Position, color: Color) -> Vec<Move> {
    let mut scratch = pos.clone();
    let mut moves = Vec::with_capacity(64);
    for from in Square::all() {
        collect_from(&mut scratch, color, from, &mut moves);
    }
    for pt in PieceType::ALL {
        collect_drops(&mut scratch, color, pt, &mut moves);
    }
    debug_assert_eq!(&scratch, pos);
    moves
}

/// `from` にある `color` の駒の合法手
pub fn legal_moves_from(pos: &Position, color: Color, from: Square) -> Vec<Move> {
    let mut scratch = pos.clone();
    let mut moves = Vec::new();
    collect_from(&mut scratch, color, from, &mut moves);
    moves
}

/// `color` が手駒の `pt` を打つ合法手
pub fn legal_drops(pos: &Position, color: Color, pt: PieceType) -> Vec<Move> {
    let mut scratch = pos.clone();
    let mut moves = Vec::new();
    collect_drops(&mut scratch, color, pt, &mut moves);
    moves
}

/// 手番側の合法手の中から `candidate` と一致するものを探す
///
/// 入力された手を適用前に検証するために使う。
pub fn find_legal(pos: &Position, candidate: Move) -> Option<Move> {
    let color = pos.side_to_move();
    let moves = match candidate {
        Move::Normal { from, .. } => legal_moves_from(pos, color, from),
        Move::Drop { piece_type, .. } => legal_drops(pos, color, piece_type),
    };
    moves.into_iter().find(|&mv| mv == candidate)
}

/// `color` が詰んでいるか（王手かつ合法手なし）
pub fn is_checkmate(pos: &Position, color: Color) -> bool {
    in_check(pos, color) && generate_legal(pos, color).is_empty()
}

/// 手番側が詰んでいれば勝者を返す
pub fn checkmate_status(pos: &Position) -> Option<Color> {
    let side = pos.side_to_move();
    is_checkmate(pos, side).then(|| side.opponent())
}
