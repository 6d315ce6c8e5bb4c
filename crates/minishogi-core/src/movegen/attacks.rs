//! 駒の移動パターンと王手判定

use crate::position::Position;
use crate::types::{Color, Piece, PieceType, Square};

/// 玉の 8 方向
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

// 以下は Bottom 視点（前方 = +1 段）。Top は段方向を反転したテーブルを使う。
const GOLD_BOTTOM: [(i8, i8); 6] = [(-1, 1), (0, 1), (1, 1), (-1, 0), (1, 0), (0, -1)];
const GOLD_TOP: [(i8, i8); 6] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (0, 1)];
const SILVER_BOTTOM: [(i8, i8); 5] = [(-1, 1), (0, 1), (1, 1), (-1, -1), (1, -1)];
const SILVER_TOP: [(i8, i8); 5] = [(-1, -1), (0, -1), (1, -1), (-1, 1), (1, 1)];
const PAWN_BOTTOM: [(i8, i8); 1] = [(0, 1)];
const PAWN_TOP: [(i8, i8); 1] = [(0, -1)];

/// 駒の移動パターン（筋差, 段差）
///
/// 成銀・と金は金と同じ動き。
pub fn movement_offsets(piece: Piece) -> &'static [(i8, i8)] {
    if piece.piece_type == PieceType::King {
        return &KING_OFFSETS;
    }
    if piece.moves_like_gold() {
        return match piece.color {
            Color::Bottom => &GOLD_BOTTOM,
            Color::Top => &GOLD_TOP,
        };
    }
    match (piece.piece_type, piece.color) {
        (PieceType::Silver, Color::Bottom) => &SILVER_BOTTOM,
        (PieceType::Silver, Color::Top) => &SILVER_TOP,
        (PieceType::Pawn, Color::Bottom) => &PAWN_BOTTOM,
        (PieceType::Pawn, Color::Top) => &PAWN_TOP,
        // 玉・金は上で処理済み
        _ => &[],
    }
}

/// 駒の移動先として到達可能な升を列挙
#[inline]
pub(crate) fn reachable(piece: Piece, from: Square) -> impl Iterator<Item = Square> {
    movement_offsets(piece).iter().filter_map(move |&(df, dr)| from.offset(df, dr))
}

/// `at` に置かれた駒に、盤内の移動先が 1 つ以上あるか
///
/// 最奥段の歩のような「行き所のない駒」を弾くための判定。
#[inline]
pub fn has_board_reach(piece: Piece, at: Square) -> bool {
    reachable(piece, at).next().is_some()
}

/// `color` の玉に相手の駒の利きがあるか
///
/// 玉が盤上にない場合は `false`。
pub fn in_check(pos: &Position, color: Color) -> bool {
    let Some(king) = pos.king_square(color) else {
        return false;
    };
    let them = color.opponent();
    pos.pieces()
        .filter(|(_, p)| p.color == them)
        .any(|(sq, p)| reachable(p, sq).any(|to| to == king))
}
