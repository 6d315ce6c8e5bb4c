//! 駒（Piece）

use super::{Color, PieceType};

/// 盤上の駒（先後・成りの区別あり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub promoted: bool,
}

impl Piece {
    /// 生駒を生成
    #[inline]
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece {
            piece_type,
            color,
            promoted: false,
        }
    }

    /// 成駒を生成
    #[inline]
    pub const fn new_promoted(color: Color, piece_type: PieceType) -> Piece {
        Piece {
            piece_type,
            color,
            promoted: true,
        }
    }

    /// 成った駒を返す
    #[inline]
    pub const fn promote(self) -> Piece {
        Piece {
            promoted: true,
            ..self
        }
    }

    /// 金と同じ動きをするか（金・成銀・と金）
    #[inline]
    pub const fn moves_like_gold(self) -> bool {
        matches!(self.piece_type, PieceType::Gold) || self.promoted
    }

    /// 未成の歩か（二歩判定用）
    #[inline]
    pub const fn is_unpromoted_pawn(self) -> bool {
        matches!(self.piece_type, PieceType::Pawn) && !self.promoted
    }
}
