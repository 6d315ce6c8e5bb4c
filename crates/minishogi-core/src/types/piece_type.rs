//! 駒種（PieceType）

/// 駒種（先後の区別なし）
///
/// 判別値は局面キーの符号化にそのまま使うため変更しないこと。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceType {
    King = 0,
    Gold = 1,
    Silver = 2,
    Pawn = 3,
}

impl PieceType {
    /// 駒種の数
    pub const NUM: usize = 4;

    /// 全駒種（キー・手駒の列挙順）
    pub const ALL: [PieceType; 4] = [
        PieceType::King,
        PieceType::Gold,
        PieceType::Silver,
        PieceType::Pawn,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 成れる駒種か（銀・歩のみ）
    #[inline]
    pub const fn is_promotable(self) -> bool {
        matches!(self, PieceType::Silver | PieceType::Pawn)
    }

    /// 棋譜表記の大文字 1 文字
    pub const fn letter(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Gold => 'G',
            PieceType::Silver => 'S',
            PieceType::Pawn => 'P',
        }
    }

    /// 大文字・小文字を問わず 1 文字から駒種を得る
    pub fn from_letter(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'K' => Some(PieceType::King),
            'G' => Some(PieceType::Gold),
            'S' => Some(PieceType::Silver),
            'P' => Some(PieceType::Pawn),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_roundtrip() {
        for pt in PieceType::ALL {
            assert_eq!(PieceType::from_letter(pt.letter()), Some(pt));
            assert_eq!(PieceType::from_letter(pt.letter().to_ascii_lowercase()), Some(pt));
        }
        assert_eq!(PieceType::from_letter('R'), None);
    }

    #[test]
    fn test_is_promotable() {
        assert!(PieceType::Silver.is_promotable());
        assert!(PieceType::Pawn.is_promotable());
        assert!(!PieceType::Gold.is_promotable());
        assert!(!PieceType::King.is_promotable());
    }
}
