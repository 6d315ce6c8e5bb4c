//! 升目（Square）
//!
//! 盤は 5 筋 × 6 段。筋は `a`..`e`（左から）、段は `1`..`6`（Bottom の自陣が 1 段目）。
//! 内部インデックスは `rank * FILE_NB + file` の行優先。

use std::fmt;

/// 筋の数
pub const FILE_NB: usize = 5;
/// 段の数
pub const RANK_NB: usize = 6;
/// 升の数
pub const SQUARE_NB: usize = FILE_NB * RANK_NB;

/// 升目（0..30）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// 筋・段（どちらも 0 始まり）から生成
    #[inline]
    pub const fn new(file: usize, rank: usize) -> Square {
        debug_assert!(file < FILE_NB && rank < RANK_NB);
        Square((rank * FILE_NB + file) as u8)
    }

    /// 盤外なら `None`
    #[inline]
    pub const fn try_new(file: i8, rank: i8) -> Option<Square> {
        if file < 0 || rank < 0 || file >= FILE_NB as i8 || rank >= RANK_NB as i8 {
            return None;
        }
        Some(Square::new(file as usize, rank as usize))
    }

    /// インデックスから生成
    #[inline]
    pub const fn from_index(index: usize) -> Option<Square> {
        if index < SQUARE_NB {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// 筋（0 始まり、a=0）
    #[inline]
    pub const fn file(self) -> usize {
        self.0 as usize % FILE_NB
    }

    /// 段（0 始まり、1 段目=0）
    #[inline]
    pub const fn rank(self) -> usize {
        self.0 as usize / FILE_NB
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 差分 (df, dr) だけ動かした升。盤外なら `None`
    #[inline]
    pub const fn offset(self, df: i8, dr: i8) -> Option<Square> {
        Square::try_new(self.file() as i8 + df, self.rank() as i8 + dr)
    }

    /// 全升を行優先で列挙
    pub fn all() -> impl Iterator<Item = Square> {
        (0..SQUARE_NB).map(|i| Square(i as u8))
    }

    /// `a1` 形式を解釈（大文字小文字は区別しない）
    pub fn parse(token: &str) -> Option<Square> {
        let mut chars = token.chars();
        let (f, r) = (chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        let f = f.to_ascii_lowercase();
        if !('a'..='e').contains(&f) || !('1'..='6').contains(&r) {
            return None;
        }
        Some(Square::new(f as usize - 'a' as usize, r as usize - '1' as usize))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file() as u8) as char, self.rank() + 1)
    }
}
