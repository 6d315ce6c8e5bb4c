//! 指し手（Move）
//!
//! 棋譜表記:
//! - 盤上の移動: `<筋><段><筋><段>`、成る場合は末尾に `+`（例: `b3b4`, `c5c6+`）
//! - 駒打ち: `<駒文字>@<筋><段>`（例: `P@a5`）
//!
//! 表記は 1 手につき 1 通りで、学習データのキーとしても使うため変更しないこと。

use std::fmt;
use std::str::FromStr;

use super::{PieceType, Square};

/// 指し手
///
/// 盤上の移動か駒打ちのどちらか一方。合法性は適用する局面に依存する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// 盤上の移動
    Normal {
        from: Square,
        to: Square,
        promote: bool,
    },
    /// 駒打ち
    Drop { piece_type: PieceType, to: Square },
}

impl Move {
    /// 移動の指し手を生成
    #[inline]
    pub const fn new_move(from: Square, to: Square, promote: bool) -> Move {
        Move::Normal { from, to, promote }
    }

    /// 駒打ちの指し手を生成
    #[inline]
    pub const fn new_drop(piece_type: PieceType, to: Square) -> Move {
        Move::Drop { piece_type, to }
    }

    /// 移動先
    #[inline]
    pub const fn to(self) -> Square {
        match self {
            Move::Normal { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    /// 移動元（駒打ちなら `None`）
    #[inline]
    pub const fn from(self) -> Option<Square> {
        match self {
            Move::Normal { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }

    /// 駒打ちか
    #[inline]
    pub const fn is_drop(self) -> bool {
        matches!(self, Move::Drop { .. })
    }

    /// 打つ駒種（移動なら `None`）
    #[inline]
    pub const fn drop_piece_type(self) -> Option<PieceType> {
        match self {
            Move::Drop { piece_type, .. } => Some(piece_type),
            Move::Normal { .. } => None,
        }
    }

    /// 成りか
    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self, Move::Normal { promote: true, .. })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Normal { from, to, promote } => {
                write!(f, "{from}{to}")?;
                if promote {
                    f.write_str("+")?;
                }
                Ok(())
            }
            Move::Drop { piece_type, to } => write!(f, "{}@{to}", piece_type.letter()),
        }
    }
}

/// 指し手表記の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    #[error("empty input")]
    Empty,
    #[error("drop format P@a3, got {0:?}")]
    DropFormat(String),
    #[error("unknown piece for drop: {0:?}")]
    UnknownPiece(String),
    #[error("move format a1a2 or a1a2+, got {0:?}")]
    MoveFormat(String),
    #[error("invalid square {0:?} (files a-e, ranks 1-6)")]
    Square(String),
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(input: &str) -> Result<Move, MoveParseError> {
        let s: String = input
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if s.is_empty() {
            return Err(MoveParseError::Empty);
        }

        if let Some((piece, square)) = s.split_once('@') {
            let mut chars = piece.chars();
            let (Some(letter), None) = (chars.next(), chars.next()) else {
                return Err(MoveParseError::DropFormat(input.to_string()));
            };
            let piece_type = PieceType::from_letter(letter)
                .ok_or_else(|| MoveParseError::UnknownPiece(piece.to_string()))?;
            let to = parse_square(square)?;
            return Ok(Move::new_drop(piece_type, to));
        }

        let (body, promote) = match s.strip_suffix('+') {
            Some(body) => (body, true),
            None => (s.as_str(), false),
        };
        if body.len() != 4 || !body.is_ascii() {
            return Err(MoveParseError::MoveFormat(input.to_string()));
        }
        let from = parse_square(&body[..2])?;
        let to = parse_square(&body[2..])?;
        Ok(Move::new_move(from, to, promote))
    }
}

fn parse_square(token: &str) -> Result<Square, MoveParseError> {
    Square::parse(token).ok_or_else(|| MoveParseError::Square(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_display() {
        let mv = Move::new_move(Square::new(1, 2), Square::new(1, 3), false);
        assert_eq!(mv.to_string(), "b3b4");
        let mv = Move::new_move(Square::new(2, 4), Square::new(2, 5), true);
        assert_eq!(mv.to_string(), "c5c6+");
        let mv = Move::new_drop(PieceType::Pawn, Square::new(0, 4));
        assert_eq!(mv.to_string(), "P@a5");
    }

    #[test]
    fn test_move_parse() {
        assert_eq!(
            "b3b4".parse::<Move>(),
            Ok(Move::new_move(Square::new(1, 2), Square::new(1, 3), false))
        );
        assert_eq!(
            " C5 C6+ ".parse::<Move>(),
            Ok(Move::new_move(Square::new(2, 4), Square::new(2, 5), true))
        );
        assert_eq!(
            "s@e2".parse::<Move>(),
            Ok(Move::new_drop(PieceType::Silver, Square::new(4, 1)))
        );
    }

    #[test]
    fn test_move_parse_errors() {
        assert_eq!("".parse::<Move>(), Err(MoveParseError::Empty));
        assert!(matches!("PP@a1".parse::<Move>(), Err(MoveParseError::DropFormat(_))));
        assert!(matches!("X@a1".parse::<Move>(), Err(MoveParseError::UnknownPiece(_))));
        assert!(matches!("a1a".parse::<Move>(), Err(MoveParseError::MoveFormat(_))));
        assert!(matches!("a1f1".parse::<Move>(), Err(MoveParseError::Square(_))));
        assert!(matches!("P@a9".parse::<Move>(), Err(MoveParseError::Square(_))));
    }

    #[test]
    fn test_move_accessors() {
        let drop = Move::new_drop(PieceType::Gold, Square::new(3, 3));
        assert!(drop.is_drop());
        assert_eq!(drop.from(), None);
        assert_eq!(drop.drop_piece_type(), Some(PieceType::Gold));
        let mv = Move::new_move(Square::new(0, 0), Square::new(0, 1), true);
        assert!(mv.is_promotion());
        assert_eq!(mv.from(), Some(Square::new(0, 0)));
        assert_eq!(mv.to(), Square::new(0, 1));
    }
}
