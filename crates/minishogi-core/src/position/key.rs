//! 局面キー
//!
//! 置換表・学習データの索引に使う決定的な文字列。
//! 盤面は 1 段目から行優先で走査し、空升は `.`、駒は 3 桁の数字で表す。
//! 手駒は駒種の固定順（玉・金・銀・歩）で全枚数を並べる。
//!
//! 3 種類の形式があり、どれも一度永続化されたデータと互換を保つ必要がある。
//!
//! | 関数 | 用途 | 形式 |
//! |------|------|------|
//! | `board_key` | 置換表 | 駒=種別・手番・成、段末 `/`、`|` のあと `{色}{種別}{枚数},` |
//! | `key` | MCTS 知識 | 先頭に手番、駒=手番・種別・成、手番ごとに `|{枚数},...` |
//! | `td_key` | TD 知識 | `board_key` + `#` + 手番 |

use std::fmt::Write;

use crate::types::{Color, FILE_NB, PieceType, RANK_NB, SQUARE_NB, Square};

use super::pos::Position;

#[inline]
fn digit(n: usize) -> char {
    char::from(b'0' + n as u8)
}

impl Position {
    /// 盤面と手駒のキー（手番を含まない）
    pub fn board_key(&self) -> String {
        let mut out = String::with_capacity(SQUARE_NB * 3 + RANK_NB + 40);
        for rank in 0..RANK_NB {
            for file in 0..FILE_NB {
                match self.piece_on(Square::new(file, rank)) {
                    None => out.push('.'),
                    Some(p) => {
                        out.push(digit(p.piece_type.index()));
                        out.push(digit(p.color.index()));
                        out.push(if p.promoted { '1' } else { '0' });
                    }
                }
            }
            out.push('/');
        }
        out.push('|');
        for color in Color::ALL {
            let hand = self.hand(color);
            for pt in PieceType::ALL {
                let _ = write!(out, "{}{}{},", color.index(), pt.index(), hand.count(pt));
            }
        }
        out
    }

    /// 手番込みの局面キー
    pub fn key(&self) -> String {
        let mut out = String::with_capacity(SQUARE_NB * 3 + 32);
        out.push(digit(self.side_to_move().index()));
        for sq in Square::all() {
            match self.piece_on(sq) {
                None => out.push('.'),
                Some(p) => {
                    out.push(digit(p.color.index()));
                    out.push(digit(p.piece_type.index()));
                    out.push(if p.promoted { '1' } else { '0' });
                }
            }
        }
        for color in Color::ALL {
            out.push('|');
            let hand = self.hand(color);
            for pt in PieceType::ALL {
                let _ = write!(out, "{},", hand.count(pt));
            }
        }
        out
    }

    /// `board_key` に手番を付けたキー
    pub fn td_key(&self) -> String {
        let mut out = self.board_key();
        out.push('#');
        out.push(digit(self.side_to_move().index()));
        out
    }
}
