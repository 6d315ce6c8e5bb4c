//! SFEN 風の局面文字列の解析・出力
//!
//! 形式: `<盤面> <手番> <手駒>`
//!
//! - 盤面は 6 段目から 1 段目の順に `/` 区切り、各段は a 筋から e 筋へ
//! - 大文字が Bottom、小文字が Top、`+` は成駒、数字は連続する空升
//! - 手番は `b`（Bottom）/ `w`（Top）
//! - 手駒は `2Pg` のように枚数と駒文字、無ければ `-`

use thiserror::Error;

use crate::types::{Color, FILE_NB, Piece, PieceType, RANK_NB, Square};

use super::pos::Position;

/// 初期局面の文字列
pub const SFEN_INITIAL: &str = "sgkgs/5/1ppp1/1PPP1/5/SGKGS b -";

/// 局面文字列の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SfenError {
    #[error("Invalid board: {0}")]
    Board(String),
    #[error("Invalid side to move: {0}")]
    SideToMove(String),
    #[error("Invalid hand: {0}")]
    Hand(String),
}

impl Position {
    /// 局面文字列から局面を生成
    pub fn from_sfen(sfen: &str) -> Result<Position, SfenError> {
        let parts: Vec<&str> = sfen.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(SfenError::Board(
                "SFEN must have at least board and side to move".to_string(),
            ));
        }

        let mut pos = Position::empty(Color::Bottom);
        pos.parse_board(parts[0])?;

        let side = match parts[1] {
            "b" => Color::Bottom,
            "w" => Color::Top,
            other => {
                return Err(SfenError::SideToMove(format!("Expected 'b' or 'w', got '{other}'")));
            }
        };
        pos.set_side_to_move(side);

        if let Some(hand) = parts.get(2) {
            pos.parse_hand(hand)?;
        }
        Ok(pos)
    }

    /// 現局面の文字列
    pub fn to_sfen(&self) -> String {
        let mut result = String::new();
        for rank in (0..RANK_NB).rev() {
            let mut empty = 0;
            for file in 0..FILE_NB {
                match self.piece_on(Square::new(file, rank)) {
                    None => empty += 1,
                    Some(pc) => {
                        if empty > 0 {
                            result.push_str(&empty.to_string());
                            empty = 0;
                        }
                        push_piece(&mut result, pc);
                    }
                }
            }
            if empty > 0 {
                result.push_str(&empty.to_string());
            }
            if rank > 0 {
                result.push('/');
            }
        }

        result.push(' ');
        result.push(match self.side_to_move() {
            Color::Bottom => 'b',
            Color::Top => 'w',
        });

        result.push(' ');
        let mut hand = String::new();
        for color in Color::ALL {
            for (pt, count) in self.hand(color).iter() {
                if count > 1 {
                    hand.push_str(&count.to_string());
                }
                hand.push(letter_for(color, pt));
            }
        }
        if hand.is_empty() {
            result.push('-');
        } else {
            result.push_str(&hand);
        }
        result
    }

    fn parse_board(&mut self, board: &str) -> Result<(), SfenError> {
        let ranks: Vec<&str> = board.split('/').collect();
        if ranks.len() != RANK_NB {
            return Err(SfenError::Board(format!(
                "Expected {RANK_NB} ranks, got {}",
                ranks.len()
            )));
        }

        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = RANK_NB - 1 - row;
            let mut file = 0usize;
            let mut promoted = false;
            for c in rank_str.chars() {
                if c == '+' {
                    promoted = true;
                    continue;
                }
                if let Some(n) = c.to_digit(10) {
                    file += n as usize;
                    if file > FILE_NB {
                        return Err(SfenError::Board(format!(
                            "Too many squares in rank {}",
                            rank + 1
                        )));
                    }
                    continue;
                }
                if file >= FILE_NB {
                    return Err(SfenError::Board(format!("Too many pieces in rank {}", rank + 1)));
                }
                let pc = char_to_piece(c, promoted)?;
                self.put_piece(Square::new(file, rank), pc);
                promoted = false;
                file += 1;
            }
            if promoted || file != FILE_NB {
                return Err(SfenError::Board(format!(
                    "Rank {} has wrong number of squares",
                    rank + 1
                )));
            }
        }
        Ok(())
    }

    fn parse_hand(&mut self, hand: &str) -> Result<(), SfenError> {
        if hand == "-" {
            return Ok(());
        }
        let mut count = 0u32;
        for c in hand.chars() {
            if let Some(d) = c.to_digit(10) {
                count = count
                    .checked_mul(10)
                    .and_then(|c| c.checked_add(d))
                    .ok_or_else(|| SfenError::Hand(format!("Count too large in '{hand}'")))?;
                continue;
            }
            let color = if c.is_ascii_uppercase() { Color::Bottom } else { Color::Top };
            let pt = PieceType::from_letter(c)
                .filter(|&pt| pt != PieceType::King)
                .ok_or_else(|| SfenError::Hand(format!("Unknown hand piece: {c}")))?;
            let n = if count == 0 { 1 } else { count };
            let total = self
                .hand(color)
                .count(pt)
                .checked_add(n)
                .and_then(|total| u8::try_from(total).ok())
                .ok_or_else(|| SfenError::Hand(format!("Too many pieces: {n}{c}")))?;
            self.set_hand_count(color, pt, total);
            count = 0;
        }
        if count != 0 {
            return Err(SfenError::Hand(format!("Dangling count in '{hand}'")));
        }
        Ok(())
    }
}

fn letter_for(color: Color, pt: PieceType) -> char {
    match color {
        Color::Bottom => pt.letter(),
        Color::Top => pt.letter().to_ascii_lowercase(),
    }
}

fn push_piece(out: &mut String, pc: Piece) {
    if pc.promoted {
        out.push('+');
    }
    out.push(letter_for(pc.color, pc.piece_type));
}

fn char_to_piece(c: char, promoted: bool) -> Result<Piece, SfenError> {
    let color = if c.is_ascii_uppercase() { Color::Bottom } else { Color::Top };
    let pt = PieceType::from_letter(c)
        .ok_or_else(|| SfenError::Board(format!("Unknown piece: {c}")))?;
    if !promoted {
        return Ok(Piece::new(color, pt));
    }
    if !pt.is_promotable() {
        return Err(SfenError::Board(format!("Cannot promote: {c}")));
    }
    Ok(Piece::new_promoted(color, pt))
}
