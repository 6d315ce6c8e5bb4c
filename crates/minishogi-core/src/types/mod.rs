//! 基本型モジュール
//!
//! 5×6 将棋で使用する基本的な型を定義する。
//!
//! # 型の依存関係
//!
//! ```text
//! Color
//!   ↓
//! Square
//!   ↓
//! PieceType
//!   ↓
//! Piece ← Move
//!   ↓
//! Hand
//!
//! Bound は独立
//! ```

mod bound;
mod color;
mod hand;
mod moves;
mod piece;
mod piece_type;
mod square;

pub use bound::Bound;
pub use color::Color;
pub use hand::Hand;
pub use moves::{Move, MoveParseError};
pub use piece::Piece;
pub use piece_type::PieceType;
pub use square::{FILE_NB, RANK_NB, SQUARE_NB, Square};
