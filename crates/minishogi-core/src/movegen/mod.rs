//! 合法手生成モジュール
//!
//! - `attacks`: 駒の利き（移動パターン）と王手判定
//! - `generator`: 合法手・合法駒打ちの列挙、詰み判定
//!
//! 候補手は局面をその場で変更して自玉の安全と行き所の有無を確認し、
//! `MoveGuard` によって必ず巻き戻す。局面の複製は 1 回の生成につき 1 回だけ。

mod attacks;
mod generator;

pub use attacks::{has_board_reach, in_check, movement_offsets};
pub use generator::{
    can_promote, checkmate_status, find_legal, generate_legal, in_promotion_zone, is_checkmate,
    legal_drops, legal_moves_from,
};
