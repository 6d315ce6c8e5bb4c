//! 局面表現モジュール
//!
//! 5×6 将棋の局面を表現し、手の実行・巻き戻しを行う。
//!
//! - `Position`: 局面本体（盤面配列・手駒・手番）
//! - `UndoInfo`: `do_move_as` が返す差分。`undo_move` に渡すと元の局面に戻る
//! - `MoveGuard`: 差分の巻き戻しをスコープ終了時に必ず行うガード
//! - 局面キー（置換表・学習データのキー）
//! - SFEN 風の局面文字列の解析・出力
//!
//! 手番の交代は `do_move` / `apply_move` では行わない。
//! 探索側が手を試したあとに相手視点で局面を見られるようにするためで、
//! 交代まで行う場合は `play_move` を使う。

mod guard;
mod key;
mod pos;
mod sfen;

pub use guard::{MoveGuard, UndoInfo};
pub use pos::Position;
pub use sfen::{SFEN_INITIAL, SfenError};
