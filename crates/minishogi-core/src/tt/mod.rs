//! 置換表（Transposition Table）
//!
//! キーは (盤面キー, 手番, 評価側)。評価側を含むため、同じ局面でも
//! 探索開始側が異なるとエントリは共有されない。
//!
//! エンジンのインスタンスごとに 1 つ持ち、`next_move` の呼び出しをまたいで保持する。
//! 永続化はしない。

mod entry;
mod table;

pub use entry::{TtEntry, TtKey};
pub use table::TranspositionTable;
