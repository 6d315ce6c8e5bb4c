//! 学習データ（知識）の永続化
//!
//! MCTS と TD-UCB が学習した表を 1 行 1 レコードのテキストとして保存する。
//!
//! 読み込みは 3 種類の形式を受け付ける（`detect_format` で先頭バイトから判定）。
//!
//! - gzip 圧縮（マジックバイト `1F 8B`）。展開後の内容を改めて判定する
//! - 旧形式の JSON オブジェクト（先頭が `{`）
//! - 現行の行形式
//!
//! 書き込みは常に現行の行形式（必要なら gzip）で、一時ファイルに書いてから
//! rename する。
//!
//! 各ストアは表を `parking_lot::Mutex` の内側に持ち、表そのものは公開しない。

mod error;
mod file;
mod mcts;
mod td;

pub use error::KnowledgeError;
pub use file::{KnowledgeFile, KnowledgeFormat, KnowledgeText, detect_format};
pub use mcts::{MctsKnowledge, MoveStats, decode_mcts, encode_mcts};
pub use td::{
    TD_RECORD_MOVE, TD_RECORD_STATE, TdKnowledge, TdMoveStat, TdSession, TdTables, decode_td,
    encode_td,
};
