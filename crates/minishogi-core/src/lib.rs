//! # minishogi-core
//!
//! 5 筋 × 6 段の小型将棋のルールエンジンと、その上に載る指し手決定エンジン群。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, PieceType, Piece, Square, Hand, Move, Bound）
//! - `position`: 局面表現、do_move/undo_move、局面キー、SFEN 風テキスト
//! - `movegen`: 利きと王手判定、合法手生成、詰み判定
//! - `eval`: 駒割り評価
//! - `tt`: 置換表
//! - `search`: エンジン（ランダム / αβ / MCTS / TD-UCB）
//! - `mate`: 詰み探索
//! - `knowledge`: 学習結果のテキスト形式と永続化
//! - `config`: エンジン設定
//!
//! ロガーの初期化は行わない（`log` クレート経由で出力するだけ）。

// 基本型
pub mod types;

// 盤面表現
pub mod position;

// 合法手生成
pub mod movegen;

// 評価・置換表
pub mod eval;
pub mod tt;

// 探索
pub mod mate;
pub mod search;

// 永続化・設定
pub mod config;
pub mod knowledge;

pub use config::EngineConfig;
pub use position::Position;
pub use search::{AlphaBetaEngine, Engine, EngineError, MctsEngine, RandomEngine, TdUcbEngine};
pub use types::{Color, Move, PieceType};
