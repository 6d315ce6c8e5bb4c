//! minishogi エンジン用のツール群
//!
//! - `selfplay`: エンジン同士の自己対局と学習結果の保存

pub mod selfplay;
