//! エンジン設定
//!
//! TOML から読み込めるよう serde に対応する。省略された項目は既定値になる。
//!
//! ```toml
//! [alpha_beta]
//! depth = 3
//!
//! [mcts]
//! iterations = 800
//! exploration = 1.2
//!
//! [td_ucb]
//! simulations = 300
//! persist_move_stats = false
//! ```

use serde::{Deserialize, Serialize};

/// 全エンジンの設定
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub alpha_beta: AlphaBetaConfig,
    pub mcts: MctsConfig,
    pub td_ucb: TdUcbConfig,
}

/// αβ探索の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaBetaConfig {
    /// 探索深さ（1 未満は 1 として扱う）
    pub depth: u32,
}

impl Default for AlphaBetaConfig {
    fn default() -> Self {
        Self { depth: 3 }
    }
}

/// MCTS の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// 1 手あたりの反復回数（0 は既定値）
    pub iterations: u32,
    /// UCB1 の探索係数
    pub exploration: f64,
    /// ロールアウトの最大手数
    pub rollout_depth: u32,
    /// 知識ファイルを gzip で保存する
    pub compress: bool,
}

impl MctsConfig {
    pub const DEFAULT_ITERATIONS: u32 = 800;

    /// 実際に使う反復回数
    pub fn effective_iterations(&self) -> u32 {
        if self.iterations == 0 {
            Self::DEFAULT_ITERATIONS
        } else {
            self.iterations
        }
    }
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            exploration: 1.2,
            rollout_depth: 60,
            compress: true,
        }
    }
}

/// TD-UCB の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TdUcbConfig {
    /// 1 手あたりのシミュレーション回数
    pub simulations: u32,
    /// シミュレーションの最大手数
    pub rollout_depth: u32,
    /// 学習率
    pub alpha: f64,
    /// 割引率
    pub gamma: f64,
    /// UCB1 の探索係数
    pub exploration: f64,
    /// 手ごとの統計も保存する
    pub persist_move_stats: bool,
    /// 知識ファイルを gzip で保存する
    pub compress: bool,
}

impl Default for TdUcbConfig {
    fn default() -> Self {
        Self {
            simulations: 300,
            rollout_depth: 40,
            alpha: 0.4,
            gamma: 0.95,
            exploration: 0.9,
            persist_move_stats: false,
            compress: false,
        }
    }
}
