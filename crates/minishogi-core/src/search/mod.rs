//! 指し手決定エンジン
//!
//! すべてのエンジンは `Engine` を実装し、手番側の合法手を 1 つ返す。
//!
//! | エンジン | 内容 | 並行呼び出し |
//! |----------|------|--------------|
//! | `RandomEngine` | 合法手から一様に選ぶ | 可 |
//! | `AlphaBetaEngine` | 置換表つき固定深さαβ | 不可（`!Sync`） |
//! | `MctsEngine` | UCB1 + ランダムロールアウト、知識の永続化 | 可（探索本体はロックを持たない） |
//! | `TdUcbEngine` | TD(0) 学習 + UCB1 シミュレーション | 可（呼び出し全体を直列化） |

mod alpha_beta;
mod mcts;
mod random;
mod td_ucb;

pub use alpha_beta::AlphaBetaEngine;
pub use mcts::MctsEngine;
pub use random::RandomEngine;
pub use td_ucb::{ProfileMetric, TdUcbEngine, TdUcbProfile};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use thiserror::Error;

use crate::knowledge::KnowledgeError;
use crate::position::Position;
use crate::types::Move;

/// エンジンのエラー
#[derive(Debug, Error)]
pub enum EngineError {
    /// 手番側に合法手がない（終局判定は呼び出し側の責任）
    #[error("no legal moves to play")]
    NoLegalMoves,

    /// 合法手はあるが選べなかった
    #[error("failed to choose a move")]
    SearchFailed,

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

/// 指し手決定エンジンの共通インターフェース
pub trait Engine: Send {
    /// エンジン名（ログ用）
    fn name(&self) -> &'static str;

    /// 手番側の指し手を 1 つ選ぶ
    fn next_move(&self, pos: &Position) -> Result<Move, EngineError>;

    /// 未保存の学習結果があれば保存する
    fn save_if_needed(&self) -> Result<(), EngineError> {
        Ok(())
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn next_move(&self, pos: &Position) -> Result<Move, EngineError> {
        (**self).next_move(pos)
    }

    fn save_if_needed(&self) -> Result<(), EngineError> {
        (**self).save_if_needed()
    }
}

/// シードから乱数生成器を作る。0 ならエントロピーから
pub(crate) fn seeded_rng(seed: u64) -> Xoshiro256PlusPlus {
    let seed = if seed == 0 { rand::random::<u64>() } else { seed };
    Xoshiro256PlusPlus::seed_from_u64(seed)
}
