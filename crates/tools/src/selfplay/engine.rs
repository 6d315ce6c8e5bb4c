use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use minishogi_core::config::EngineConfig;
use minishogi_core::search::{AlphaBetaEngine, Engine, MctsEngine, RandomEngine, TdUcbEngine};
use minishogi_core::types::Color;

/// 対局に使うエンジンの種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    Random,
    AlphaBeta,
    Mcts,
    TdUcb,
}

impl EngineKind {
    pub fn label(self) -> &'static str {
        match self {
            EngineKind::Random => "random",
            EngineKind::AlphaBeta => "alpha-beta",
            EngineKind::Mcts => "mcts",
            EngineKind::TdUcb => "td-ucb",
        }
    }
}

/// 設定ファイル（TOML）を読む。未指定なら既定値
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// 学習結果の保存先 `<data_dir>/<kind>_<side>.txt[.gz]`
///
/// 永続化しないエンジンは `None`。
pub fn knowledge_path(
    kind: EngineKind,
    config: &EngineConfig,
    side: Color,
    data_dir: &Path,
) -> Option<PathBuf> {
    let (stem, compress) = match kind {
        EngineKind::Mcts => ("mcts", config.mcts.compress),
        EngineKind::TdUcb => ("td_ucb", config.td_ucb.compress),
        EngineKind::Random | EngineKind::AlphaBeta => return None,
    };
    let ext = if compress { "txt.gz" } else { "txt" };
    Some(data_dir.join(format!("{stem}_{}.{ext}", side.key())))
}

/// エンジンを生成する。`data_dir` が `Some` なら学習系エンジンは永続化する
pub fn build_engine(
    kind: EngineKind,
    config: &EngineConfig,
    side: Color,
    data_dir: Option<&Path>,
    seed: u64,
) -> Box<dyn Engine> {
    let path = data_dir.and_then(|dir| knowledge_path(kind, config, side, dir));
    match (kind, path) {
        (EngineKind::Random, _) => Box::new(RandomEngine::new(seed)),
        (EngineKind::AlphaBeta, _) => Box::new(AlphaBetaEngine::from_config(&config.alpha_beta)),
        (EngineKind::Mcts, Some(path)) => {
            Box::new(MctsEngine::persistent(&config.mcts, seed, path))
        }
        (EngineKind::Mcts, None) => Box::new(MctsEngine::new(&config.mcts, seed)),
        (EngineKind::TdUcb, Some(path)) => {
            Box::new(TdUcbEngine::persistent(&config.td_ucb, seed, path))
        }
        (EngineKind::TdUcb, None) => Box::new(TdUcbEngine::new(&config.td_ucb, seed)),
    }
}
