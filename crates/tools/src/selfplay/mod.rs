//! エンジン同士の自己対局

pub mod engine;
pub mod game;

pub use engine::{EngineKind, build_engine, knowledge_path, load_config};
pub use game::{GameConfig, GameOutcome, GameResult, MoveEvent, run_game, side_label};
