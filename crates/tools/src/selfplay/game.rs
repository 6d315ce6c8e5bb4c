use anyhow::{Context, Result};
use minishogi_core::movegen::{checkmate_status, generate_legal};
use minishogi_core::position::Position;
use minishogi_core::search::Engine;
use minishogi_core::types::Color;
use serde::Serialize;

/// ゲーム設定
pub struct GameConfig {
    /// この手数に達したら引き分け
    pub max_moves: u32,
}

/// 1手ごとに呼ばれるイベント
pub struct MoveEvent<'a> {
    pub ply: u32,
    pub side: Color,
    pub sfen_before: String,
    pub mv: String,
    pub engine_label: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    BottomWin,
    TopWin,
    Draw,
}

impl GameOutcome {
    pub fn label(self) -> &'static str {
        match self {
            GameOutcome::BottomWin => "bottom_win",
            GameOutcome::TopWin => "top_win",
            GameOutcome::Draw => "draw",
        }
    }

    fn win_for(color: Color) -> GameOutcome {
        match color {
            Color::Bottom => GameOutcome::BottomWin,
            Color::Top => GameOutcome::TopWin,
        }
    }
}

pub fn side_label(color: Color) -> char {
    if color == Color::Bottom { 'b' } else { 'w' }
}

/// 対局結果
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub outcome: GameOutcome,
    pub reason: String,
    pub plies: u32,
    pub moves: Vec<String>,
}

/// 1局を実行する。
///
/// - `bottom`, `top`: 各手番のエンジン
/// - `start`: 開始局面（手番は局面に従う）
/// - `on_move`: 1手ごとに呼ばれるコールバック
///
/// 終局判定は手を求める前に行う。詰みなら相手の勝ち、詰みでない手詰まりと
/// 手数上限は引き分け。エンジンが手を返せなければエラーで中断する。
pub fn run_game(
    bottom: &dyn Engine,
    top: &dyn Engine,
    start: &Position,
    config: &GameConfig,
    on_move: &mut dyn FnMut(&MoveEvent<'_>),
) -> Result<GameResult> {
    let mut pos = start.clone();
    let mut moves = Vec::new();
    let mut plies = 0u32;

    let (outcome, reason) = loop {
        if let Some(winner) = checkmate_status(&pos) {
            break (GameOutcome::win_for(winner), "checkmate".to_string());
        }
        let side = pos.side_to_move();
        if generate_legal(&pos, side).is_empty() {
            break (GameOutcome::Draw, "no_legal_moves".to_string());
        }
        if plies >= config.max_moves {
            break (GameOutcome::Draw, "max_moves".to_string());
        }

        let engine = match side {
            Color::Bottom => bottom,
            Color::Top => top,
        };
        let mv = engine.next_move(&pos).with_context(|| {
            format!(
                "{} failed at ply {} ({})",
                engine.name(),
                plies + 1,
                pos.to_sfen()
            )
        })?;

        let event = MoveEvent {
            ply: plies + 1,
            side,
            sfen_before: pos.to_sfen(),
            mv: mv.to_string(),
            engine_label: engine.name(),
        };
        on_move(&event);

        moves.push(event.mv);
        pos.play_move(mv);
        plies += 1;
    };

    Ok(GameResult {
        outcome,
        reason,
        plies,
        moves,
    })
}
