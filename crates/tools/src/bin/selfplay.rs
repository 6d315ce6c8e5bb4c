use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use minishogi_core::position::{Position, SFEN_INITIAL};
use minishogi_core::types::Color;
use serde::Serialize;
use tools::selfplay::{
    EngineKind, GameConfig, GameOutcome, GameResult, build_engine, load_config, run_game,
    side_label,
};

/// minishogi エンジン同士の自己対局。学習系エンジンは 1 局ごとに学習結果を保存する。
///
/// # よく使うコマンド例
///
/// - MCTS 同士で 10 局（学習結果は `data/mcts_bottom.txt.gz` などに保存）:
///   `cargo run -p tools --bin selfplay -- --games 10 --bottom mcts --top mcts`
///
/// - 設定ファイルで探索量を変えて、結果を JSONL に書き出す:
///   `cargo run -p tools --bin selfplay -- --games 4 --bottom alpha-beta --top td-ucb --config engines.toml --out runs/selfplay.jsonl`
#[derive(Parser, Debug)]
#[command(author, version, about = "minishogi selfplay harness (engine vs engine)")]
struct Cli {
    /// Number of games to run
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Maximum plies per game before declaring a draw
    #[arg(long, default_value_t = 200)]
    max_moves: u32,

    /// Engine playing Bottom
    #[arg(long, value_enum, default_value_t = EngineKind::AlphaBeta)]
    bottom: EngineKind,

    /// Engine playing Top
    #[arg(long, value_enum, default_value_t = EngineKind::Mcts)]
    top: EngineKind,

    /// Engine settings (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for persisted knowledge
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Keep learned knowledge in memory only
    #[arg(long, default_value_t = false)]
    transient: bool,

    /// Start position
    #[arg(long, default_value = SFEN_INITIAL)]
    sfen: String,

    /// Random seed (0 = entropy)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write one JSON line per game
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log every move
    #[arg(long, default_value_t = false)]
    log_moves: bool,
}

#[derive(Serialize)]
struct GameRecord<'a> {
    game: u32,
    bottom: &'a str,
    top: &'a str,
    start_sfen: &'a str,
    #[serde(flatten)]
    result: &'a GameResult,
}

#[derive(Default)]
struct Tally {
    bottom: u32,
    top: u32,
    draw: u32,
}

impl Tally {
    fn add(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::BottomWin => self.bottom += 1,
            GameOutcome::TopWin => self.top += 1,
            GameOutcome::Draw => self.draw += 1,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    if cli.games == 0 {
        bail!("--games must be >= 1");
    }

    let config = load_config(cli.config.as_deref())?;
    let start = Position::from_sfen(&cli.sfen)
        .with_context(|| format!("invalid --sfen {:?}", cli.sfen))?;

    let data_dir = (!cli.transient).then_some(cli.data_dir.as_path());
    let bottom_seed = cli.seed;
    let top_seed = if cli.seed == 0 { 0 } else { cli.seed.wrapping_add(1) };
    let bottom = build_engine(cli.bottom, &config, Color::Bottom, data_dir, bottom_seed);
    let top = build_engine(cli.top, &config, Color::Top, data_dir, top_seed);

    let mut out = match &cli.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    let game_cfg = GameConfig {
        max_moves: cli.max_moves,
    };
    let mut tally = Tally::default();
    for game in 1..=cli.games {
        let log_moves = cli.log_moves;
        let result = run_game(bottom.as_ref(), top.as_ref(), &start, &game_cfg, &mut |ev| {
            if log_moves {
                log::info!(
                    "game {game} ply {} {} [{}] {} ({})",
                    ev.ply,
                    side_label(ev.side),
                    ev.engine_label,
                    ev.mv,
                    ev.sfen_before
                );
            }
        })?;
        tally.add(result.outcome);
        log::info!(
            "game {game}/{}: {} by {} after {} plies",
            cli.games,
            result.outcome.label(),
            result.reason,
            result.plies
        );

        for engine in [&bottom, &top] {
            if let Err(e) = engine.save_if_needed() {
                log::warn!("{}: failed to save knowledge: {e}", engine.name());
            }
        }

        if let Some(out) = out.as_mut() {
            let record = GameRecord {
                game,
                bottom: cli.bottom.label(),
                top: cli.top.label(),
                start_sfen: &cli.sfen,
                result: &result,
            };
            serde_json::to_writer(&mut *out, &record)?;
            out.write_all(b"\n")?;
        }
    }
    if let Some(mut out) = out {
        out.flush()?;
    }

    log::info!(
        "{} games: bottom({}) {} / top({}) {} / draw {}",
        cli.games,
        cli.bottom.label(),
        tally.bottom,
        cli.top.label(),
        tally.top,
        tally.draw
    );
    Ok(())
}
