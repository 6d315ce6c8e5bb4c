use anyhow::{Context, Result, bail};
use clap::Parser;
use minishogi_core::mate::mate_search;
use minishogi_core::position::Position;
use minishogi_core::types::Color;

/// 局面文字列を受け取り、指定手数以内の詰み手順を探す。
///
/// 例: `cargo run -p tools --bin mate_search -- --sfen "k4/2G2/1S3/5/5/4K b P" --plies 3`
#[derive(Parser, Debug)]
#[command(author, version, about = "Forced mate search for minishogi positions")]
struct Cli {
    /// Position text (`<board> <b|w> <hand>`)
    #[arg(long)]
    sfen: String,

    /// Attacking side (`b` or `w`); defaults to the side to move
    #[arg(long)]
    attacker: Option<String>,

    /// Ply limit
    #[arg(long, default_value_t = 3)]
    plies: i32,
}

fn parse_color(s: &str) -> Result<Color> {
    match s {
        "b" | "bottom" => Ok(Color::Bottom),
        "w" | "top" => Ok(Color::Top),
        other => bail!("unknown side {other:?} (expected b or w)"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let pos =
        Position::from_sfen(&cli.sfen).with_context(|| format!("invalid --sfen {:?}", cli.sfen))?;
    let attacker = match cli.attacker.as_deref() {
        Some(s) => parse_color(s)?,
        None => pos.side_to_move(),
    };

    log::info!("searching mate for {} within {} plies", attacker.label(), cli.plies);
    match mate_search(&pos, attacker, cli.plies) {
        Some(line) => {
            let line: Vec<String> = line.iter().map(ToString::to_string).collect();
            println!("mate {} {}", line.len(), line.join(" "));
        }
        None => println!("nomate"),
    }
    Ok(())
}
