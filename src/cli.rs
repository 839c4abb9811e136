use ai_shorts_maker::config::SessionConfig;
use ai_shorts_maker::render::TextRenderer;
use ai_shorts_maker::scan;
use ai_shorts_maker::snapshot::OrderSnapshot;
use ai_shorts_maker::{Command, Mode, Session, SortKey};
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::io::Stdout;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

const USAGE: &str = "usage: ai-shorts-cli <dir> [--config <file>]";

enum Line {
    Apply(Command),
    Add(PathBuf),
    Snapshot,
    Show,
    Quit,
}

fn command_regex() -> Result<&'static Regex> {
    static CMD_RE: OnceCell<Regex> = OnceCell::new();
    CMD_RE.get_or_try_init(|| {
        Regex::new(r"^\s*(?i:(move|pos|remove|add|restore|by))\s+(.+?)\s*$")
            .context("failed to compile command regex")
    })
}

fn pair_regex() -> Result<&'static Regex> {
    static PAIR_RE: OnceCell<Regex> = OnceCell::new();
    PAIR_RE.get_or_try_init(|| {
        Regex::new(r"^(\d+)\s*(?:->|\s)\s*(\S+)$").context("failed to compile pair regex")
    })
}

/// Ranks typed at the prompt are 1-based; rank 0 maps past the end so the
/// engine ignores it.
fn rank_to_index(rank: &str) -> Result<usize> {
    let rank: usize = rank.parse().with_context(|| format!("not a rank: {rank}"))?;
    Ok(rank.checked_sub(1).unwrap_or(usize::MAX))
}

fn parse_line(line: &str) -> Result<Option<Line>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "reset" => return Ok(Some(Line::Apply(Command::Reset))),
        "original" => return Ok(Some(Line::Apply(Command::RestoreSubmissionOrder))),
        "snapshot" => return Ok(Some(Line::Snapshot)),
        "show" => return Ok(Some(Line::Show)),
        "quit" | "exit" => return Ok(Some(Line::Quit)),
        word => {
            if let Ok(mode) = word.parse::<Mode>() {
                return Ok(Some(Line::Apply(Command::SetMode(mode))));
            }
        }
    }

    let Some(caps) = command_regex()?.captures(trimmed) else {
        anyhow::bail!("unknown command: {trimmed}");
    };
    let verb = caps[1].to_ascii_lowercase();
    let rest = &caps[2];

    let cmd = match verb.as_str() {
        "add" => return Ok(Some(Line::Add(PathBuf::from(rest)))),
        "restore" => Command::Restore(OrderSnapshot::from_json(rest)?),
        "remove" => Command::Remove(rank_to_index(rest)?),
        "by" => Command::SetSortKey(rest.parse::<SortKey>()?),
        "move" | "pos" => {
            let Some(pair) = pair_regex()?.captures(rest) else {
                anyhow::bail!("expected two values: {verb} <rank> <value>");
            };
            let index = rank_to_index(&pair[1])?;
            if verb == "move" {
                Command::Move {
                    source: index,
                    target: rank_to_index(&pair[2])?,
                }
            } else {
                Command::SetPosition {
                    index,
                    requested: pair[2].to_string(),
                }
            }
        }
        _ => anyhow::bail!("unknown command: {trimmed}"),
    };
    Ok(Some(Line::Apply(cmd)))
}

async fn add_dir(session: &mut Session<TextRenderer<Stdout>>, dir: &Path) -> Result<()> {
    let candidates = scan::load_dir(dir).await?;
    if let Ok(cwd) = std::env::current_dir() {
        println!("adding {}", scan::display_relative(dir, &cwd));
    }
    session.dispatch(Command::Admit(candidates));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut dir: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context(USAGE)?;
                config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => dir = Some(PathBuf::from(arg)),
        }
    }
    let dir = dir.context(USAGE)?;

    let config = match config_path {
        Some(path) => SessionConfig::load(&path).await?,
        None => SessionConfig::default(),
    };

    let mut session = Session::new(&config, TextRenderer::new(std::io::stdout()));
    add_dir(&mut session, &dir).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Line::Quit)) => break,
            Ok(Some(Line::Show)) => session.render_now(),
            Ok(Some(Line::Snapshot)) => println!("{}", session.store().snapshot().to_json()?),
            Ok(Some(Line::Add(path))) => {
                if let Err(err) = add_dir(&mut session, &path).await {
                    eprintln!("[ERROR] {err:#}");
                }
            }
            Ok(Some(Line::Apply(cmd))) => {
                if session.dispatch(cmd) == 0 {
                    println!("(no change)");
                }
            }
            Err(err) => eprintln!("[ERROR] {err:#}"),
        }
    }

    Ok(())
}
