//! The `campusquiz play` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use campusquiz_core::model::{Minigame, Permission};
use campusquiz_core::session::{Finalization, SessionTick};

use super::{leaderboard_table, open_and_login};

enum Input {
    Answer(String),
    Quit,
    Tier(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line == ":quit" {
        Input::Quit
    } else if let Some(level) = line.strip_prefix(":tier") {
        Input::Tier(level.trim().to_string())
    } else {
        Input::Answer(line.to_string())
    }
}

/// Forward stdin lines from a dedicated thread.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

pub async fn execute(
    username: String,
    password: String,
    role: Permission,
    minigame: Minigame,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut game = open_and_login(config_path.as_deref(), &username, &password, role)?;
    let tick_interval = game.config().tick_interval();

    game.start(minigame)
        .with_context(|| format!("could not start a {minigame} round"))?;
    eprintln!("Type your answer and press Enter. `:quit` leaves the round early.");

    let mut input = spawn_stdin_reader();
    let mut ticker = tokio::time::interval(tick_interval);

    let finalization: Option<Finalization> = loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let SessionTick::Finished(fin) = game.tick()? {
                    break Some(fin);
                }
            }
            line = input.recv() => {
                let Some(line) = line else {
                    tracing::debug!("stdin closed, leaving round");
                    break game.leave()?;
                };
                match parse_input(&line) {
                    Input::Quit => break game.leave()?,
                    Input::Tier(level) => {
                        let result = level
                            .parse::<u8>()
                            .map_err(anyhow::Error::from)
                            .and_then(|level| game.force_tier(level).map_err(Into::into));
                        match result {
                            Ok(true) => println!("Difficulty forced to tier {level}."),
                            Ok(false) => println!(
                                "Difficulty forced to tier {level} (warning: could not save)."
                            ),
                            Err(e) => eprintln!("Cannot change tier: {e}"),
                        }
                    }
                    Input::Answer(answer) if answer.is_empty() => {}
                    Input::Answer(answer) => {
                        game.submit(&answer)?;
                    }
                }
            }
        }
    };

    match finalization {
        Some(fin) => {
            println!("Total score: {}", fin.total_score);
            if !fin.saved {
                eprintln!("Warning: results could not be saved; they are kept for this session only.");
            }
        }
        None => println!("Left without scoring; nothing was saved."),
    }

    let board = &game.leaderboards().minigame;
    println!("\n{minigame} leaderboard");
    println!("{}", leaderboard_table(&board.entries));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_recognised() {
        assert!(matches!(parse_input(" :quit "), Input::Quit));
        assert!(matches!(parse_input(":tier 3"), Input::Tier(level) if level == "3"));
        assert!(matches!(parse_input("Paris\n"), Input::Answer(a) if a == "Paris"));
    }
}
