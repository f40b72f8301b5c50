pub mod init;
pub mod leaderboard;
pub mod play;
pub mod reset;
pub mod students;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use campusquiz_core::clock::TimeRemaining;
use campusquiz_core::config::load_config_from;
use campusquiz_core::engine::{Game, GameObserver};
use campusquiz_core::leaderboard::LeaderboardEntry;
use campusquiz_core::model::Permission;

/// Prints game events to the terminal.
pub(crate) struct ConsoleObserver;

impl GameObserver for ConsoleObserver {
    fn on_question(&self, text: &str) {
        println!("\nQ: {text}");
    }

    fn on_feedback(&self, correct: bool, expected_answer: Option<&str>) {
        match (correct, expected_answer) {
            (true, _) => println!("Correct!"),
            (false, Some(answer)) => println!("Incorrect. The answer was: {answer}"),
            (false, None) => println!("Incorrect."),
        }
    }

    fn on_time_remaining(&self, remaining: TimeRemaining) {
        if remaining.centis == 0 {
            eprintln!("  [{}s left]", remaining.seconds);
        }
    }

    fn on_finished(&self, final_score: u32) {
        println!("\nRound over! Final score: {final_score}");
    }

    fn on_new_user(&self, username: &str) {
        println!("Created new account '{username}'.");
    }

    fn on_login_result(&self, success: bool, reason: Option<&str>) {
        if !success {
            eprintln!("Login rejected: {}", reason.unwrap_or("unknown reason"));
        }
    }
}

/// Load config, open the game data and log the player in.
pub(crate) fn open_and_login(
    config_path: Option<&Path>,
    username: &str,
    password: &str,
    role: Permission,
) -> Result<Game> {
    let config = load_config_from(config_path)?;
    let mut game =
        Game::open(config, Arc::new(ConsoleObserver)).context("failed to load game data")?;
    let outcome = game.login(username, password, role)?;
    anyhow::ensure!(outcome.is_success(), "login failed for '{username}'");
    Ok(game)
}

pub(crate) fn leaderboard_table(entries: &[LeaderboardEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Username", "Score"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&entry.username),
            Cell::new(entry.score),
        ]);
    }
    table
}
