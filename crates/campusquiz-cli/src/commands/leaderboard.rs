//! The `campusquiz leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;

use campusquiz_core::config::load_config_from;
use campusquiz_core::leaderboard::{Leaderboard, RankCategory};
use campusquiz_core::store::ProfileStore;

use super::leaderboard_table;

pub fn execute(
    category: String,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let category: RankCategory = category.parse()?;
    let config = load_config_from(config_path.as_deref())?;
    let limit = limit.unwrap_or(config.leaderboard_size);
    anyhow::ensure!(limit >= 1, "limit must be at least 1");

    let store = ProfileStore::load(&config.profiles_path)?;
    let board = Leaderboard::build(&store, category, limit);

    if board.entries.is_empty() {
        println!("No players yet. Run `campusquiz play` to get on the board.");
        return Ok(());
    }

    println!("{category} (top {limit})");
    println!("{}", leaderboard_table(&board.entries));
    Ok(())
}
