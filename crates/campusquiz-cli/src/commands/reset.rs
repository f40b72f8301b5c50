//! The `campusquiz reset` command.

use std::path::PathBuf;

use anyhow::Result;

use campusquiz_core::model::Permission;

use super::open_and_login;

pub fn execute(
    username: String,
    password: String,
    role: Permission,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut game = open_and_login(config_path.as_deref(), &username, &password, role)?;
    game.reset_stats()?;
    println!("All scores for '{username}' were reset to 0.");
    Ok(())
}
