//! The `campusquiz students` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use campusquiz_core::model::Permission;
use campusquiz_report::html::write_html_report;

use super::{leaderboard_table, open_and_login};

pub fn execute(
    username: String,
    password: String,
    role: Permission,
    search: Option<String>,
    html: Option<PathBuf>,
    json: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let game = open_and_login(config_path.as_deref(), &username, &password, role)?;
    let progress = game.class_progress(search.as_deref())?;

    if progress.rows.is_empty() {
        println!("No players match.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Username", "Role", "Total", "Middlesex", "Level"]);
        for row in &progress.rows {
            table.add_row(vec![
                Cell::new(&row.username),
                Cell::new(row.permission),
                Cell::new(row.total_score),
                Cell::new(row.middlesex_score),
                Cell::new(row.level.label()),
            ]);
        }
        println!("{table}");
    }

    let counts = progress
        .level_counts()
        .iter()
        .map(|(tier, n)| format!("{}: {n}", tier.label()))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} players ({counts})", progress.rows.len());

    println!("\nTop {}", progress.top.size);
    println!("{}", leaderboard_table(&progress.top.entries));

    if let Some(path) = html {
        write_html_report(&progress, &path)?;
        eprintln!("HTML report: {}", path.display());
    }
    if let Some(path) = json {
        progress.save_json(&path)?;
        eprintln!("Snapshot saved to: {}", path.display());
    }

    Ok(())
}
