//! The `campusquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use campusquiz_core::bank::QuestionBank;
use campusquiz_core::config::load_config_from;

pub fn execute(questions: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let path = match questions {
        Some(path) => path,
        None => load_config_from(config_path.as_deref())?.questions_path,
    };
    let bank = QuestionBank::load(&path)?;
    println!("Question bank: {} ({} questions)", path.display(), bank.len());

    let warnings = bank.validate();
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All questions valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
