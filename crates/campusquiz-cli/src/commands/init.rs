//! The `campusquiz init` command.

use std::path::Path;

use anyhow::Result;

use campusquiz_core::config::{GameConfig, CONFIG_FILE_NAME};
use campusquiz_core::store::ProfileStore;

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    let defaults = GameConfig::default();

    let profiles = defaults.profiles_path.as_path();
    if profiles.exists() {
        println!("{} already exists, skipping.", profiles.display());
    } else {
        ProfileStore::create_empty(profiles)?;
        println!("Created {}", profiles.display());
    }

    let questions = defaults.questions_path.as_path();
    if questions.exists() {
        println!("{} already exists, skipping.", questions.display());
    } else {
        if let Some(parent) = questions.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(questions, SAMPLE_QUESTIONS)?;
        println!("Created {}", questions.display());
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to {}", questions.display());
    println!("  2. Run: campusquiz validate");
    println!("  3. Run: campusquiz play --username <name> --password <password>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# campusquiz configuration

profiles_path = "json_files/users.json"
questions_path = "json_files/question.json"

# Length of a round in seconds
round_seconds = 60
leaderboard_size = 10
tick_interval_ms = 10
"#;

const SAMPLE_QUESTIONS: &str = r#"[
  {"id": 1, "miniGame": "middlesex", "question": "What is 7 x 8?", "type": "short",
   "options": [], "answer": ["56", "fifty-six"], "difficulty": 1},
  {"id": 2, "miniGame": "middlesex", "question": "What is the capital of Canada?", "type": "short",
   "options": [], "answer": ["Ottawa"], "difficulty": 1},
  {"id": 3, "miniGame": "middlesex", "question": "How many sides does a hexagon have?", "type": "short",
   "options": [], "answer": ["6", "six"], "difficulty": 2},
  {"id": 4, "miniGame": "middlesex", "question": "Which planet is known as the red planet?", "type": "short",
   "options": [], "answer": ["Mars"], "difficulty": 2},
  {"id": 5, "miniGame": "middlesex", "question": "What is the square root of 169?", "type": "short",
   "options": [], "answer": ["13", "thirteen"], "difficulty": 3},
  {"id": 6, "miniGame": "middlesex", "question": "Who wrote Pride and Prejudice?", "type": "short",
   "options": [], "answer": ["Jane Austen", "Austen"], "difficulty": 3},
  {"id": 7, "miniGame": "naturalsciences", "question": "What gas do plants absorb from the air?", "type": "short",
   "options": [], "answer": ["carbon dioxide", "CO2"], "difficulty": 1},
  {"id": 8, "miniGame": "naturalsciences", "question": "What is the chemical symbol for sodium?", "type": "short",
   "options": [], "answer": ["Na"], "difficulty": 2},
  {"id": 9, "miniGame": "naturalsciences", "question": "What is the powerhouse of the cell?", "type": "short",
   "options": [], "answer": ["mitochondria", "mitochondrion"], "difficulty": 3},
  {"id": 10, "miniGame": "talbot", "question": "How many continents are there?", "type": "short",
   "options": [], "answer": ["7", "seven"], "difficulty": 1},
  {"id": 11, "miniGame": "talbot", "question": "What is the longest river in Africa?", "type": "short",
   "options": [], "answer": ["Nile", "the Nile"], "difficulty": 2},
  {"id": 12, "miniGame": "talbot", "question": "In which year did the first Moon landing happen?", "type": "short",
   "options": [], "answer": ["1969"], "difficulty": 3}
]
"#;
