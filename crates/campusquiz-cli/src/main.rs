//! The campusquiz command-line front end: play rounds and manage the class from a terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use campusquiz_core::model::{Minigame, Permission};

mod commands;

#[derive(Parser)]
#[command(name = "campusquiz", version, about = "Campus trivia quiz game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and play a timed round
    Play {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// Role to log in as: student, teacher, developer
        #[arg(long, default_value = "student")]
        role: Permission,

        /// Minigame to play
        #[arg(long, default_value = "middlesex")]
        minigame: Minigame,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show a leaderboard
    Leaderboard {
        /// Score to rank by: total, middlesex, naturalsciences, talbot
        #[arg(long, default_value = "total")]
        category: String,

        /// Number of entries (default: leaderboard_size from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Class progress overview for teachers
    Students {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "teacher")]
        role: Permission,

        /// Only show usernames containing this text
        #[arg(long)]
        search: Option<String>,

        /// Also write an HTML report
        #[arg(long)]
        html: Option<PathBuf>,

        /// Also write the snapshot as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Reset your own scores to zero
    Reset {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "student")]
        role: Permission,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a question bank for problems
    Validate {
        /// Question file (default: questions_path from config)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config, profile file and question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("campusquiz=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            username,
            password,
            role,
            minigame,
            config,
        } => commands::play::execute(username, password, role, minigame, config).await,
        Commands::Leaderboard {
            category,
            limit,
            config,
        } => commands::leaderboard::execute(category, limit, config),
        Commands::Students {
            username,
            password,
            role,
            search,
            html,
            json,
            config,
        } => commands::students::execute(username, password, role, search, html, json, config),
        Commands::Reset {
            username,
            password,
            role,
            config,
        } => commands::reset::execute(username, password, role, config),
        Commands::Validate { questions, config } => commands::validate::execute(questions, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
