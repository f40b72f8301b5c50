//! Class progress snapshot for teachers.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::leaderboard::{Leaderboard, RankCategory};
use crate::model::{Permission, Tier};
use crate::store::ProfileStore;

/// One player's row in the class overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRow {
    pub username: String,
    pub permission: Permission,
    pub total_score: u32,
    pub middlesex_score: u32,
    /// Tier of the middlesex score.
    pub level: Tier,
}

/// Alphabetical class overview plus the global top board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassProgress {
    pub generated_at: DateTime<Utc>,
    /// Filter the rows were captured with, if any.
    #[serde(default)]
    pub search: Option<String>,
    pub rows: Vec<ProgressRow>,
    pub top: Leaderboard,
}

impl ClassProgress {
    /// Snapshot the store. `search` filters rows by username substring;
    /// the top board always covers everyone.
    pub fn capture(store: &ProfileStore, search: Option<&str>, top_size: usize) -> Self {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let rows = store
            .search(search.unwrap_or(""))
            .into_iter()
            .map(|p| ProgressRow {
                username: p.username.clone(),
                permission: p.permission,
                total_score: p.total_score,
                middlesex_score: p.middlesex_score,
                level: Tier::from_score(p.middlesex_score),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            search: search.map(str::to_string),
            rows,
            top: Leaderboard::build(store, RankCategory::TotalScore, top_size),
        }
    }

    /// Number of rows per level, easy to hard.
    pub fn level_counts(&self) -> [(Tier, usize); 3] {
        Tier::ALL.map(|tier| (tier, self.rows.iter().filter(|r| r.level == tier).count()))
    }

    /// Save the snapshot as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::write(path, json).map_err(|e| Error::io(path, e))
    }

    /// Load a snapshot from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| Error::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }
}
