//! Leaderboard rankings over the profile store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Minigame, UserProfile};
use crate::store::ProfileStore;

/// Default number of entries on a leaderboard.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Which score a ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankCategory {
    TotalScore,
    MiddlesexScore,
    NaturalSciencesScore,
    TalbotScore,
}

impl RankCategory {
    pub const ALL: [RankCategory; 4] = [
        RankCategory::TotalScore,
        RankCategory::MiddlesexScore,
        RankCategory::NaturalSciencesScore,
        RankCategory::TalbotScore,
    ];

    /// Extract the field this category ranks by.
    pub fn score_of(self, profile: &UserProfile) -> u32 {
        match self {
            RankCategory::TotalScore => profile.total_score,
            RankCategory::MiddlesexScore => profile.middlesex_score,
            RankCategory::NaturalSciencesScore => profile.natural_sciences_score,
            RankCategory::TalbotScore => profile.talbot_score,
        }
    }

    /// The category for a single minigame's leaderboard.
    pub fn for_minigame(minigame: Minigame) -> Self {
        match minigame {
            Minigame::Middlesex => RankCategory::MiddlesexScore,
            Minigame::NaturalSciences => RankCategory::NaturalSciencesScore,
            Minigame::Talbot => RankCategory::TalbotScore,
        }
    }
}

impl fmt::Display for RankCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankCategory::TotalScore => write!(f, "TotalScore"),
            RankCategory::MiddlesexScore => write!(f, "MiddlesexScore"),
            RankCategory::NaturalSciencesScore => write!(f, "NaturalSciencesScore"),
            RankCategory::TalbotScore => write!(f, "TalbotScore"),
        }
    }
}

impl FromStr for RankCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "totalscore" | "total" => Ok(RankCategory::TotalScore),
            "middlesexscore" | "middlesex" => Ok(RankCategory::MiddlesexScore),
            "naturalsciencesscore" | "naturalsciences" => Ok(RankCategory::NaturalSciencesScore),
            "talbotscore" | "talbot" => Ok(RankCategory::TalbotScore),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub username: String,
    pub score: u32,
}

/// A cached top-N ranking for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub category: RankCategory,
    pub size: usize,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// An empty board; call [`refresh`](Self::refresh) to populate it.
    pub fn new(category: RankCategory, size: usize) -> Self {
        Self {
            category,
            size,
            entries: Vec::new(),
        }
    }

    /// Build a board already populated from `store`.
    pub fn build(store: &ProfileStore, category: RankCategory, size: usize) -> Self {
        let mut board = Self::new(category, size);
        board.refresh(store);
        board
    }

    /// Recompute the ranking from the store's current contents.
    pub fn refresh(&mut self, store: &ProfileStore) {
        self.entries = store
            .rank(self.category, self.size)
            .into_iter()
            .enumerate()
            .map(|(i, profile)| LeaderboardEntry {
                rank: i + 1,
                username: profile.username.clone(),
                score: self.category.score_of(profile),
            })
            .collect();
        tracing::debug!(
            category = %self.category,
            entries = self.entries.len(),
            "leaderboard refreshed"
        );
    }

    /// The entry for `username`, if they made the board.
    pub fn position_of(&self, username: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.username == username)
    }
}

/// The global board plus one minigame board, refreshed together.
#[derive(Debug, Clone)]
pub struct Leaderboards {
    pub global: Leaderboard,
    pub minigame: Leaderboard,
}

impl Leaderboards {
    pub fn build(store: &ProfileStore, minigame: Minigame, size: usize) -> Self {
        Self {
            global: Leaderboard::build(store, RankCategory::TotalScore, size),
            minigame: Leaderboard::build(store, RankCategory::for_minigame(minigame), size),
        }
    }

    pub fn refresh(&mut self, store: &ProfileStore) {
        self.global.refresh(store);
        self.minigame.refresh(store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Permission;
    use std::path::Path;

    fn store() -> ProfileStore {
        let mut profiles = Vec::new();
        for (name, total, middlesex) in [("a", 50, 10), ("b", 70, 70), ("c", 20, 20)] {
            let mut p = UserProfile::new(name, "pw", Permission::Student);
            p.total_score = total;
            p.middlesex_score = middlesex;
            profiles.push(p);
        }
        let json = serde_json::to_string(&profiles).unwrap();
        ProfileStore::load_str(&json, Path::new("unused.json")).unwrap()
    }

    #[test]
    fn category_parse_and_display() {
        for category in RankCategory::ALL {
            assert_eq!(category.to_string().parse::<RankCategory>().unwrap(), category);
        }
        assert_eq!(
            "total".parse::<RankCategory>().unwrap(),
            RankCategory::TotalScore
        );
        assert!(matches!(
            "Speed".parse::<RankCategory>(),
            Err(Error::UnknownCategory(_))
        ));
    }

    #[test]
    fn minigame_categories() {
        assert_eq!(
            RankCategory::for_minigame(Minigame::Middlesex),
            RankCategory::MiddlesexScore
        );
        let mut p = UserProfile::new("x", "y", Permission::Student);
        p.set_minigame_score(Minigame::Talbot, 9);
        assert_eq!(
            RankCategory::for_minigame(Minigame::Talbot).score_of(&p),
            Minigame::Talbot.score_of(&p)
        );
    }

    #[test]
    fn board_ranks_from_one() {
        let board = Leaderboard::build(&store(), RankCategory::TotalScore, 2);
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.entries[0].rank, 1);
        assert_eq!(board.entries[0].username, "b");
        assert_eq!(board.entries[1].username, "a");
        assert!(board.position_of("c").is_none());
    }

    #[test]
    fn refresh_picks_up_changes() {
        let mut store = store();
        let mut boards = Leaderboards::build(&store, Minigame::Middlesex, 10);
        assert_eq!(boards.minigame.entries[0].username, "b");

        store
            .profile_mut("c")
            .unwrap()
            .set_minigame_score(Minigame::Middlesex, 500);
        assert_eq!(boards.minigame.entries[0].username, "b");

        boards.refresh(&store);
        assert_eq!(boards.minigame.entries[0].username, "c");
        assert_eq!(boards.global.entries[0].username, "c");
        assert_eq!(boards.global.position_of("c").unwrap().score, 500);
    }
}
