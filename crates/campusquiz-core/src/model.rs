//! Core data model types for campusquiz.
//!
//! Field names on the persisted types match the legacy JSON files exactly, so
//! existing `users.json` and `question.json` files load without migration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Score at which questions move from [`Tier::Easy`] to [`Tier::Medium`].
pub const MEDIUM_THRESHOLD: u32 = 500;
/// Score at which questions move from [`Tier::Medium`] to [`Tier::Hard`].
pub const HARD_THRESHOLD: u32 = 1000;

/// Role a player logs in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Student,
    Teacher,
    Developer,
}

impl Permission {
    /// Whether this role may open the class progress view.
    pub fn can_view_progress(self) -> bool {
        matches!(self, Permission::Teacher | Permission::Developer)
    }

    /// Whether this role may use the difficulty override.
    pub fn can_force_tier(self) -> bool {
        self == Permission::Developer
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Student => write!(f, "Student"),
            Permission::Teacher => write!(f, "Teacher"),
            Permission::Developer => write!(f, "Developer"),
        }
    }
}

impl FromStr for Permission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Permission::Student),
            "teacher" => Ok(Permission::Teacher),
            "developer" => Ok(Permission::Developer),
            _ => Err(Error::UnknownPermission(s.to_string())),
        }
    }
}

/// The scored activities a profile tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Minigame {
    Middlesex,
    NaturalSciences,
    Talbot,
}

impl Minigame {
    pub const ALL: [Minigame; 3] = [
        Minigame::Middlesex,
        Minigame::NaturalSciences,
        Minigame::Talbot,
    ];

    /// Tag used in the question file's `miniGame` field.
    pub fn tag(self) -> &'static str {
        match self {
            Minigame::Middlesex => "middlesex",
            Minigame::NaturalSciences => "naturalsciences",
            Minigame::Talbot => "talbot",
        }
    }

    /// This minigame's score on a profile.
    pub fn score_of(self, profile: &UserProfile) -> u32 {
        match self {
            Minigame::Middlesex => profile.middlesex_score,
            Minigame::NaturalSciences => profile.natural_sciences_score,
            Minigame::Talbot => profile.talbot_score,
        }
    }
}

impl fmt::Display for Minigame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Minigame {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "middlesex" => Ok(Minigame::Middlesex),
            "naturalsciences" | "natural-sciences" | "natural_sciences" => {
                Ok(Minigame::NaturalSciences)
            }
            "talbot" => Ok(Minigame::Talbot),
            _ => Err(Error::UnknownMinigame(s.to_string())),
        }
    }
}

/// Question difficulty, derived from a player's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    /// Pick the tier for a running score.
    pub fn from_score(score: u32) -> Self {
        if score >= HARD_THRESHOLD {
            Tier::Hard
        } else if score >= MEDIUM_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Easy
        }
    }

    /// The numeric difficulty stored on questions (1, 2 or 3).
    pub fn level(self) -> u8 {
        match self {
            Tier::Easy => 1,
            Tier::Medium => 2,
            Tier::Hard => 3,
        }
    }

    /// Points awarded for a correct answer to a question of this tier.
    pub fn points(self) -> u32 {
        match self {
            Tier::Easy => 10,
            Tier::Medium => 15,
            Tier::Hard => 30,
        }
    }

    /// Lowest score that maps to this tier.
    pub fn floor_score(self) -> u32 {
        match self {
            Tier::Easy => 0,
            Tier::Medium => MEDIUM_THRESHOLD,
            Tier::Hard => HARD_THRESHOLD,
        }
    }

    /// Player-facing level name.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Tier::Easy),
            2 => Ok(Tier::Medium),
            3 => Ok(Tier::Hard),
            other => Err(Error::InvalidTier(other)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Easy => write!(f, "easy"),
            Tier::Medium => write!(f, "medium"),
            Tier::Hard => write!(f, "hard"),
        }
    }
}

/// A player's persisted identity and scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique, case-sensitive identity key.
    pub username: String,
    /// Stored and compared verbatim.
    pub password: String,
    pub permission: Permission,
    /// Expected to equal the sum of the three minigame scores.
    #[serde(default)]
    pub total_score: u32,
    #[serde(default)]
    pub middlesex_score: u32,
    #[serde(default)]
    pub natural_sciences_score: u32,
    #[serde(default)]
    pub talbot_score: u32,
}

impl UserProfile {
    /// A fresh profile with every score at zero.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        permission: Permission,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            permission,
            total_score: 0,
            middlesex_score: 0,
            natural_sciences_score: 0,
            talbot_score: 0,
        }
    }

    /// Set one minigame's score and bring `total_score` back in line.
    pub fn set_minigame_score(&mut self, minigame: Minigame, score: u32) {
        match minigame {
            Minigame::Middlesex => self.middlesex_score = score,
            Minigame::NaturalSciences => self.natural_sciences_score = score,
            Minigame::Talbot => self.talbot_score = score,
        }
        self.recompute_total();
    }

    /// Zero all four scores.
    pub fn reset_scores(&mut self) {
        self.total_score = 0;
        self.middlesex_score = 0;
        self.natural_sciences_score = 0;
        self.talbot_score = 0;
    }

    pub fn recompute_total(&mut self) {
        self.total_score = self.minigame_sum();
    }

    /// Whether the stored total matches the minigame scores.
    pub fn total_is_consistent(&self) -> bool {
        self.total_score == self.minigame_sum()
    }

    fn minigame_sum(&self) -> u32 {
        self.middlesex_score
            .saturating_add(self.natural_sciences_score)
            .saturating_add(self.talbot_score)
    }
}

/// A single quiz question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    /// Minigame tag, e.g. `"middlesex"`.
    #[serde(rename = "miniGame", alias = "minigame")]
    pub minigame: String,
    /// Question text shown to the player.
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Accepted answers, matched case-insensitively.
    #[serde(rename = "answer", default)]
    pub answers: Vec<String>,
    /// Difficulty level, 1 to 3.
    pub difficulty: u8,
}

impl Question {
    /// The difficulty as a [`Tier`], or `None` if it is out of range.
    pub fn tier(&self) -> Option<Tier> {
        Tier::try_from(self.difficulty).ok()
    }

    /// The answer shown to a player who got it wrong.
    pub fn expected_answer(&self) -> Option<&str> {
        self.answers.first().map(String::as_str)
    }
}
