//! Persistent profile store.
//!
//! Profiles live in a single JSON array on disk. The whole collection is read
//! at load time and rewritten in full on every save; writes are not atomic.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::leaderboard::RankCategory;
use crate::model::{Permission, UserProfile};

/// Result of looking a username up at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The user exists; these are the stored credentials to compare against.
    Found {
        password: String,
        permission: Permission,
    },
    /// No such user existed, so a fresh profile was created and saved.
    NewUser,
}

/// Outcome of a full login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    Created,
    Rejected(LoginFailure),
}

impl LoginOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, LoginOutcome::Rejected(_))
    }
}

/// Why a login for an existing user was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    WrongPassword,
    WrongRole,
}

impl std::fmt::Display for LoginFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginFailure::WrongPassword => write!(f, "incorrect password"),
            LoginFailure::WrongRole => write!(f, "incorrect role selected"),
        }
    }
}

/// All known user profiles, keyed by username.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: BTreeMap<String, UserProfile>,
}

impl ProfileStore {
    /// Load the store from a JSON file.
    ///
    /// Fails with [`Error::NotFound`] if the file is absent and
    /// [`Error::Corrupt`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let store = Self::load_str(&content, path)?;
        tracing::info!(
            "loaded {} profiles from {}",
            store.profiles.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parse a JSON string into a store that saves back to `path`.
    pub fn load_str(content: &str, path: &Path) -> Result<Self> {
        let list: Vec<UserProfile> = serde_json::from_str(content).map_err(|source| {
            Error::Corrupt {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let mut profiles = BTreeMap::new();
        for profile in list {
            if let Some(previous) = profiles.insert(profile.username.clone(), profile) {
                tracing::warn!(
                    "duplicate profile '{}' in {}, keeping the later entry",
                    previous.username,
                    path.display()
                );
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            profiles,
        })
    }

    /// Load `path`, first writing an empty collection there if it does not exist.
    pub fn create_empty(path: &Path) -> Result<Self> {
        if !path.exists() {
            let store = Self {
                path: path.to_path_buf(),
                profiles: BTreeMap::new(),
            };
            store.save()?;
            return Ok(store);
        }
        Self::load(path)
    }

    /// Look a user up, creating and persisting a new profile if none exists.
    ///
    /// An existing profile is never modified; its stored credentials are
    /// returned for the caller to compare.
    pub fn lookup_or_create(
        &mut self,
        username: &str,
        password: &str,
        role: Permission,
    ) -> Result<Lookup> {
        if let Some(profile) = self.profiles.get(username) {
            return Ok(Lookup::Found {
                password: profile.password.clone(),
                permission: profile.permission,
            });
        }

        self.profiles.insert(
            username.to_string(),
            UserProfile::new(username, password, role),
        );
        if let Err(e) = self.save() {
            self.profiles.remove(username);
            return Err(e);
        }
        tracing::info!(username, %role, "created new profile");
        Ok(Lookup::NewUser)
    }

    /// Check credentials, creating the account if the username is new.
    ///
    /// The password is checked before the role.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        role: Permission,
    ) -> Result<LoginOutcome> {
        let outcome = match self.lookup_or_create(username, password, role)? {
            Lookup::NewUser => LoginOutcome::Created,
            Lookup::Found {
                password: stored,
                permission,
            } => {
                if stored != password {
                    LoginOutcome::Rejected(LoginFailure::WrongPassword)
                } else if permission != role {
                    LoginOutcome::Rejected(LoginFailure::WrongRole)
                } else {
                    LoginOutcome::LoggedIn
                }
            }
        };
        tracing::debug!(username, ?outcome, "login attempt");
        Ok(outcome)
    }

    /// Up to `n` profiles ordered by `category`, highest first.
    ///
    /// The sort is stable, so ties keep the store's iteration order.
    pub fn rank(&self, category: RankCategory, n: usize) -> Vec<&UserProfile> {
        let mut ranked: Vec<&UserProfile> = self.profiles.values().collect();
        ranked.sort_by(|a, b| category.score_of(b).cmp(&category.score_of(a)));
        ranked.truncate(n);
        ranked
    }

    /// Like [`rank`](Self::rank) with the category given by name.
    pub fn rank_by_name(&self, category: &str, n: usize) -> Result<Vec<&UserProfile>> {
        let category: RankCategory = category.parse()?;
        Ok(self.rank(category, n))
    }

    /// Overwrite the backing file with the entire collection.
    pub fn save(&self) -> Result<()> {
        let list: Vec<&UserProfile> = self.profiles.values().collect();
        let json = serde_json::to_string_pretty(&list).map_err(|source| Error::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::write(&self.path, json).map_err(|e| Error::io(&self.path, e))?;
        tracing::debug!(
            "saved {} profiles to {}",
            self.profiles.len(),
            self.path.display()
        );
        Ok(())
    }

    /// The full mapping.
    pub fn all(&self) -> &BTreeMap<String, UserProfile> {
        &self.profiles
    }

    pub fn get(&self, username: &str) -> Option<&UserProfile> {
        self.profiles.get(username)
    }

    /// Mutable access for editing; callers must [`save`](Self::save) afterwards.
    pub fn profile_mut(&mut self, username: &str) -> Option<&mut UserProfile> {
        self.profiles.get_mut(username)
    }

    /// Every profile, sorted case-insensitively by username.
    pub fn alphabetical(&self) -> Vec<&UserProfile> {
        let mut sorted: Vec<&UserProfile> = self.profiles.values().collect();
        sorted.sort_by_cached_key(|p| p.username.to_lowercase());
        sorted
    }

    /// Alphabetical profiles whose username contains `text`, ignoring case.
    pub fn search(&self, text: &str) -> Vec<&UserProfile> {
        let needle = text.trim().to_lowercase();
        self.alphabetical()
            .into_iter()
            .filter(|p| needle.is_empty() || p.username.to_lowercase().contains(&needle))
            .collect()
    }

    /// Zero every score on a profile and persist the change.
    pub fn reset_scores(&mut self, username: &str) -> Result<()> {
        let profile = self
            .profiles
            .get_mut(username)
            .ok_or_else(|| Error::UnknownUser(username.to_string()))?;
        profile.reset_scores();
        tracing::info!(username, "reset all scores");
        self.save()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
