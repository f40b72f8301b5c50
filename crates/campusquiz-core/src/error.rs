//! Engine error types.
//!
//! Every fallible core operation returns [`Error`], so callers can tell a
//! missing data file from a caller bug without string matching.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Tier;

/// Errors produced by the game engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A persisted source does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A persisted source exists but could not be parsed.
    #[error("corrupt data in {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing a persisted source failed for a reason other than absence.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rank query named a category that does not exist.
    #[error("unknown rank category: {0}")]
    UnknownCategory(String),

    /// A permission string did not name a known role.
    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    /// A minigame name did not match any known minigame.
    #[error("unknown minigame: {0}")]
    UnknownMinigame(String),

    /// A difficulty tier outside 1..=3 was requested.
    #[error("invalid tier {0}, expected 1, 2 or 3")]
    InvalidTier(u8),

    /// No question matches the requested tier and minigame.
    #[error("no {tier} questions available for minigame '{minigame}'")]
    NoQuestionsAvailable { tier: Tier, minigame: String },

    /// The player is not allowed to perform the action.
    #[error("{username} is not permitted to {action}")]
    PermissionDenied { username: String, action: &'static str },

    /// The operation is not valid in the current session state.
    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// The operation needs a logged-in player.
    #[error("no player is logged in")]
    NotLoggedIn,

    /// The named user has no profile in the store.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Configuration could not be loaded or failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns `true` for load failures the engine cannot run without.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::Corrupt { .. })
    }

    /// Returns `true` if the error signals misuse of the API by the caller.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownCategory(_)
                | Error::InvalidState { .. }
                | Error::InvalidTier(_)
                | Error::NotLoggedIn
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::Io { path, source }
        }
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
