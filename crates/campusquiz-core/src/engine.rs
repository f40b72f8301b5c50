//! Game context tying the store, bank, leaderboards and session together.
//!
//! [`Game`] is the one value a front end holds. It owns the profile store and
//! question bank for the whole process and keeps the leaderboards in step
//! with every write.

use std::sync::Arc;

use crate::bank::QuestionBank;
use crate::clock::TimeRemaining;
use crate::config::GameConfig;
use crate::error::{Error, Result};
use crate::leaderboard::{Leaderboard, Leaderboards, RankCategory};
use crate::model::{Minigame, Permission, UserProfile};
use crate::progress::ClassProgress;
use crate::session::{
    Finalization, Player, QuizSession, SessionState, SessionTick, SubmitOutcome,
};
use crate::store::{LoginOutcome, ProfileStore};

/// Notifications for whatever is presenting the game.
pub trait GameObserver: Send + Sync {
    fn on_question(&self, text: &str);
    fn on_feedback(&self, correct: bool, expected_answer: Option<&str>);
    fn on_time_remaining(&self, remaining: TimeRemaining);
    fn on_finished(&self, final_score: u32);
    fn on_new_user(&self, username: &str);
    fn on_login_result(&self, success: bool, reason: Option<&str>);
}

/// No-op observer.
pub struct NoopObserver;

impl GameObserver for NoopObserver {
    fn on_question(&self, _: &str) {}
    fn on_feedback(&self, _: bool, _: Option<&str>) {}
    fn on_time_remaining(&self, _: TimeRemaining) {}
    fn on_finished(&self, _: u32) {}
    fn on_new_user(&self, _: &str) {}
    fn on_login_result(&self, _: bool, _: Option<&str>) {}
}

/// Process-wide game state for one front end.
pub struct Game {
    config: GameConfig,
    store: ProfileStore,
    bank: Arc<QuestionBank>,
    leaderboards: Leaderboards,
    session: Option<QuizSession>,
    observer: Arc<dyn GameObserver>,
    seed: Option<u64>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game").finish_non_exhaustive()
    }
}

impl Game {
    /// Load the profile store and question bank named by `config`.
    ///
    /// A missing or corrupt file is fatal; nothing is created here.
    pub fn open(config: GameConfig, observer: Arc<dyn GameObserver>) -> Result<Self> {
        config.validate()?;
        let store = ProfileStore::load(&config.profiles_path)?;
        let bank = QuestionBank::load(&config.questions_path)?;
        tracing::info!(
            profiles = store.len(),
            questions = bank.len(),
            "game data loaded"
        );
        Ok(Self::from_parts(config, store, bank, observer))
    }

    /// Assemble a game from already-loaded data.
    pub fn from_parts(
        config: GameConfig,
        store: ProfileStore,
        bank: QuestionBank,
        observer: Arc<dyn GameObserver>,
    ) -> Self {
        let leaderboards =
            Leaderboards::build(&store, Minigame::Middlesex, config.leaderboard_size);
        Self {
            config,
            store,
            bank: Arc::new(bank),
            leaderboards,
            session: None,
            observer,
            seed: None,
        }
    }

    /// Seed question selection for every session this game creates.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Log a player in, creating the account if the username is new.
    ///
    /// On success any previous player is logged out first.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        role: Permission,
    ) -> Result<LoginOutcome> {
        let outcome = self.store.login(username, password, role)?;
        if outcome == LoginOutcome::Created {
            self.observer.on_new_user(username);
        }

        let reason = match outcome {
            LoginOutcome::Rejected(failure) => Some(failure.to_string()),
            _ => None,
        };
        self.observer
            .on_login_result(outcome.is_success(), reason.as_deref());

        if outcome.is_success() {
            self.logout()?;
            let player = Player {
                username: username.to_string(),
                permission: role,
            };
            self.session = Some(self.new_quiz_session(player, Minigame::Middlesex));
            tracing::info!(username, %role, "logged in");
        }
        Ok(outcome)
    }

    /// Log the current player out, leaving any active round first.
    pub fn logout(&mut self) -> Result<Option<Finalization>> {
        let finalization = self.leave()?;
        if let Some(session) = self.session.take() {
            tracing::info!(username = %session.player().username, "logged out");
        }
        Ok(finalization)
    }

    /// Start a round of `minigame` for the logged-in player.
    pub fn start(&mut self, minigame: Minigame) -> Result<()> {
        let session = self.session.as_ref().ok_or(Error::NotLoggedIn)?;
        match session.state() {
            SessionState::Active => {
                return Err(Error::InvalidState {
                    operation: "start",
                    state: session.state().as_str(),
                })
            }
            SessionState::Idle if session.minigame() == minigame => {}
            _ => {
                let player = session.player().clone();
                self.session = Some(self.new_quiz_session(player, minigame));
            }
        }

        let category = RankCategory::for_minigame(minigame);
        if self.leaderboards.minigame.category != category {
            self.leaderboards.minigame =
                Leaderboard::build(&self.store, category, self.config.leaderboard_size);
        }

        let session = self.session.as_mut().ok_or(Error::NotLoggedIn)?;
        session.start(&self.store)
    }

    pub fn submit(&mut self, attempt: &str) -> Result<SubmitOutcome> {
        self.session_mut()?.submit(attempt)
    }

    /// Advance the clock one tick; refreshes the leaderboards if the round ends.
    pub fn tick(&mut self) -> Result<SessionTick> {
        let Some(session) = self.session.as_mut() else {
            return Ok(SessionTick::Inactive);
        };
        let tick = session.tick(&mut self.store)?;
        if matches!(tick, SessionTick::Finished(_)) {
            self.leaderboards.refresh(&self.store);
        }
        Ok(tick)
    }

    /// Leave the current round early.
    pub fn leave(&mut self) -> Result<Option<Finalization>> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let finalization = session.leave(&mut self.store)?;
        if finalization.is_some() {
            self.leaderboards.refresh(&self.store);
        }
        Ok(finalization)
    }

    pub fn new_session(&mut self) -> Result<()> {
        self.session_mut()?.new_session()
    }

    /// Developer override of the current minigame's difficulty tier.
    ///
    /// Returns whether the profile was saved. The leaderboards are left
    /// alone until the next finalization or explicit save.
    pub fn force_tier(&mut self, level: u8) -> Result<bool> {
        let session = self.session.as_mut().ok_or(Error::NotLoggedIn)?;
        session.force_tier(&mut self.store, level)
    }

    /// Up to `n` profiles ranked by the named category.
    pub fn rank(&self, category: &str, n: usize) -> Result<Vec<&UserProfile>> {
        self.store.rank_by_name(category, n)
    }

    /// Zero the logged-in player's scores.
    pub fn reset_stats(&mut self) -> Result<()> {
        let session = self.session.as_ref().ok_or(Error::NotLoggedIn)?;
        if session.state() == SessionState::Active {
            return Err(Error::InvalidState {
                operation: "reset stats",
                state: session.state().as_str(),
            });
        }
        let username = session.player().username.clone();
        self.store.reset_scores(&username)?;
        self.leaderboards.refresh(&self.store);
        Ok(())
    }

    /// Write the profile store.
    pub fn save(&mut self) -> Result<()> {
        self.store.save()?;
        self.leaderboards.refresh(&self.store);
        Ok(())
    }

    /// Class overview; teachers and developers only.
    pub fn class_progress(&self, search: Option<&str>) -> Result<ClassProgress> {
        let player = self.player().ok_or(Error::NotLoggedIn)?;
        if !player.permission.can_view_progress() {
            return Err(Error::PermissionDenied {
                username: player.username.clone(),
                action: "view class progress",
            });
        }
        Ok(ClassProgress::capture(
            &self.store,
            search,
            self.config.leaderboard_size,
        ))
    }

    fn new_quiz_session(&self, player: Player, minigame: Minigame) -> QuizSession {
        let session = QuizSession::new(player, minigame, Arc::clone(&self.bank))
            .with_observer(Arc::clone(&self.observer))
            .with_round_seconds(self.config.round_seconds);
        match self.seed {
            Some(seed) => session.with_seed(seed),
            None => session,
        }
    }

    fn session_mut(&mut self) -> Result<&mut QuizSession> {
        self.session.as_mut().ok_or(Error::NotLoggedIn)
    }

    pub fn player(&self) -> Option<&Player> {
        self.session.as_ref().map(QuizSession::player)
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn leaderboards(&self) -> &Leaderboards {
        &self.leaderboards
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
