//! Timed quiz session state machine.
//!
//! A session moves `Idle -> Active -> Finished` and back to `Idle` through
//! [`QuizSession::new_session`]. While active it owns the running score
//! exclusively; the score only reaches the player's profile when the session
//! is finalized.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::clock::{Countdown, Tick, TimeRemaining, DEFAULT_ROUND_SECONDS};
use crate::engine::{GameObserver, NoopObserver};
use crate::error::{Error, Result};
use crate::model::{Minigame, Permission, Question, Tier};
use crate::store::ProfileStore;

/// Lifecycle state of a [`QuizSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Active,
    Finished,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
            SessionState::Finished => "finished",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The logged-in player a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub username: String,
    pub permission: Permission,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Correct { points: u32, running_score: u32 },
    Incorrect { expected: Option<String> },
    /// Nothing to answer: no question loaded or time already up.
    Ignored,
}

/// Result of a single session tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTick {
    Running(TimeRemaining),
    Finished(Finalization),
    /// The session is not active; the tick did nothing.
    Inactive,
}

/// What finalization wrote to the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalization {
    pub final_score: u32,
    pub total_score: u32,
    /// `false` if writing the store failed; the in-memory profile is still updated.
    pub saved: bool,
}

/// One timed play-through of a minigame for one player.
pub struct QuizSession {
    id: Uuid,
    player: Player,
    minigame: Minigame,
    bank: Arc<QuestionBank>,
    rng: StdRng,
    observer: Arc<dyn GameObserver>,
    state: SessionState,
    baseline_score: u32,
    running_score: u32,
    countdown: Countdown,
    current: Option<Question>,
}

impl QuizSession {
    pub fn new(player: Player, minigame: Minigame, bank: Arc<QuestionBank>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            minigame,
            bank,
            rng: StdRng::from_entropy(),
            observer: Arc::new(NoopObserver),
            state: SessionState::Idle,
            baseline_score: 0,
            running_score: 0,
            countdown: Countdown::new(DEFAULT_ROUND_SECONDS),
            current: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn GameObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Use a seeded RNG so question order is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_round_seconds(mut self, seconds: u32) -> Self {
        self.countdown = Countdown::new(seconds);
        self
    }

    /// Begin a round from the player's stored score for this minigame.
    ///
    /// If the bank has nothing for the starting tier the session stays idle.
    pub fn start(&mut self, store: &ProfileStore) -> Result<()> {
        self.require(SessionState::Idle, "start")?;
        let profile = store
            .get(&self.player.username)
            .ok_or_else(|| Error::UnknownUser(self.player.username.clone()))?;

        self.baseline_score = self.minigame.score_of(profile);
        self.running_score = self.baseline_score;
        self.load_next_question()?;

        self.countdown.start();
        self.state = SessionState::Active;
        tracing::info!(
            session = %self.id,
            username = %self.player.username,
            minigame = %self.minigame,
            baseline = self.baseline_score,
            "session started"
        );

        if let Some(question) = &self.current {
            self.observer.on_question(&question.text);
        }
        self.observer.on_time_remaining(self.countdown.remaining());
        Ok(())
    }

    /// Answer the current question and move on to the next one.
    pub fn submit(&mut self, attempt: &str) -> Result<SubmitOutcome> {
        match self.state {
            SessionState::Idle => {
                return Err(Error::InvalidState {
                    operation: "submit",
                    state: self.state.as_str(),
                })
            }
            SessionState::Finished => return Ok(SubmitOutcome::Ignored),
            SessionState::Active => {}
        }
        let Some(question) = self.current.as_ref() else {
            return Ok(SubmitOutcome::Ignored);
        };

        let outcome = if QuestionBank::validate_answer(Some(question), attempt) {
            let points = question.tier().map(Tier::points).unwrap_or(0);
            self.running_score = self.running_score.saturating_add(points);
            self.observer.on_feedback(true, None);
            SubmitOutcome::Correct {
                points,
                running_score: self.running_score,
            }
        } else {
            let expected = question.expected_answer().map(str::to_string);
            self.observer.on_feedback(false, expected.as_deref());
            SubmitOutcome::Incorrect { expected }
        };
        tracing::debug!(
            session = %self.id,
            question_id = question.id,
            correct = matches!(outcome, SubmitOutcome::Correct { .. }),
            running_score = self.running_score,
            "answer submitted"
        );

        // The tier is re-evaluated on every fetch, so crossing a threshold
        // changes difficulty immediately.
        match self.load_next_question() {
            Ok(()) => {
                if let Some(next) = &self.current {
                    self.observer.on_question(&next.text);
                }
            }
            Err(Error::NoQuestionsAvailable { tier, minigame }) => {
                tracing::warn!(
                    session = %self.id,
                    %tier,
                    %minigame,
                    "question bank exhausted for tier"
                );
                self.current = None;
            }
            Err(e) => return Err(e),
        }

        Ok(outcome)
    }

    /// Advance the countdown by one subunit, finalizing when it runs out.
    pub fn tick(&mut self, store: &mut ProfileStore) -> Result<SessionTick> {
        if self.state != SessionState::Active {
            return Ok(SessionTick::Inactive);
        }
        match self.countdown.tick() {
            Tick::Running(remaining) => {
                self.observer.on_time_remaining(remaining);
                Ok(SessionTick::Running(remaining))
            }
            Tick::Expired => {
                self.observer.on_time_remaining(self.countdown.remaining());
                tracing::info!(session = %self.id, "time expired");
                self.finalize(store).map(SessionTick::Finished)
            }
            Tick::Stopped => Ok(SessionTick::Inactive),
        }
    }

    /// Leave the round early.
    ///
    /// The result is committed only if the running score moved away from the
    /// baseline; otherwise the round is discarded without touching the store.
    pub fn leave(&mut self, store: &mut ProfileStore) -> Result<Option<Finalization>> {
        if self.state != SessionState::Active {
            return Ok(None);
        }
        self.countdown.stop();
        if self.running_score != self.baseline_score {
            return self.finalize(store).map(Some);
        }

        self.state = SessionState::Finished;
        self.current = None;
        tracing::info!(session = %self.id, "left without scoring, nothing saved");
        Ok(None)
    }

    /// Return to `Idle` with the score and clock cleared, ready for a new start.
    pub fn new_session(&mut self) -> Result<()> {
        if self.state == SessionState::Active {
            return Err(Error::InvalidState {
                operation: "reset",
                state: self.state.as_str(),
            });
        }
        self.state = SessionState::Idle;
        self.baseline_score = 0;
        self.running_score = 0;
        self.countdown.reset();
        self.current = None;
        self.id = Uuid::new_v4();
        Ok(())
    }

    /// Developer override: jump the player's score to the floor of `level`.
    ///
    /// Updates the profile; an active round continues from the new score with
    /// a fresh question of the new tier. Returns whether the profile was
    /// saved. A failed save keeps the override in memory.
    pub fn force_tier(&mut self, store: &mut ProfileStore, level: u8) -> Result<bool> {
        if !self.player.permission.can_force_tier() {
            return Err(Error::PermissionDenied {
                username: self.player.username.clone(),
                action: "force the difficulty tier",
            });
        }
        let tier = Tier::try_from(level)?;
        let score = tier.floor_score();

        let profile = store
            .profile_mut(&self.player.username)
            .ok_or_else(|| Error::UnknownUser(self.player.username.clone()))?;
        profile.set_minigame_score(self.minigame, score);
        tracing::info!(
            session = %self.id,
            username = %self.player.username,
            %tier,
            "difficulty forced"
        );

        if self.state == SessionState::Active {
            self.running_score = score;
            match self.load_next_question() {
                Ok(()) => {
                    if let Some(next) = &self.current {
                        self.observer.on_question(&next.text);
                    }
                }
                Err(Error::NoQuestionsAvailable { .. }) => self.current = None,
                Err(e) => return Err(e),
            }
        }

        match store.save() {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::error!(session = %self.id, "failed to save forced tier: {e}");
                Ok(false)
            }
        }
    }

    fn finalize(&mut self, store: &mut ProfileStore) -> Result<Finalization> {
        self.countdown.stop();
        self.state = SessionState::Finished;
        self.current = None;

        let profile = store
            .profile_mut(&self.player.username)
            .ok_or_else(|| Error::UnknownUser(self.player.username.clone()))?;
        profile.set_minigame_score(self.minigame, self.running_score);
        let total_score = profile.total_score;

        let saved = match store.save() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(session = %self.id, "failed to save results: {e}");
                false
            }
        };
        tracing::info!(
            session = %self.id,
            username = %self.player.username,
            final_score = self.running_score,
            total_score,
            saved,
            "session finalized"
        );
        self.observer.on_finished(self.running_score);

        Ok(Finalization {
            final_score: self.running_score,
            total_score,
            saved,
        })
    }

    fn load_next_question(&mut self) -> Result<()> {
        let question = self
            .bank
            .get_random_question_with(&mut self.rng, self.running_score, self.minigame.tag())?
            .clone();
        self.current = Some(question);
        Ok(())
    }

    fn require(&self, expected: SessionState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                operation,
                state: self.state.as_str(),
            })
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn minigame(&self) -> Minigame {
        self.minigame
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn running_score(&self) -> u32 {
        self.running_score
    }

    pub fn baseline_score(&self) -> u32 {
        self.baseline_score
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn time_remaining(&self) -> TimeRemaining {
        self.countdown.remaining()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("player", &self.player)
            .field("minigame", &self.minigame)
            .field("state", &self.state)
            .field("baseline_score", &self.baseline_score)
            .field("running_score", &self.running_score)
            .field("remaining", &self.countdown.remaining())
            .finish()
    }
}
