//! Question bank loading, difficulty-tiered selection and answer checking.
//!
//! Questions are keyed by their text, so two entries with identical text
//! collapse into one (the later entry wins). [`QuestionBank::validate`]
//! reports such collisions.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::model::{Minigame, Question, Tier};

/// The fixed collection of quiz questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: HashMap<String, Question>,
    collisions: Vec<u32>,
}

impl QuestionBank {
    /// Load questions from a JSON array file.
    ///
    /// Fails with [`Error::NotFound`] if the file is absent and
    /// [`Error::Corrupt`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let bank = Self::load_str(&content, path)?;
        tracing::info!(
            "loaded {} questions from {}",
            bank.questions.len(),
            path.display()
        );
        Ok(bank)
    }

    /// Parse a JSON string into a bank (useful for testing).
    pub fn load_str(content: &str, source_path: &Path) -> Result<Self> {
        let list: Vec<Question> =
            serde_json::from_str(content).map_err(|source| Error::Corrupt {
                path: source_path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_questions(list))
    }

    /// Build a bank from already-parsed questions.
    pub fn from_questions(list: Vec<Question>) -> Self {
        let mut questions = HashMap::with_capacity(list.len());
        let mut collisions = Vec::new();
        for question in list {
            let id = question.id;
            if let Some(replaced) = questions.insert(question.text.clone(), question) {
                tracing::warn!(
                    "question {} replaced question {} with identical text",
                    id,
                    replaced.id
                );
                collisions.push(replaced.id);
            }
        }
        Self {
            questions,
            collisions,
        }
    }

    /// Pick a random question for `minigame` at the tier implied by `score`.
    pub fn get_random_question(&self, score: u32, minigame: &str) -> Result<&Question> {
        self.get_random_question_with(&mut rand::thread_rng(), score, minigame)
    }

    /// [`get_random_question`](Self::get_random_question) with a caller-supplied RNG.
    pub fn get_random_question_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        score: u32,
        minigame: &str,
    ) -> Result<&Question> {
        let tier = Tier::from_score(score);
        let mut candidates: Vec<&Question> = self
            .questions
            .values()
            .filter(|q| q.difficulty == tier.level() && q.minigame == minigame)
            .collect();
        // HashMap order varies between runs; sort so a seeded RNG is reproducible.
        candidates.sort_by_key(|q| q.id);

        let question = candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| Error::NoQuestionsAvailable {
                tier,
                minigame: minigame.to_string(),
            })?;
        tracing::debug!(
            question_id = question.id,
            %tier,
            candidates = candidates.len(),
            "selected question"
        );
        Ok(question)
    }

    /// Whether `attempt` matches any accepted answer, ignoring case.
    ///
    /// A missing question is never answered correctly.
    pub fn validate_answer(question: Option<&Question>, attempt: &str) -> bool {
        let Some(question) = question else {
            return false;
        };
        let attempt = attempt.to_lowercase();
        question
            .answers
            .iter()
            .any(|answer| answer.to_lowercase() == attempt)
    }

    /// Find a question by its exact text, ignoring case.
    pub fn find_by_text(&self, text: &str) -> Option<&Question> {
        if let Some(question) = self.questions.get(text) {
            return Some(question);
        }
        let needle = text.to_lowercase();
        self.questions
            .values()
            .find(|q| q.text.to_lowercase() == needle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Check the bank for problems that would surface during play.
    pub fn validate(&self) -> Vec<BankWarning> {
        let mut warnings = Vec::new();

        for &id in &self.collisions {
            warnings.push(BankWarning {
                question_id: Some(id),
                message: "shadowed by a later question with identical text".into(),
            });
        }

        let mut sorted: Vec<&Question> = self.questions.values().collect();
        sorted.sort_by_key(|q| q.id);

        let mut seen_ids = HashSet::new();
        for q in &sorted {
            if !seen_ids.insert(q.id) {
                warnings.push(BankWarning {
                    question_id: Some(q.id),
                    message: format!("duplicate question id: {}", q.id),
                });
            }
        }

        for q in &sorted {
            if q.answers.is_empty() {
                warnings.push(BankWarning {
                    question_id: Some(q.id),
                    message: "no accepted answers".into(),
                });
            }
            if q.tier().is_none() {
                warnings.push(BankWarning {
                    question_id: Some(q.id),
                    message: format!(
                        "difficulty {} is outside 1-3 and will never be asked",
                        q.difficulty
                    ),
                });
            }
            if q.minigame.parse::<Minigame>().is_err() {
                warnings.push(BankWarning {
                    question_id: Some(q.id),
                    message: format!("unknown minigame tag '{}'", q.minigame),
                });
            }
        }

        // Only minigames that have questions at all are expected to cover every tier.
        for minigame in Minigame::ALL {
            let tag = minigame.tag();
            if !sorted.iter().any(|q| q.minigame == tag) {
                continue;
            }
            for tier in Tier::ALL {
                let covered = sorted
                    .iter()
                    .any(|q| q.minigame == tag && q.difficulty == tier.level());
                if !covered {
                    warnings.push(BankWarning {
                        question_id: None,
                        message: format!("no {tier} questions for minigame '{tag}'"),
                    });
                }
            }
        }

        warnings
    }
}

/// A problem found by [`QuestionBank::validate`].
#[derive(Debug, Clone)]
pub struct BankWarning {
    /// The question concerned, if the warning is about one question.
    pub question_id: Option<u32>,
    pub message: String,
}
