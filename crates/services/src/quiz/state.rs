use quiz_core::model::{Category, Question, SessionToken};

use super::progress::QuizProgress;

/// Observable state of a quiz session.
///
/// Only `QuizController` mutates it; everyone else reads snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizState {
    pub(crate) questions: Vec<Question>,
    pub(crate) current_index: usize,
    pub(crate) score: u32,
    pub(crate) answered: usize,
    pub(crate) loading: bool,
    pub(crate) last_error: Option<String>,
    pub(crate) categories: Vec<Category>,
    pub(crate) session_token: Option<SessionToken>,
}

impl QuizState {
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of answers recorded for the current questions.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn session_token(&self) -> Option<&SessionToken> {
        self.session_token.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current_index == self.questions.len() - 1
    }

    /// True once the last question has been answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty() && self.answered >= self.questions.len()
    }

    /// Percentage of the way through the quiz, counting the current question.
    ///
    /// Returns `0.0` when no questions are loaded.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        // Multiply before dividing so round numbers stay exact.
        ((self.current_index + 1) * 100) as f64 / self.questions.len() as f64
    }

    #[must_use]
    pub fn progress_summary(&self) -> QuizProgress {
        QuizProgress {
            total: self.total_questions(),
            position: if self.questions.is_empty() {
                0
            } else {
                self.current_index + 1
            },
            answered: self.answered,
            score: self.score,
            percent: self.progress(),
            is_complete: self.is_complete(),
        }
    }

    pub(crate) fn clear_questions(&mut self) {
        self.questions.clear();
        self.current_index = 0;
        self.score = 0;
        self.answered = 0;
    }
}
