use quiz_core::Clock;
use quiz_core::ModelError;
use quiz_core::model::{CustomQuestion, CustomQuestionId};
use tracing::debug;

/// In-memory list of questions the player wrote themselves.
///
/// Ids increase monotonically and are never reused, even after removal.
#[derive(Debug, Clone, Default)]
pub struct QuestionList {
    clock: Clock,
    next_id: u64,
    questions: Vec<CustomQuestion>,
}

impl QuestionList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `clock` to stamp new entries.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Append a question and return its id.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::EmptyQuestionText` when `text` is blank; the list
    /// is left unchanged.
    pub fn add(&mut self, text: impl Into<String>) -> Result<CustomQuestionId, ModelError> {
        let id = CustomQuestionId::new(self.next_id + 1);
        let question = CustomQuestion::new(id, text, self.clock.now())?;
        self.next_id += 1;
        self.questions.push(question);
        debug!(%id, total = self.questions.len(), "added custom question");
        Ok(id)
    }

    /// Remove the question with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: CustomQuestionId) -> bool {
        let before = self.questions.len();
        self.questions.retain(|question| question.id() != id);
        before != self.questions.len()
    }

    #[must_use]
    pub fn get(&self, id: CustomQuestionId) -> Option<&CustomQuestion> {
        self.questions.iter().find(|question| question.id() == id)
    }

    /// Questions in insertion order.
    #[must_use]
    pub fn questions(&self) -> &[CustomQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Advance the stamping clock. Only fixed clocks move.
    pub fn advance_clock(&mut self, delta: chrono::Duration) {
        self.clock.advance(delta);
    }
}
