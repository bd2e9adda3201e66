use crate::error::ModelError;
use crate::model::{CategoryId, Difficulty, QuestionType, SessionToken};

/// Parameters of a question fetch.
///
/// The amount is not checked on construction; callers that need the bank's
/// range enforced call [`QuestionQuery::validate_amount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub amount: u32,
    pub category: Option<CategoryId>,
    pub difficulty: Option<Difficulty>,
    pub kind: Option<QuestionType>,
    pub token: Option<SessionToken>,
}

impl QuestionQuery {
    pub const MIN_AMOUNT: u32 = 1;
    pub const MAX_AMOUNT: u32 = 50;
    pub const DEFAULT_AMOUNT: u32 = 10;

    #[must_use]
    pub fn new(amount: u32) -> Self {
        Self {
            amount,
            category: None,
            difficulty: None,
            kind: None,
            token: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<CategoryId>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: Option<QuestionType>) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<SessionToken>) -> Self {
        self.token = token;
        self
    }

    /// # Errors
    ///
    /// Returns `ModelError::InvalidAmount` when the amount is outside 1..=50.
    pub fn validate_amount(&self) -> Result<(), ModelError> {
        if (Self::MIN_AMOUNT..=Self::MAX_AMOUNT).contains(&self.amount) {
            Ok(())
        } else {
            Err(ModelError::InvalidAmount {
                amount: self.amount,
                min: Self::MIN_AMOUNT,
                max: Self::MAX_AMOUNT,
            })
        }
    }

    /// Query-string pairs in the order the bank documents them.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("amount", self.amount.to_string())];
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            params.push(("difficulty", difficulty.as_str().to_string()));
        }
        if let Some(kind) = self.kind {
            params.push(("type", kind.as_str().to_string()));
        }
        if let Some(token) = &self.token {
            params.push(("token", token.as_str().to_string()));
        }
        params
    }
}

impl Default for QuestionQuery {
    fn default() -> Self {
        Self::new(Self::DEFAULT_AMOUNT)
    }
}
