use chrono::{DateTime, Utc};

use crate::error::ModelError;
use crate::model::ids::CustomQuestionId;

/// A question the player wrote down locally, kept next to the bank's quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomQuestion {
    id: CustomQuestionId,
    text: String,
    created_at: DateTime<Utc>,
}

impl CustomQuestion {
    /// # Errors
    ///
    /// Returns `ModelError::EmptyQuestionText` when `text` is blank.
    pub fn new(
        id: CustomQuestionId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ModelError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyQuestionText);
        }
        Ok(Self {
            id,
            text: trimmed.to_string(),
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> CustomQuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
