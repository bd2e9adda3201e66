use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

//
// ─── QUESTION TYPE ─────────────────────────────────────────────────────────────
//

/// Answer format of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Four choices, one of them correct.
    Multiple,
    /// True / False.
    Boolean,
}

impl QuestionType {
    /// Wire value used by the question bank.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Multiple => "multiple",
            QuestionType::Boolean => "boolean",
        }
    }

    fn incorrect_answer_range(self) -> (usize, usize) {
        match self {
            QuestionType::Multiple => (1, 3),
            QuestionType::Boolean => (1, 1),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiple" => Ok(Self::Multiple),
            "boolean" => Ok(Self::Boolean),
            _ => Err(ModelError::UnknownQuestionType(s.to_string())),
        }
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Wire value used by the question bank.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ModelError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single trivia question as issued by the question bank.
///
/// Questions are never mutated after they are received; the session only
/// reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    category: String,
    #[serde(rename = "type")]
    kind: QuestionType,
    difficulty: Difficulty,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl Question {
    /// Build a question and check its answer arity.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MalformedQuestion` when the number of incorrect
    /// answers does not fit the question type.
    pub fn new(
        category: impl Into<String>,
        kind: QuestionType,
        difficulty: Difficulty,
        question: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: Vec<String>,
    ) -> Result<Self, ModelError> {
        let question = Self {
            category: category.into(),
            kind,
            difficulty,
            question: question.into(),
            correct_answer: correct_answer.into(),
            incorrect_answers,
        };
        question.validate()?;
        Ok(question)
    }

    /// Check that the incorrect answers match the question type
    /// (1 to 3 for multiple choice, exactly 1 for true/false).
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MalformedQuestion` on a mismatch.
    pub fn validate(&self) -> Result<(), ModelError> {
        let (min, max) = self.kind.incorrect_answer_range();
        let len = self.incorrect_answers.len();
        if len < min || len > max {
            return Err(ModelError::MalformedQuestion {
                kind: self.kind.as_str(),
                len,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    /// All answers, correct one first, in bank order.
    #[must_use]
    pub fn answers(&self) -> Vec<&str> {
        std::iter::once(self.correct_answer.as_str())
            .chain(self.incorrect_answers.iter().map(String::as_str))
            .collect()
    }

    /// Exact string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// Wire shape of a question before its answer arity is checked.
#[derive(Deserialize)]
struct RawQuestion {
    category: String,
    #[serde(rename = "type")]
    kind: QuestionType,
    difficulty: Difficulty,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

impl TryFrom<RawQuestion> for Question {
    type Error = ModelError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Self::new(
            raw.category,
            raw.kind,
            raw.difficulty,
            raw.question,
            raw.correct_answer,
            raw.incorrect_answers,
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
