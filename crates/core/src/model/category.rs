use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::CategoryId;

/// Reference data: a trivia category known to the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Question counts for a single category, split by difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "total_question_count")]
    pub total: u32,
    #[serde(rename = "total_easy_question_count")]
    pub easy: u32,
    #[serde(rename = "total_medium_question_count")]
    pub medium: u32,
    #[serde(rename = "total_hard_question_count")]
    pub hard: u32,
}

/// Review-state tally reported by the global count endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTally {
    #[serde(rename = "total_num_of_questions")]
    pub total: u32,
    #[serde(rename = "total_num_of_pending_questions", default)]
    pub pending: u32,
    #[serde(rename = "total_num_of_verified_questions", default)]
    pub verified: u32,
    #[serde(rename = "total_num_of_rejected_questions", default)]
    pub rejected: u32,
}

/// Bank-wide question counts.
///
/// `categories` is keyed by the category id as the bank sends it (a string).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCount {
    pub overall: QuestionTally,
    #[serde(default)]
    pub categories: BTreeMap<String, QuestionTally>,
}

impl GlobalCount {
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<&QuestionTally> {
        self.categories.get(&id.to_string())
    }
}
