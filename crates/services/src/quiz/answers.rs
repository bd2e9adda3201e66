use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuestionType};

/// Answer choices in random order, ready for display.
///
/// True/false questions keep a fixed `True`, `False` order.
#[must_use]
pub fn shuffled_answers(question: &Question) -> Vec<String> {
    shuffled_answers_with(question, &mut rand::rng())
}

/// Same as [`shuffled_answers`] with a caller-provided RNG.
pub fn shuffled_answers_with<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<String> {
    let mut answers: Vec<String> = question.answers().into_iter().map(str::to_string).collect();
    match question.kind() {
        QuestionType::Boolean => answers.sort_by(|a, b| b.cmp(a)),
        QuestionType::Multiple => answers.shuffle(rng),
    }
    answers
}
