mod answers;
mod controller;
mod progress;
mod question_list;
mod state;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use answers::{shuffled_answers, shuffled_answers_with};
pub use controller::{AnswerOutcome, QuizController};
pub use progress::QuizProgress;
pub use question_list::QuestionList;
pub use state::QuizState;
