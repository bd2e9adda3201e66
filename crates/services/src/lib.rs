#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod quiz;
pub mod rate_limit;
pub mod trivia_client;

pub use config::TriviaConfig;
pub use error::{QuizError, TriviaError};
pub use quiz::{AnswerOutcome, QuestionList, QuizController, QuizProgress, QuizState};
pub use rate_limit::RateLimiter;
pub use trivia_client::{QuestionBank, TriviaClient};
