mod category;
mod custom;
mod ids;
mod query;
mod question;
mod token;

pub use category::{Category, CategoryCount, GlobalCount, QuestionTally};
pub use custom::CustomQuestion;
pub use ids::{CategoryId, CustomQuestionId, ParseIdError};
pub use query::QuestionQuery;
pub use question::{Difficulty, Question, QuestionType};
pub use token::{ResponseCode, SessionToken};
