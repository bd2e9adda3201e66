//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::ModelError;
use quiz_core::model::ResponseCode;

/// Normalized failures of a question bank call.
///
/// Transport failures are classified by HTTP status at the call site; in-band
/// `response_code` failures keep their code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TriviaError {
    #[error("the question bank is rate limiting requests, wait a few seconds before retrying")]
    RateLimited,
    #[error("the question bank found nothing for these parameters")]
    NotFound,
    #[error("the question bank is unavailable right now (status {0}), try again later")]
    Server(reqwest::StatusCode),
    #[error("{}", .0.message())]
    Domain(ResponseCode),
    #[error("unexpected failure talking to the question bank")]
    Unknown(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TriviaError {
    /// Classify a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            429 => Self::RateLimited,
            404 => Self::NotFound,
            code if code >= 500 => Self::Server(status),
            _ => Self::Unknown(format!("unexpected status {status}").into()),
        }
    }

    /// Classify an in-band response code; `None` means the body is usable.
    #[must_use]
    pub fn from_response_code(code: ResponseCode) -> Option<Self> {
        match code {
            ResponseCode::Success => None,
            ResponseCode::RateLimit => Some(Self::RateLimited),
            other => Some(Self::Domain(other)),
        }
    }

    /// The in-band code carried by a domain failure, if any.
    #[must_use]
    pub fn response_code(&self) -> Option<ResponseCode> {
        match self {
            Self::Domain(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TriviaError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status)
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || status == reqwest::StatusCode::NOT_FOUND
                    || status.is_server_error() =>
            {
                Self::from_status(status)
            }
            _ => Self::Unknown(Box::new(err)),
        }
    }
}

impl From<ModelError> for TriviaError {
    fn from(err: ModelError) -> Self {
        Self::Unknown(Box::new(err))
    }
}

/// Errors surfaced by `QuizController` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ModelError),
    #[error("the question bank returned no questions")]
    EmptyResult,
    #[error(transparent)]
    Bank(#[from] TriviaError),
}
