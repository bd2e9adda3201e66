use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ModelError;

/// Opaque token the bank uses to avoid repeating questions within a session.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in logs; only show a short prefix.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionToken({prefix}…)")
    }
}

//
// ─── RESPONSE CODE ─────────────────────────────────────────────────────────────
//

/// In-band status the bank embeds in otherwise successful responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Success,
    /// Not enough questions match the query.
    NoResults,
    /// An argument was rejected by the bank.
    InvalidParameter,
    TokenNotFound,
    /// The token has served every matching question and needs a reset.
    TokenEmpty,
    RateLimit,
}

impl ResponseCode {
    /// Maps the numeric wire code.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownResponseCode` for codes outside 0-5.
    pub fn from_u8(value: u8) -> Result<Self, ModelError> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::NoResults),
            2 => Ok(Self::InvalidParameter),
            3 => Ok(Self::TokenNotFound),
            4 => Ok(Self::TokenEmpty),
            5 => Ok(Self::RateLimit),
            _ => Err(ModelError::UnknownResponseCode(value)),
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            ResponseCode::Success => 0,
            ResponseCode::NoResults => 1,
            ResponseCode::InvalidParameter => 2,
            ResponseCode::TokenNotFound => 3,
            ResponseCode::TokenEmpty => 4,
            ResponseCode::RateLimit => 5,
        }
    }

    /// Human-readable explanation of the code.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ResponseCode::Success => "request succeeded",
            ResponseCode::NoResults => "not enough matching questions",
            ResponseCode::InvalidParameter => "invalid parameters",
            ResponseCode::TokenNotFound => "session token not found",
            ResponseCode::TokenEmpty => "session token expired or exhausted, reset it",
            ResponseCode::RateLimit => "too many requests, wait a few seconds and retry",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message(), self.as_u8())
    }
}
