use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use quiz_core::model::{
    Category, CategoryCount, CategoryId, GlobalCount, Question, QuestionQuery, ResponseCode,
    SessionToken,
};

use crate::config::TriviaConfig;
use crate::error::TriviaError;
use crate::rate_limit::RateLimiter;

/// Operations offered by a remote question bank.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Fetch a batch of questions. Amounts are passed through unchecked.
    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, TriviaError>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, TriviaError>;

    async fn fetch_category_count(
        &self,
        category: CategoryId,
    ) -> Result<CategoryCount, TriviaError>;

    async fn fetch_global_count(&self) -> Result<GlobalCount, TriviaError>;

    async fn request_session_token(&self) -> Result<SessionToken, TriviaError>;

    async fn reset_session_token(&self, token: &SessionToken) -> Result<(), TriviaError>;
}

/// HTTP client for the Open Trivia Database.
///
/// Clones share the same rate limiter, since the bank's limit applies to the
/// whole process rather than to a single endpoint.
#[derive(Clone)]
pub struct TriviaClient {
    client: Client,
    config: TriviaConfig,
    limiter: Arc<RateLimiter>,
}

impl TriviaClient {
    #[must_use]
    pub fn new(config: TriviaConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.min_interval));
        Self {
            client: Client::new(),
            config,
            limiter,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(TriviaConfig::from_env())
    }

    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Throttle, dispatch one GET, and normalize the outcome.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &'static str,
        params: &[(&str, String)],
    ) -> Result<T, TriviaError> {
        let waited = self.limiter.acquire().await;
        debug!(
            endpoint = path,
            waited_ms = waited.as_millis(),
            "dispatching question bank request"
        );

        let mut request = self.client.get(self.config.endpoint(path)).query(params);
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| {
            warn!(endpoint = path, error = %err, "question bank request failed");
            TriviaError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = path, %status, "question bank returned an error status");
            return Err(TriviaError::from_status(status));
        }

        let envelope: Envelope<T> = response.json().await?;
        if let Some(raw) = envelope.response_code {
            let code = ResponseCode::from_u8(raw)?;
            if let Some(err) = TriviaError::from_response_code(code) {
                warn!(endpoint = path, code = raw, "question bank rejected the request");
                return Err(err);
            }
        }
        Ok(envelope.body)
    }
}

#[async_trait]
impl QuestionBank for TriviaClient {
    async fn fetch_questions(&self, query: &QuestionQuery) -> Result<Vec<Question>, TriviaError> {
        let body: QuestionsBody = self.get("api.php", &query.params()).await?;
        debug!(count = body.results.len(), "received questions");
        Ok(body.results)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, TriviaError> {
        let body: CategoriesBody = self.get("api_category.php", &[]).await?;
        Ok(body.trivia_categories)
    }

    async fn fetch_category_count(
        &self,
        category: CategoryId,
    ) -> Result<CategoryCount, TriviaError> {
        let body: CategoryCountBody = self
            .get("api_count.php", &[("category", category.to_string())])
            .await?;
        Ok(body.category_question_count)
    }

    async fn fetch_global_count(&self) -> Result<GlobalCount, TriviaError> {
        self.get("api_count_global.php", &[]).await
    }

    async fn request_session_token(&self) -> Result<SessionToken, TriviaError> {
        let body: TokenBody = self
            .get("api_token.php", &[("command", "request".to_string())])
            .await?;
        body.token
            .filter(|token| !token.is_empty())
            .map(SessionToken::new)
            .ok_or_else(|| TriviaError::Unknown("token missing from response".into()))
    }

    async fn reset_session_token(&self, token: &SessionToken) -> Result<(), TriviaError> {
        let _: TokenBody = self
            .get(
                "api_token.php",
                &[
                    ("command", "reset".to_string()),
                    ("token", token.as_str().to_string()),
                ],
            )
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    response_code: Option<u8>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct QuestionsBody {
    #[serde(default)]
    results: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct CategoriesBody {
    trivia_categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct CategoryCountBody {
    category_question_count: CategoryCount,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    token: Option<String>,
}
