use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use quiz_core::model::{CategoryId, Difficulty, QuestionQuery, QuestionType};

use super::state::QuizState;
use crate::error::QuizError;
use crate::trivia_client::QuestionBank;

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub is_complete: bool,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns a quiz session and is the only writer of its state.
///
/// Every mutation publishes a fresh snapshot to subscribers.
pub struct QuizController {
    bank: Arc<dyn QuestionBank>,
    state: QuizState,
    publisher: watch::Sender<QuizState>,
}

impl QuizController {
    #[must_use]
    pub fn new(bank: Arc<dyn QuestionBank>) -> Self {
        let (publisher, _) = watch::channel(QuizState::default());
        Self {
            bank,
            state: QuizState::default(),
            publisher,
        }
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// Receive a snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizState> {
        self.publisher.subscribe()
    }

    /// Load the category list once per session.
    ///
    /// Failures are recorded in `last_error` and not returned.
    pub async fn load_categories(&mut self) {
        if !self.state.categories.is_empty() {
            debug!("categories already cached");
            return;
        }

        let mut state = LoadingGuard::begin(&mut self.state, &self.publisher);
        match self.bank.fetch_categories().await {
            Ok(categories) => {
                info!(count = categories.len(), "loaded categories");
                state.categories = categories;
            }
            Err(err) => {
                warn!(error = %err, "failed to load categories");
                state.last_error = Some(err.to_string());
            }
        }
    }

    /// Replace the session's questions with a fresh batch.
    ///
    /// The held session token, if any, is sent along so the bank skips
    /// questions it has already served.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Validation` for an amount outside 1..=50 (before
    /// any request), `QuizError::EmptyResult` when the bank sends nothing,
    /// and `QuizError::Bank` for client failures. The message is also kept
    /// in `last_error`.
    pub async fn load_questions(
        &mut self,
        amount: u32,
        category: Option<CategoryId>,
        difficulty: Option<Difficulty>,
        kind: Option<QuestionType>,
    ) -> Result<(), QuizError> {
        let query = QuestionQuery::new(amount)
            .with_category(category)
            .with_difficulty(difficulty)
            .with_kind(kind)
            .with_token(self.state.session_token.clone());

        if let Err(err) = query.validate_amount() {
            let err = QuizError::from(err);
            self.state.last_error = Some(err.to_string());
            self.publish();
            return Err(err);
        }

        let mut state = LoadingGuard::begin(&mut self.state, &self.publisher);
        let result = match self.bank.fetch_questions(&query).await {
            Ok(questions) if questions.is_empty() => Err(QuizError::EmptyResult),
            Ok(questions) => Ok(questions),
            Err(err) => Err(QuizError::Bank(err)),
        };

        match result {
            Ok(questions) => {
                info!(count = questions.len(), "loaded questions");
                state.clear_questions();
                state.questions = questions;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load questions");
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Obtain a session token unless one is already held.
    ///
    /// A session works without a token, so failures are only recorded.
    pub async fn ensure_session_token(&mut self) {
        if self.state.session_token.is_some() {
            return;
        }

        self.state.last_error = None;
        match self.bank.request_session_token().await {
            Ok(token) => {
                debug!(?token, "acquired session token");
                self.state.session_token = Some(token);
            }
            Err(err) => {
                warn!(error = %err, "failed to acquire session token");
                self.state.last_error = Some(err.to_string());
            }
        }
        self.publish();
    }

    /// Invalidate the held token with the bank and forget it locally.
    ///
    /// The local token is cleared even when the bank call fails.
    pub async fn reset_session_token(&mut self) {
        let Some(token) = self.state.session_token.take() else {
            return;
        };

        self.state.last_error = None;
        if let Err(err) = self.bank.reset_session_token(&token).await {
            warn!(error = %err, "failed to reset session token");
            self.state.last_error = Some(err.to_string());
        }
        self.publish();
    }

    /// Score `answer` against the current question and move on.
    ///
    /// Returns `None` when there is no question to answer: the quiz is empty
    /// or the last question was already answered. The index never moves past
    /// the last question.
    pub fn answer_current_question(&mut self, answer: &str) -> Option<AnswerOutcome> {
        if self.state.is_complete() {
            return None;
        }
        let question = self.state.current_question()?;
        let correct = question.is_correct(answer);
        let correct_answer = question.correct_answer().to_string();

        self.state.last_error = None;
        if correct {
            self.state.score += 1;
        }
        self.state.answered += 1;
        if !self.state.is_last_question() {
            self.state.current_index += 1;
        }

        let is_complete = self.state.is_complete();
        debug!(
            correct,
            score = self.state.score,
            index = self.state.current_index,
            "answered question"
        );
        if is_complete {
            info!(
                score = self.state.score,
                total = self.state.total_questions(),
                "quiz complete"
            );
        }
        self.publish();

        Some(AnswerOutcome {
            correct,
            correct_answer,
            is_complete,
        })
    }

    /// Drop the current questions and score.
    ///
    /// Categories and the session token are kept.
    pub fn reset_quiz(&mut self) {
        self.state.clear_questions();
        self.state.last_error = None;
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}

impl fmt::Debug for QuizController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizController")
            .field("questions_len", &self.state.questions.len())
            .field("current_index", &self.state.current_index)
            .field("score", &self.state.score)
            .field("loading", &self.state.loading)
            .finish_non_exhaustive()
    }
}

//
// ─── LOADING GUARD ─────────────────────────────────────────────────────────────
//

/// Holds `loading = true` for the lifetime of a fetch.
///
/// Dropping the guard clears the flag and publishes, so it is reset on
/// success, failure and when the operation's future is cancelled.
struct LoadingGuard<'a> {
    state: &'a mut QuizState,
    publisher: &'a watch::Sender<QuizState>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a mut QuizState, publisher: &'a watch::Sender<QuizState>) -> Self {
        state.loading = true;
        state.last_error = None;
        publisher.send_replace(state.clone());
        Self { state, publisher }
    }
}

impl Deref for LoadingGuard<'_> {
    type Target = QuizState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for LoadingGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.loading = false;
        self.publisher.send_replace(self.state.clone());
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{
        Category, CategoryCount, GlobalCount, Question, ResponseCode, SessionToken,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::error::TriviaError;

    type Scripted<T> = Mutex<VecDeque<Result<T, TriviaError>>>;

    #[derive(Default)]
    struct ScriptedBank {
        questions: Scripted<Vec<Question>>,
        categories: Scripted<Vec<Category>>,
        tokens: Scripted<SessionToken>,
        resets: Scripted<()>,
        question_calls: AtomicUsize,
        category_calls: AtomicUsize,
        reset_calls: AtomicUsize,
        last_query: Mutex<Option<QuestionQuery>>,
        stall: bool,
    }

    impl ScriptedBank {
        fn with_questions(self, result: Result<Vec<Question>, TriviaError>) -> Self {
            self.questions.lock().unwrap().push_back(result);
            self
        }

        fn with_categories(self, result: Result<Vec<Category>, TriviaError>) -> Self {
            self.categories.lock().unwrap().push_back(result);
            self
        }

        fn with_token(self, result: Result<SessionToken, TriviaError>) -> Self {
            self.tokens.lock().unwrap().push_back(result);
            self
        }

        fn with_reset(self, result: Result<(), TriviaError>) -> Self {
            self.resets.lock().unwrap().push_back(result);
            self
        }

        fn next<T>(queue: &Scripted<T>) -> Result<T, TriviaError> {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TriviaError::Unknown("unscripted call".into())))
        }
    }

    #[async_trait]
    impl QuestionBank for ScriptedBank {
        async fn fetch_questions(
            &self,
            query: &QuestionQuery,
        ) -> Result<Vec<Question>, TriviaError> {
            self.question_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            Self::next(&self.questions)
        }

        async fn fetch_categories(&self) -> Result<Vec<Category>, TriviaError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            if self.stall {
                std::future::pending::<()>().await;
            }
            Self::next(&self.categories)
        }

        async fn fetch_category_count(
            &self,
            _category: CategoryId,
        ) -> Result<CategoryCount, TriviaError> {
            Ok(CategoryCount::default())
        }

        async fn fetch_global_count(&self) -> Result<GlobalCount, TriviaError> {
            Ok(GlobalCount::default())
        }

        async fn request_session_token(&self) -> Result<SessionToken, TriviaError> {
            Self::next(&self.tokens)
        }

        async fn reset_session_token(&self, _token: &SessionToken) -> Result<(), TriviaError> {
            self.reset_calls.fetch_add(1, Ordering::SeqCst);
            Self::next(&self.resets)
        }
    }

    fn build_question(i: usize) -> Question {
        Question::new(
            "General Knowledge",
            QuestionType::Multiple,
            Difficulty::Medium,
            format!("Question {i}?"),
            format!("right {i}"),
            vec![format!("wrong {i}a"), format!("wrong {i}b"), format!("wrong {i}c")],
        )
        .unwrap()
    }

    fn build_questions(n: usize) -> Vec<Question> {
        (0..n).map(build_question).collect()
    }

    fn categories() -> Vec<Category> {
        vec![Category {
            id: CategoryId::new(9),
            name: "General Knowledge".to_string(),
        }]
    }

    fn controller(bank: ScriptedBank) -> (QuizController, Arc<ScriptedBank>) {
        let bank = Arc::new(bank);
        let controller = QuizController::new(Arc::clone(&bank) as Arc<dyn QuestionBank>);
        (controller, bank)
    }

    async fn loaded(n: usize) -> QuizController {
        let (mut controller, _) =
            controller(ScriptedBank::default().with_questions(Ok(build_questions(n))));
        controller.load_questions(n as u32, None, None, None).await.unwrap();
        controller
    }

    #[tokio::test]
    async fn out_of_range_amount_is_rejected_without_network() {
        let (mut controller, bank) = controller(ScriptedBank::default());

        for amount in [0, 51, 1000] {
            let err = controller
                .load_questions(amount, None, None, None)
                .await
                .unwrap_err();
            assert!(matches!(err, QuizError::Validation(_)));
            assert_eq!(controller.state().last_error(), Some(err.to_string().as_str()));
            assert!(!controller.state().loading());
        }
        assert_eq!(bank.question_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_load_resets_position_and_score() {
        let (mut controller, _) = controller(
            ScriptedBank::default()
                .with_questions(Ok(build_questions(3)))
                .with_questions(Ok(build_questions(5))),
        );
        controller.load_questions(3, None, None, None).await.unwrap();
        controller.answer_current_question("right 0");
        controller.answer_current_question("right 1");
        assert_eq!(controller.state().score(), 2);

        controller.load_questions(5, None, None, None).await.unwrap();
        let state = controller.state();
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.answered(), 0);
        assert_eq!(state.total_questions(), 5);
        assert!(!state.loading());
        assert!(state.last_error().is_none());
    }

    #[tokio::test]
    async fn score_never_exceeds_answered_questions() {
        let mut controller = loaded(4).await;
        for i in 0..10 {
            controller.answer_current_question(&format!("right {i}"));
            let state = controller.state();
            assert!(state.score() as usize <= state.current_index() + 1);
        }
        assert_eq!(controller.state().score(), 4);
        assert!(controller.state().is_complete());
    }

    #[tokio::test]
    async fn answering_last_question_keeps_index() {
        let mut controller = loaded(2).await;
        let first = controller.answer_current_question("wrong").unwrap();
        assert!(!first.correct);
        assert_eq!(first.correct_answer, "right 0");
        assert!(controller.state().is_last_question());

        let last = controller.answer_current_question("right 1").unwrap();
        assert!(last.correct);
        assert!(last.is_complete);
        assert_eq!(controller.state().current_index(), 1);

        assert!(controller.answer_current_question("right 1").is_none());
        assert_eq!(controller.state().current_index(), 1);
        assert_eq!(controller.state().score(), 1);
    }

    #[test]
    fn answering_an_empty_quiz_is_a_no_op() {
        let (mut controller, _) = controller(ScriptedBank::default());
        assert!(controller.answer_current_question("anything").is_none());
        assert_eq!(controller.state().score(), 0);
        assert_eq!(controller.state().current_index(), 0);
    }

    #[tokio::test]
    async fn progress_after_one_answer_of_ten() {
        let mut controller = loaded(10).await;
        controller.answer_current_question("right 0");
        assert_eq!(controller.state().progress(), 20.0);

        let summary = controller.state().progress_summary();
        assert_eq!(summary.position, 2);
        assert_eq!(summary.answered, 1);
        assert_eq!(summary.score, 1);
    }

    #[tokio::test]
    async fn categories_are_fetched_once() {
        let (mut controller, bank) =
            controller(ScriptedBank::default().with_categories(Ok(categories())));
        controller.load_categories().await;
        controller.load_categories().await;

        assert_eq!(bank.category_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state().categories(), categories().as_slice());
    }

    #[tokio::test]
    async fn category_failure_is_recorded_not_raised() {
        let (mut controller, bank) = controller(
            ScriptedBank::default()
                .with_categories(Err(TriviaError::Server(reqwest::StatusCode::BAD_GATEWAY)))
                .with_categories(Ok(categories())),
        );
        controller.load_categories().await;
        assert!(controller.state().last_error().is_some());
        assert!(!controller.state().loading());
        assert!(controller.state().categories().is_empty());

        controller.load_categories().await;
        assert!(controller.state().last_error().is_none());
        assert_eq!(bank.category_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reset_quiz_keeps_categories_and_token() {
        let (mut controller, _) = controller(
            ScriptedBank::default()
                .with_categories(Ok(categories()))
                .with_token(Ok(SessionToken::new("token-1")))
                .with_questions(Ok(build_questions(3))),
        );
        controller.load_categories().await;
        controller.ensure_session_token().await;
        controller.load_questions(3, None, None, None).await.unwrap();
        controller.answer_current_question("right 0");

        controller.reset_quiz();
        let state = controller.state();
        assert!(state.questions().is_empty());
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.score(), 0);
        assert!(state.last_error().is_none());
        assert_eq!(state.categories().len(), 1);
        assert_eq!(state.session_token(), Some(&SessionToken::new("token-1")));
    }

    #[tokio::test]
    async fn not_enough_questions_is_raised_and_recorded() {
        let (mut controller, _) = controller(
            ScriptedBank::default()
                .with_questions(Err(TriviaError::Domain(ResponseCode::NoResults))),
        );
        let err = controller
            .load_questions(50, Some(CategoryId::new(13)), Some(Difficulty::Hard), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            QuizError::Bank(TriviaError::Domain(ResponseCode::NoResults))
        ));
        assert_eq!(
            controller.state().last_error(),
            Some("not enough matching questions")
        );
        assert!(controller.state().questions().is_empty());
        assert!(!controller.state().loading());
    }

    #[tokio::test]
    async fn rate_limited_fetch_tells_caller_to_wait() {
        let (mut controller, _) =
            controller(ScriptedBank::default().with_questions(Err(TriviaError::RateLimited)));
        let err = controller.load_questions(10, None, None, None).await.unwrap_err();

        assert!(err.to_string().contains("wait"));
        assert!(controller.state().last_error().unwrap().contains("wait"));
        assert!(!controller.state().loading());
    }

    #[tokio::test]
    async fn empty_result_is_a_failure() {
        let (mut controller, _) = controller(ScriptedBank::default().with_questions(Ok(Vec::new())));
        let err = controller.load_questions(5, None, None, None).await.unwrap_err();
        assert!(matches!(err, QuizError::EmptyResult));
        assert!(controller.state().last_error().is_some());
        assert!(controller.state().questions().is_empty());
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_questions() {
        let (mut controller, _) = controller(
            ScriptedBank::default()
                .with_questions(Ok(build_questions(2)))
                .with_questions(Err(TriviaError::NotFound)),
        );
        controller.load_questions(2, None, None, None).await.unwrap();
        controller.answer_current_question("right 0");

        assert!(controller.load_questions(2, None, None, None).await.is_err());
        assert_eq!(controller.state().total_questions(), 2);
        assert_eq!(controller.state().score(), 1);
    }

    #[tokio::test]
    async fn session_token_is_requested_once_and_sent_with_queries() {
        let (mut controller, bank) = controller(
            ScriptedBank::default()
                .with_token(Ok(SessionToken::new("abc123")))
                .with_questions(Ok(build_questions(1))),
        );
        controller.ensure_session_token().await;
        controller.ensure_session_token().await;
        assert!(controller.state().last_error().is_none());

        controller.load_questions(1, None, None, None).await.unwrap();
        let query = bank.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.token, Some(SessionToken::new("abc123")));
    }

    #[tokio::test]
    async fn token_failure_degrades_gracefully() {
        let (mut controller, _) =
            controller(ScriptedBank::default().with_token(Err(TriviaError::RateLimited)));
        controller.ensure_session_token().await;
        assert!(controller.state().session_token().is_none());
        assert!(controller.state().last_error().is_some());
    }

    #[tokio::test]
    async fn reset_token_clears_local_state_even_on_failure() {
        let (mut controller, bank) = controller(
            ScriptedBank::default()
                .with_token(Ok(SessionToken::new("abc123")))
                .with_reset(Err(TriviaError::Domain(ResponseCode::TokenNotFound))),
        );
        controller.reset_session_token().await;
        assert_eq!(bank.reset_calls.load(Ordering::SeqCst), 0);

        controller.ensure_session_token().await;
        controller.reset_session_token().await;
        assert_eq!(bank.reset_calls.load(Ordering::SeqCst), 1);
        assert!(controller.state().session_token().is_none());
        assert_eq!(
            controller.state().last_error(),
            Some("session token not found")
        );
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let mut controller = loaded(3).await;
        let mut rx = controller.subscribe();
        rx.mark_unchanged();

        controller.answer_current_question("right 0");
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.score(), 1);
        assert_eq!(snapshot.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_fetch_clears_loading() {
        let (mut controller, _) = controller(ScriptedBank {
            stall: true,
            ..ScriptedBank::default()
        });
        let rx = controller.subscribe();

        tokio::select! {
            () = controller.load_categories() => panic!("stalled bank returned"),
            () = tokio::time::sleep(Duration::from_secs(1)) => {}
        }

        assert!(!controller.state().loading());
        assert!(!rx.borrow().loading());
    }
}
