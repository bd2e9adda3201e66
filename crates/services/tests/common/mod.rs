use std::time::Duration;

use axum::Router;
use serde_json::{Value, json};
use services::{TriviaClient, TriviaConfig};
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_bank(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// Client against a local bank with throttling disabled.
pub fn client_for(base_url: &str) -> TriviaClient {
    TriviaClient::new(
        TriviaConfig::default()
            .with_base_url(base_url)
            .with_min_interval(Duration::ZERO),
    )
}

pub fn question_json(i: usize) -> Value {
    json!({
        "category": "Science: Computers",
        "type": "multiple",
        "difficulty": "easy",
        "question": format!("Question {i}?"),
        "correct_answer": format!("right {i}"),
        "incorrect_answers": [format!("wrong {i}a"), format!("wrong {i}b"), format!("wrong {i}c")]
    })
}

pub fn questions_body(n: usize) -> Value {
    json!({
        "response_code": 0,
        "results": (0..n).map(question_json).collect::<Vec<_>>()
    })
}
