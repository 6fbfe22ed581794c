//! Test helpers: a fake Gemini upstream and an in-process extraction server.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use taskmaster::api::{router, AppState};
use taskmaster::Config;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

/// Gemini envelope carrying `text` as the generated reply.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": text }],
                "role": "model"
            },
            "finishReason": "STOP",
            "index": 0
        }]
    })
}

/// Mount a generateContent mock answering with `text`, expected `times` times.
pub async fn mount_reply(upstream: &MockServer, text: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(text)))
        .expect(times)
        .mount(upstream)
        .await;
}

/// Mount a generateContent mock answering with a raw response.
pub async fn mount_response(upstream: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(response)
        .expect(times)
        .mount(upstream)
        .await;
}

/// Start the extraction server against `upstream` and return its base URL.
pub async fn spawn_app(api_key: Option<&str>, upstream: &MockServer) -> String {
    let config = Config::new(api_key.map(str::to_string), upstream.uri());
    let state = Arc::new(AppState::from_config(&config).expect("state should build"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("server should run");
    });

    format!("http://{}", addr)
}
