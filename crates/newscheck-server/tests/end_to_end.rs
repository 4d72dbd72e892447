//! Drives a real listener over TCP, the way a browser client would.

use std::path::PathBuf;

use newscheck_server::{AppState, NEWS_CHECKER_PATH, serve};
use serde_json::{Value, json};
use tokio::net::TcpListener;

fn demo_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("models")
        .join("demo")
}

async fn spawn_server() -> String {
    let state = AppState::load(&demo_dir()).expect("demo artifacts load");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(listener, state, None).await.unwrap();
    });
    format!("http://{addr}{NEWS_CHECKER_PATH}")
}

#[tokio::test]
async fn post_returns_prediction_with_cors_header() {
    let url = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(&url)
        .header("Origin", "http://example.org")
        .json(&json!({"text": "BREAKING NEWS!!!"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let body: Value = resp.json().await.unwrap();
    let status = body["news-status"].as_str().unwrap();
    assert!(status == "Fake" || status == "Real");
    let fake = body["probabilities"]["Fake"].as_f64().unwrap();
    let real = body["probabilities"]["Real"].as_f64().unwrap();
    assert!((fake + real - 1.0).abs() <= 0.001 + 1e-12);
}

#[tokio::test]
async fn repeated_requests_are_deterministic() {
    let url = spawn_server().await;
    let client = reqwest::Client::new();
    let payload = json!({"text": "<p>Government announced the data, a spokesperson told reporters.</p>"});

    let mut bodies = Vec::new();
    for _ in 0..3 {
        let body: Value = client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
    assert_eq!(bodies[0]["news-status"], "Real");
}

#[tokio::test]
async fn missing_text_is_a_client_error() {
    let url = spawn_server().await;
    let resp = reqwest::Client::new()
        .post(&url)
        .json(&json!({"content": "wrong key"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "missing_field");
}
