//! End-to-end tests: router, services and repository over in-memory SQLite.

use std::net::TcpListener as StdListener;

use axum::http::StatusCode;
use clap::Parser;
use serde_json::json;
use serial_test::serial;
use tokio_util::sync::CancellationToken;

use super::testing::{get, json_body, post_json, send};
use super::{ApiError, AppState, create_router, run};
use crate::clock::FixedClocker;
use crate::config::Config;
use crate::store::testing::memory_pool;

async fn test_app(list_created_at: bool, docs: bool) -> axum::Router {
    let state = AppState::from_pool(memory_pool().await, FixedClocker)
        .with_list_created_at(list_created_at);
    create_router(state, docs)
}

fn test_config(port: u16) -> Config {
    let port = port.to_string();
    Config::try_parse_from([
        "blog-api",
        "--host",
        "127.0.0.1",
        "--port",
        port.as_str(),
        "--db-url",
        "sqlite::memory:",
        "--db-max-retries",
        "1",
    ])
    .expect("valid test configuration")
}

#[tokio::test(flavor = "multi_thread")]
async fn posted_article_is_listed_as_draft() {
    let app = test_app(false, false).await;

    let response = send(
        app.clone(),
        post_json("/articles", r#"{"title":"t","status":"draft"}"#),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = json_body(response).await["id"].as_i64().expect("integer id");

    let response = send(app, get("/articles")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!([{"id": id, "title": "t", "status": "draft"}])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn requested_status_does_not_override_draft() {
    let app = test_app(false, false).await;

    send(
        app.clone(),
        post_json("/articles", r#"{"title":"t","status":"published"}"#),
    )
    .await;

    let body = json_body(send(app, get("/articles")).await).await;
    assert_eq!(body[0]["status"], "draft");
}

#[tokio::test(flavor = "multi_thread")]
async fn articles_are_listed_in_insertion_order_with_timestamps() {
    let app = test_app(true, false).await;

    for title in ["first", "second", "third"] {
        let body = format!(r#"{{"title":"{}","status":"draft"}}"#, title);
        send(app.clone(), post_json("/articles", body)).await;
    }

    let body = json_body(send(app, get("/articles")).await).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
    assert_eq!(body[0]["created_at"], "2024-09-24 12:34:56");
}

#[tokio::test(flavor = "multi_thread")]
async fn registering_same_name_twice_conflicts() {
    let app = test_app(false, false).await;
    let user = r#"{"name":"alice","password":"secret","role":"admin"}"#;

    let first = send(app.clone(), post_json("/register", user)).await;
    let second = send(app, post_json("/register", user)).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread")]
async fn docs_are_mounted_only_when_enabled() {
    let with_docs = send(test_app(false, true).await, get("/docs")).await;
    let without_docs = send(test_app(false, false).await, get("/docs")).await;

    assert_eq!(with_docs.status(), StatusCode::OK);
    assert_eq!(without_docs.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn run_stops_cleanly_when_cancelled() {
    let port = {
        let spare = StdListener::bind("127.0.0.1:0").unwrap();
        spare.local_addr().unwrap().port()
    };
    let token = CancellationToken::new();
    let handle = tokio::spawn(run(test_config(port), token.clone()));

    let mut up = false;
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            up = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    assert!(up, "server never started listening");

    token.cancel();
    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn run_reports_bind_failure() {
    let taken = StdListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let result = run(test_config(port), CancellationToken::new()).await;

    assert!(matches!(result, Err(ApiError::Bind { .. })));
}
