//! Generation API tests.
//!
//! The test context carries no API key, so these tests cover request
//! validation and the configuration failure path without network access.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use uuid::Uuid;

use common::fixtures;
use common::TestContext;

/// Test generating without a configured key is a server-side config error.
#[tokio::test]
async fn test_generate_without_key_is_a_config_error() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let deck = ctx.create_deck("Astronomy");

    let response = server
        .post(&format!("/api/decks/{}/generate", deck.id))
        .json(&fixtures::generate_topic_request("the moons of Jupiter", 3))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "configuration_error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("GEMINI_API_KEY"));
}

/// Test generating into an unknown deck.
#[tokio::test]
async fn test_generate_unknown_deck() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post(&format!("/api/decks/{}/generate", Uuid::new_v4()))
        .json(&fixtures::generate_topic_request("anything", 3))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test an unknown generation mode is rejected at the request layer.
#[tokio::test]
async fn test_generate_rejects_unknown_mode() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let deck = ctx.create_deck("Astronomy");

    let response = server
        .post(&format!("/api/decks/{}/generate", deck.id))
        .json(&json!({ "mode": "recite", "topic": "anything" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

/// Test a blank topic is rejected before any model call.
#[tokio::test]
async fn test_generate_rejects_blank_topic() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let deck = ctx.create_deck("Astronomy");

    let response = server
        .post(&format!("/api/decks/{}/generate", deck.id))
        .json(&fixtures::generate_topic_request("   ", 3))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test an empty word list is rejected before any model call.
#[tokio::test]
async fn test_generate_rejects_empty_word_list() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();
    let deck = ctx.create_deck("Astronomy");

    let response = server
        .post(&format!("/api/decks/{}/generate", deck.id))
        .json(&fixtures::generate_words_request(&[]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
