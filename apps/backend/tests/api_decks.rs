//! Deck and card management API tests.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use common::fixtures;
use common::TestContext;

/// Test list decks is empty on a fresh store.
#[tokio::test]
async fn test_list_decks_empty() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/decks").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["decks"].as_array().unwrap().is_empty());
}

/// Test creating a deck trims the name.
#[tokio::test]
async fn test_create_deck() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/decks")
        .json(&fixtures::create_deck_request("  Capitals "))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Capitals");

    let list: serde_json::Value = server.get("/api/decks").await.json();
    assert_eq!(list["decks"].as_array().unwrap().len(), 1);
}

/// Test blank deck names are rejected.
#[tokio::test]
async fn test_create_deck_blank_name() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/decks")
        .json(&fixtures::create_deck_request("   "))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "bad_request");
}

/// Test deck detail lists its cards.
#[tokio::test]
async fn test_get_deck_with_cards() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (deck, _) = ctx.create_deck_with_cards("Spanish", 3).await;

    let response = server.get(&format!("/api/decks/{}", deck.id)).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["deck"]["name"], "Spanish");
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0]["stage"], "learning");
    assert_eq!(cards[0]["ease"], 1);
}

/// Test unknown deck returns not found.
#[tokio::test]
async fn test_get_deck_not_found() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/decks/999").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "not_found");
}

/// Test a non-numeric id is a client error.
#[tokio::test]
async fn test_get_deck_invalid_id() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/api/decks/abc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test deleting a deck removes its cards.
#[tokio::test]
async fn test_delete_deck_cascades() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (deck, cards) = ctx.create_deck_with_cards("Temp", 2).await;

    let response = server.delete(&format!("/api/decks/{}", deck.id)).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["deleted"], deck.id);

    server
        .get(&format!("/api/decks/{}", deck.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let edit = server
        .put(&format!("/api/cards/{}", cards[0].id))
        .json(&fixtures::edit_card_request("q", "a", None))
        .await;
    edit.assert_status(StatusCode::NOT_FOUND);
}

/// Test creating a card in a deck.
#[tokio::test]
async fn test_create_card() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (deck, _) = ctx.create_deck_with_cards("Capitals", 0).await;

    let response = server
        .post(&format!("/api/decks/{}/cards", deck.id))
        .json(&fixtures::create_card_request(" Capital of France? ", " Paris "))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["question"], "Capital of France?");
    assert_eq!(body["answer"], "Paris");
    assert_eq!(body["deck_id"], deck.id);
    assert_eq!(body["stage"], "learning");
    assert_eq!(body["correct"], 0);
}

/// Test creating a card with an empty answer fails.
#[tokio::test]
async fn test_create_card_empty_answer() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (deck, _) = ctx.create_deck_with_cards("Capitals", 0).await;

    let response = server
        .post(&format!("/api/decks/{}/cards", deck.id))
        .json(&fixtures::create_card_request("Capital of France?", ""))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test creating a card in a missing deck fails.
#[tokio::test]
async fn test_create_card_missing_deck() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/decks/77/cards")
        .json(&fixtures::create_card_request("q", "a"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

/// Test editing a card keeps its schedule.
#[tokio::test]
async fn test_edit_card() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (_, cards) = ctx.create_deck_with_cards("Capitals", 1).await;
    let card = ctx
        .make_due_review(cards[0].id, 4, chrono::Duration::minutes(5))
        .await;

    let response = server
        .put(&format!("/api/cards/{}", card.id))
        .json(&fixtures::edit_card_request("Capital of Peru?", "Lima", Some("South America")))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["question"], "Capital of Peru?");
    assert_eq!(body["extra"], "South America");
    assert_eq!(body["stage"], "review");
    assert_eq!(body["ease"], 4);
}

/// Test deleting a card.
#[tokio::test]
async fn test_delete_card() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (deck, cards) = ctx.create_deck_with_cards("Capitals", 2).await;

    server
        .delete(&format!("/api/cards/{}", cards[0].id))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server.get(&format!("/api/decks/{}", deck.id)).await.json();
    assert_eq!(body["cards"].as_array().unwrap().len(), 1);

    server
        .delete(&format!("/api/cards/{}", cards[0].id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Test batch import creates cards and reports skipped lines.
#[tokio::test]
async fn test_batch_add() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let (deck, _) = ctx.create_deck_with_cards("Batch", 0).await;

    let text = format!("{}\nnot a card\n", fixtures::sample_batch_text(4));
    let response = server
        .post(&format!("/api/decks/{}/batch", deck.id))
        .json(&fixtures::batch_request(&text))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cards_added_count"], 4);
    assert_eq!(body["skipped_lines"], serde_json::json!([5]));
    assert_eq!(body["cards"][0]["answer"], "Answer 1");
}

/// Test health endpoint.
#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}
