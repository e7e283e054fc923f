//! Router tests against an in-memory SQLite ledger.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode},
};
use jansou_core::ledger::{Ledger, Rules};
use jansou_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  api_router(Arc::new(Ledger::new(Arc::new(store), Rules::default())))
}

async fn call(
  app: &Router,
  method: Method,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(b) => builder
      .header("content-type", "application/json")
      .body(Body::from(b.to_string())),
    None => builder.body(Body::empty()),
  }
  .unwrap();

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

/// Create a title and a four-player game; returns `(title_id, game_uri)`.
async fn seated_game(app: &Router) -> (String, String) {
  let (status, title) =
    call(app, Method::POST, "/titles", Some(json!({ "name": "League" }))).await;
  assert_eq!(status, StatusCode::CREATED);
  let title_id = title["title_id"].as_str().unwrap().to_owned();

  let (status, game) = call(
    app,
    Method::POST,
    &format!("/titles/{title_id}/games"),
    Some(json!({
      "name": "table 1",
      "seats": [
        { "kind": "new", "value": "Aoi" },
        { "kind": "new", "value": "Ben" },
        { "kind": "new", "value": "Chie" },
        { "kind": "new", "value": "Dai" },
      ],
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let game_id = game["game_id"].as_str().unwrap();
  let uri = format!("/titles/{title_id}/games/{game_id}");
  (title_id, uri)
}

fn entries(scores: [i64; 4], winds: [&str; 4]) -> Value {
  let entries: Vec<Value> = scores
    .iter()
    .zip(winds)
    .map(|(score, wind)| json!({ "score": score, "wind": wind }))
    .collect();
  json!({ "entries": entries })
}

#[tokio::test]
async fn round_lifecycle_over_http() {
  let app = app().await;
  let (title_id, game) = seated_game(&app).await;
  let rounds = format!("{game}/rounds");

  let (status, round) = call(
    &app,
    Method::POST,
    &rounds,
    Some(entries([30_000, 25_000, 25_000, 20_000], ["east", "south", "west", "north"])),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(round["sequence"], 1);
  assert_eq!(round["deltas"], json!([20_000, -5_000, -5_000, -10_000]));

  let (status, _) = call(&app, Method::DELETE, &format!("{rounds}/1"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = call(&app, Method::DELETE, &format!("{rounds}/1"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, round) = call(
    &app,
    Method::POST,
    &rounds,
    Some(entries([10_000, 45_000, 25_000, 20_000], ["south", "west", "north", "east"])),
  )
  .await;
  assert_eq!(round["sequence"], 2);

  let (status, listed) = call(&app, Method::GET, &rounds, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listed.as_array().unwrap().len(), 1);

  let (status, board) = call(
    &app,
    Method::GET,
    &format!("/titles/{title_id}/leaderboard"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(board["standings"][0]["name"], "Ben");
  assert_eq!(board["standings"][0]["position"], 1);
  assert_eq!(board["standings"][0]["cumulative_score"], 35_000);
  assert_eq!(board["leaders"]["holders"][0]["name"], "Ben");
  assert_eq!(board["most_lasts"]["holders"][0]["name"], "Aoi");

  let (status, sheet) = call(&app, Method::GET, &format!("{game}/sheet"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(sheet["standings"][0]["total"], 35_000);
  assert_eq!(sheet["totals"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn input_errors_map_to_422() {
  let app = app().await;
  let (_, game) = seated_game(&app).await;

  let (status, body) = call(
    &app,
    Method::POST,
    &format!("{game}/rounds"),
    Some(entries([30_000, 25_000, 25_000, 20_000], ["east", "east", "west", "north"])),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body["error"].as_str().unwrap().contains("east"));

  let (status, _) = call(
    &app,
    Method::POST,
    &format!("{game}/rounds"),
    Some(entries([30_000, 30_000, 20_000, 20_000], ["east", "south", "west", "north"])),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

  let (status, _) = call(
    &app,
    Method::POST,
    &format!("{game}/rounds"),
    Some(entries([i64::MAX, i64::MAX - 1, 0, 0], ["east", "south", "west", "north"])),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

  let (status, _) =
    call(&app, Method::POST, "/titles", Some(json!({ "name": "" }))).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn game_creation_rejects_two_players() {
  let app = app().await;
  let (title_id, _) = seated_game(&app).await;

  let (status, body) = call(
    &app,
    Method::POST,
    &format!("/titles/{title_id}/games"),
    Some(json!({
      "seats": [
        { "kind": "new", "value": "Eri" },
        { "kind": "new", "value": "Fumi" },
        { "kind": "empty" },
      ],
    })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body["error"].as_str().unwrap().contains("3 distinct"));

  let (_, games) =
    call(&app, Method::GET, &format!("/titles/{title_id}/games"), None).await;
  assert_eq!(games.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_ids_are_404() {
  let app = app().await;
  let missing = uuid::Uuid::new_v4();

  let (status, _) =
    call(&app, Method::GET, &format!("/titles/{missing}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (title_id, _) = seated_game(&app).await;
  let (status, _) = call(
    &app,
    Method::GET,
    &format!("/titles/{title_id}/games/{missing}/rounds"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) =
    call(&app, Method::DELETE, &format!("/titles/{title_id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) =
    call(&app, Method::GET, &format!("/titles/{title_id}/summary"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
