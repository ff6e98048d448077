//! Router tests against an in-memory store seeded with the sample.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use pulse_core::store::{DatasetStore, MemoryStore};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

const LIMIT: usize = 1024 * 1024;

fn app(store: &MemoryStore) -> Router {
  api_router(Arc::new(store.clone()), LIMIT)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, body)
}

async fn get(store: &MemoryStore, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  send(app(store), req).await
}

async fn upload(
  store: &MemoryStore,
  filename: &str,
  csv: &str,
) -> (StatusCode, Value) {
  let body = json!({
    "filename": filename,
    "contents": format!("data:text/csv;base64,{}", B64.encode(csv)),
  });
  let req = Request::builder()
    .method("POST")
    .uri("/upload")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();
  send(app(store), req).await
}

// ── Dataset ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn dataset_info_describes_sample() {
  let store = MemoryStore::with_sample();
  let (status, body) = get(&store, "/dataset").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["source"], "sample");
  assert_eq!(body["rows"], 10);
  assert_eq!(body["selected"], json!(["New", "Returning", "Loyal"]));
  assert_eq!(body["segments"][0], json!({ "label": "New", "value": "New" }));
}

#[tokio::test]
async fn rows_are_paged_and_sorted() {
  let store = MemoryStore::with_sample();
  let (status, body) =
    get(&store, "/dataset/rows?page_size=3&sort=revenue&desc=true").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["page_count"], 4);
  assert_eq!(body["rows"].as_array().unwrap().len(), 3);
  // Columns: date, segment, visits, time_spent, conversion, revenue.
  assert_eq!(body["rows"][0][5], 300.0);
}

#[tokio::test]
async fn rows_reject_unknown_sort_column() {
  let store = MemoryStore::with_sample();
  let (status, body) = get(&store, "/dataset/rows?sort=missing").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("missing"));
}

// ── View ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn default_view_of_sample() {
  let store = MemoryStore::with_sample();
  let (status, body) = get(&store, "/view").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["cards"]["total_customers"], "10");
  assert_eq!(body["cards"]["avg_revenue"], "$185");
  assert_eq!(body["points"], 10);
  assert_eq!(body["figures"]["histogram"]["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn monthly_view_has_one_point() {
  let store = MemoryStore::with_sample();
  let (_, body) = get(&store, "/view?period=M&metric=revenue").await;
  assert_eq!(body["points"], 1);
  let y = &body["figures"]["time_series"]["data"][0]["y"];
  assert_eq!(y, &json!([1848.0]));
}

#[tokio::test]
async fn segment_filter_narrows_rows() {
  let store = MemoryStore::with_sample();
  let (_, all) = get(&store, "/view?segments=").await;
  let (_, some) = get(&store, "/view?segments=New&segments=Loyal").await;
  assert_eq!(all["summary"]["rows"], 10);
  assert_eq!(some["summary"]["rows"], 7);
}

#[tokio::test]
async fn segment_labels_may_contain_commas() {
  let store = MemoryStore::with_sample();
  let csv = "date,segment,visits,time_spent,conversion\n\
             2024-03-01,\"Small, EU\",2,4.0,0.1\n\
             2024-03-02,Large,3,5.0,0.2\n";
  let (status, body) = upload(&store, "regions.csv", csv).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["dataset"]["selected"], json!(["Small, EU", "Large"]));

  let (status, one) = get(&store, "/view?segments=Small%2C%20EU").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(one["summary"]["rows"], 1);

  let (_, both) =
    get(&store, "/view?segments=Small%2C%20EU&segments=Large").await;
  assert_eq!(both["summary"]["rows"], 2);
}

#[tokio::test]
async fn invalid_period_is_rejected() {
  let store = MemoryStore::with_sample();
  let (status, _) = get(&store, "/view?period=fortnight").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Upload ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_upload_replaces_dataset() {
  let store = MemoryStore::with_sample();
  let csv = "date,segment,visits,time_spent,conversion\n\
             2024-03-01,Trial,2,4.0,0.1\n\
             2024-03-02,Trial,3,5.0,0.2\n\
             2024-03-09,Enterprise,9,30.0,0.6\n";

  let (status, body) = upload(&store, "march.csv", csv).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "Loaded file: march.csv");
  assert_eq!(body["dataset"]["rows"], 3);
  assert_eq!(body["dataset"]["selected"], json!(["Trial", "Enterprise"]));
  assert_eq!(body["table"]["rows"].as_array().unwrap().len(), 3);

  let snap = store.snapshot().await.unwrap();
  assert_eq!(snap.source, "march.csv");
  assert_eq!(snap.table.len(), 3);

  // Without a revenue column the revenue card falls back to zero and the
  // revenue metric is refused.
  let (_, view) = get(&store, "/view").await;
  assert_eq!(view["cards"]["avg_revenue"], "$0");
  let (status, _) = get(&store, "/view?metric=revenue").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_missing_columns_keeps_previous_dataset() {
  let store = MemoryStore::with_sample();
  let before = store.snapshot().await.unwrap();

  let (status, body) =
    upload(&store, "partial.csv", "date,segment,visits\n2024-01-01,New,1\n")
      .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(
    body["error"],
    "File must contain columns: date, segment, visits, time_spent, conversion"
  );

  let after = store.snapshot().await.unwrap();
  assert_eq!(before.revision, after.revision);

  let (_, view) = get(&store, "/view").await;
  assert_eq!(view["cards"]["total_customers"], "10");
}

#[tokio::test]
async fn upload_with_unsupported_extension() {
  let store = MemoryStore::with_sample();
  let (status, body) = upload(&store, "notes.txt", "hello").await;
  assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
  assert_eq!(body["error"], "Unsupported file format");
}

#[tokio::test]
async fn upload_with_bad_cell_reports_parse_error() {
  let store = MemoryStore::with_sample();
  let csv = "date,segment,visits,time_spent,conversion\nsoon,New,1,2,0.1\n";
  let (status, body) = upload(&store, "bad.csv", csv).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let msg = body["error"].as_str().unwrap();
  assert!(msg.starts_with("Error loading file:"), "{msg}");
  assert!(msg.contains("row 2"), "{msg}");
  assert_eq!(store.snapshot().await.unwrap().source, "sample");
}

#[tokio::test]
async fn oversized_upload_is_refused() {
  let store = MemoryStore::with_sample();
  let big = "x".repeat(LIMIT + 1);
  let (status, body) = upload(&store, "big.csv", &big).await;
  assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
  assert_eq!(
    body["error"],
    "Error loading file: file exceeds the upload size limit"
  );
  assert_eq!(store.snapshot().await.unwrap().source, "sample");
}

#[tokio::test]
async fn malformed_upload_body_is_a_json_error() {
  let store = MemoryStore::with_sample();
  let req = Request::builder()
    .method("POST")
    .uri("/upload")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(r#"{"filename": "a.csv"}"#))
    .unwrap();
  let (status, body) = send(app(&store), req).await;
  assert!(status.is_client_error(), "{status}");
  let msg = body["error"].as_str().unwrap();
  assert!(msg.starts_with("Error loading file:"), "{msg}");
  assert_eq!(store.snapshot().await.unwrap().source, "sample");
}
