//! Search Tests
//!
//! Posts here carry unique markers in heading/content so assertions hold no
//! matter what other rows exist in the shared test database.

mod common;

use axum::http::StatusCode;
use common::app;

#[tokio::test]
async fn empty_query_returns_no_results() {
    let app = app().await;
    let user = app.create_user("search_empty").await;
    app.create_post(user.id, "search-empty", 0, &[]).await;

    let resp = app.get("/search", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["count"], 0);
    assert!(body["results"].as_array().unwrap().is_empty());

    let resp = app.get("/search?q=", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["count"], 0);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = app().await;
    let user = app.create_user("search_case").await;
    let (_, slug) = app.create_post(user.id, "zqmarker-case", 0, &[]).await;
    // Content reads "The full story about zqmarker-case"

    let resp = app.get("/search?q=ZQMARKER-CASE", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["slug"], slug);

    // Substring in the middle matches too
    let resp = app.get("/search?q=qmarker-cas", None).await;
    assert_eq!(resp.json()["count"], 1);
}

#[tokio::test]
async fn search_matches_heading_and_content() {
    let app = app().await;
    let user = app.create_user("search_fields").await;
    // Heading "Trip zqheading-only", content "The full story about zqheading-only"
    app.create_post(user.id, "zqheading-only", 0, &[]).await;

    let resp = app.get("/search?q=Trip%20zqheading-only", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["count"], 1);
}

#[tokio::test]
async fn search_no_match() {
    let app = app().await;

    let resp = app.get("/search?q=zq-definitely-not-there", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["count"], 0);
}

#[tokio::test]
async fn like_metacharacters_do_not_widen_matches() {
    let app = app().await;
    let user = app.create_user("search_like").await;
    app.create_post(user.id, "zqlike-abc", 0, &[]).await;

    // "%" must be treated literally, not as a wildcard that matches zqlike-abc
    let resp = app.get("/search?q=zqlike-%25", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["count"], 0);

    // "_" must not act as a single-character wildcard
    let resp = app.get("/search?q=zqlike-ab_", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["count"], 0);
}
