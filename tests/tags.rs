//! Tag Browsing Tests

mod common;

use axum::http::StatusCode;
use common::app;

#[tokio::test]
async fn tag_page_lists_tagged_posts_only() {
    let app = app().await;
    let user = app.create_user("tag_filter").await;
    let (_, tagged_slug) = app
        .create_post(user.id, "tag-filter-in", 10, &["zqfjords"])
        .await;
    let (_, other_slug) = app.create_post(user.id, "tag-filter-out", 10, &[]).await;

    let resp = app.get("/tags/zqfjords", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["tag"]["slug"], "zqfjords");
    let slugs: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert!(slugs.contains(&tagged_slug.as_str()));
    assert!(!slugs.contains(&other_slug.as_str()));
}

#[tokio::test]
async fn tag_posts_ordered_newest_first() {
    let app = app().await;
    let user = app.create_user("tag_order").await;
    let (_, old_slug) = app
        .create_post(user.id, "tag-order-old", 25, &["zqglaciers"])
        .await;
    let (_, new_slug) = app
        .create_post(user.id, "tag-order-new", 5, &["zqglaciers"])
        .await;

    let resp = app.get("/tags/zqglaciers", None).await;
    assert_eq!(resp.status, StatusCode::OK);

    let body = resp.json();
    let slugs: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec![new_slug.as_str(), old_slug.as_str()]);
}

#[tokio::test]
async fn unknown_tag_is_not_found() {
    let app = app().await;

    let resp = app.get("/tags/zq-no-such-tag", None).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "tag not found");
}

#[tokio::test]
async fn common_tags_report_usage_counts() {
    let app = app().await;
    let user = app.create_user("tag_common").await;
    app.create_post(user.id, "tag-common-1", 1, &["zqcoast"]).await;
    app.create_post(user.id, "tag-common-2", 2, &["zqcoast"]).await;
    app.create_post(user.id, "tag-common-3", 3, &["zqcoast"]).await;

    let resp = app.get("/tags/zqcoast", None).await;
    assert_eq!(resp.status, StatusCode::OK);

    let body = resp.json();
    let common = body["common_tags"].as_array().unwrap();
    let entry = common
        .iter()
        .find(|t| t["slug"] == "zqcoast")
        .expect("zqcoast missing from common tags");
    assert_eq!(entry["post_count"], 3);

    // The tag page itself lists all three posts
    assert_eq!(body["posts"].as_array().unwrap().len(), 3);
}
