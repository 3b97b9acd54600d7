//! Contact Form Tests
//!
//! SMTP_URL is unset in tests, so a valid submission is accepted and the
//! message is logged instead of sent.

mod common;

use axum::http::StatusCode;
use common::app;
use serde_json::json;

fn valid_payload() -> serde_json::Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "subject": "Question about the fjord trip",
        "message": "Which month did you go?"
    })
}

#[tokio::test]
async fn valid_submission_is_accepted() {
    let app = app().await;

    let resp = app.post_json("/contact", valid_payload(), None).await;

    assert_eq!(resp.status, StatusCode::ACCEPTED);
    let body = resp.json();
    assert_eq!(body["status"], "sent");
    assert_eq!(body["next"], "/contact/success");
}

#[tokio::test]
async fn success_page() {
    let app = app().await;

    let resp = app.get("/contact/success", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["title"], "Thank you");
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = app().await;

    for (field, message) in [
        ("name", "name cannot be empty"),
        ("email", "email cannot be empty"),
        ("subject", "subject cannot be empty"),
        ("message", "message cannot be empty"),
    ] {
        let mut payload = valid_payload();
        payload[field] = json!("  ");

        let resp = app.post_json("/contact", payload, None).await;

        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "field: {}", field);
        assert_eq!(resp.error_message(), message);
    }
}

#[tokio::test]
async fn overlong_fields_are_rejected() {
    let app = app().await;

    let mut payload = valid_payload();
    payload["name"] = json!("n".repeat(101));
    let resp = app.post_json("/contact", payload, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "name must be at most 100 characters");

    let mut payload = valid_payload();
    payload["subject"] = json!("s".repeat(201));
    let resp = app.post_json("/contact", payload, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.error_message(),
        "subject must be at most 200 characters"
    );
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = app().await;

    let mut payload = valid_payload();
    payload["email"] = json!("not-an-address");

    let resp = app.post_json("/contact", payload, None).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "invalid email address");
}

#[tokio::test]
async fn header_injection_is_rejected() {
    let app = app().await;

    // A newline in a header-bound field is a mail-header injection attempt
    let mut payload = valid_payload();
    payload["subject"] = json!("hello\r\nBcc: everyone@example.com");
    let resp = app.post_json("/contact", payload, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "invalid header");

    let mut payload = valid_payload();
    payload["name"] = json!("Ada\nX-Evil: 1");
    let resp = app.post_json("/contact", payload, None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "invalid header");
}
