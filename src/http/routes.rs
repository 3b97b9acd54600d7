use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn auth() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login))
        .route("/auth/refresh", post(handlers::refresh_token))
        .route("/auth/revoke", post(handlers::revoke_token))
        .route("/auth/me", get(handlers::get_current_user))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::list_posts))
        .route("/posts/:slug", get(handlers::get_post))
        .route("/posts/:slug/comments", get(handlers::list_post_comments))
        .route("/posts/:slug/comments", post(handlers::create_comment))
}

pub fn contact() -> Router<AppState> {
    Router::new()
        .route("/contact", post(handlers::submit_contact))
        .route("/contact/success", get(handlers::contact_success))
}

pub fn search() -> Router<AppState> {
    Router::new().route("/search", get(handlers::search_posts))
}

pub fn tags() -> Router<AppState> {
    Router::new().route("/tags/:slug", get(handlers::list_tag_posts))
}
