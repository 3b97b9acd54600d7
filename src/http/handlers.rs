use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::app::auth::AuthService;
use crate::app::comments::CommentService;
use crate::app::contact::{contains_header_break, ContactService};
use crate::app::posts::PostService;
use crate::app::search::SearchService;
use crate::domain::comment::Comment;
use crate::domain::post::{Post, PostSummary};
use crate::domain::tag::{Tag, TagCount};
use crate::domain::user::User;
use crate::http::{AppError, AuthUser};
use crate::AppState;

const RECENT_POSTS_LIMIT: i64 = 5;
const COMMON_TAGS_LIMIT: i64 = 10;
const MAX_USERNAME_LEN: usize = 100;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_COMMENT_LEN: usize = 2000;
const MAX_CONTACT_NAME_LEN: usize = 100;
const MAX_CONTACT_EMAIL_LEN: usize = 100;
const MAX_CONTACT_SUBJECT_LEN: usize = 200;

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        state.db.clone(),
        state.paseto_access_key,
        state.paseto_refresh_key,
        state.access_ttl_minutes,
        state.refresh_ttl_days,
    )
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.db.ping().await.is_ok() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse { status })
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct PageQuery {
    // Kept as a string so a garbage page number falls back to page 1
    // instead of a deserialization error.
    pub page: Option<String>,
}

#[derive(Serialize)]
pub struct PostListResponse {
    pub items: Vec<PostSummary>,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let page = query.page.and_then(|raw| raw.parse::<i64>().ok());

    let service = PostService::new(state.db.clone());
    let page = service
        .list_page(page, state.page_size)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to list posts");
            AppError::internal("failed to list posts")
        })?;

    Ok(Json(PostListResponse {
        items: page.items,
        page: page.page,
        page_size: page.page_size,
        total_pages: page.total_pages,
        total_count: page.total_count,
    }))
}

#[derive(Serialize)]
pub struct PostDetailResponse {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub common_tags: Vec<TagCount>,
    pub recent_posts: Vec<PostSummary>,
}

pub async fn get_post(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let posts = PostService::new(state.db.clone());
    let post = posts.get_by_slug(&slug).await.map_err(|err| {
        tracing::error!(error = ?err, slug = %slug, "failed to fetch post");
        AppError::internal("failed to fetch post")
    })?;

    let post = post.ok_or_else(|| AppError::not_found("post not found"))?;

    let comments = CommentService::new(state.db.clone())
        .list_for_post(post.id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, slug = %slug, "failed to list comments");
            AppError::internal("failed to fetch post")
        })?;

    let common_tags = posts.common_tags(COMMON_TAGS_LIMIT).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list common tags");
        AppError::internal("failed to fetch post")
    })?;

    let recent_posts = posts.recent(RECENT_POSTS_LIMIT).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list recent posts");
        AppError::internal("failed to fetch post")
    })?;

    Ok(Json(PostDetailResponse {
        post,
        comments,
        common_tags,
        recent_posts,
    }))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

pub async fn create_comment(
    auth: AuthUser,
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    if payload.body.trim().is_empty() {
        return Err(AppError::bad_request("body cannot be empty"));
    }
    if payload.body.len() > MAX_COMMENT_LEN {
        return Err(AppError::bad_request("body must be at most 2000 characters"));
    }

    let post_id = PostService::new(state.db.clone())
        .id_by_slug(&slug)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, slug = %slug, "failed to resolve post");
            AppError::internal("failed to create comment")
        })?
        .ok_or_else(|| AppError::not_found("post not found"))?;

    let comment = CommentService::new(state.db.clone())
        .create(post_id, auth.user_id, payload.body)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, slug = %slug, "failed to create comment");
            AppError::internal("failed to create comment")
        })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_post_comments(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let post_id = PostService::new(state.db.clone())
        .id_by_slug(&slug)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, slug = %slug, "failed to resolve post");
            AppError::internal("failed to list comments")
        })?
        .ok_or_else(|| AppError::not_found("post not found"))?;

    let comments = CommentService::new(state.db.clone())
        .list_for_post(post_id)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, slug = %slug, "failed to list comments");
            AppError::internal("failed to list comments")
        })?;

    Ok(Json(comments))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub access_expires_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub refresh_expires_at: OffsetDateTime,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub repeat_password: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub access_expires_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub refresh_expires_at: OffsetDateTime,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::bad_request("username cannot be empty"));
    }
    if payload.username.len() > MAX_USERNAME_LEN {
        return Err(AppError::bad_request("username must be at most 100 characters"));
    }
    if payload.password.trim().len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at least 8 characters"));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }
    if payload.password != payload.repeat_password {
        return Err(AppError::bad_request("passwords do not match"));
    }

    let service = auth_service(&state);
    let created = service
        .signup(payload.username, payload.email, payload.password)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to sign up");
            AppError::internal("failed to sign up")
        })?;

    match created {
        Some((user, tokens)) => Ok((
            StatusCode::CREATED,
            Json(SignupResponse {
                user,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                access_expires_at: tokens.access_expires_at,
                refresh_expires_at: tokens.refresh_expires_at,
            }),
        )),
        None => Err(AppError::conflict("username already taken")),
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    if payload.username.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::bad_request("username and password are required"));
    }
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be at most 128 characters"));
    }

    let service = auth_service(&state);
    let tokens = service
        .login(&payload.username, &payload.password)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to login");
            AppError::internal("failed to login")
        })?;

    match tokens {
        Some(tokens) => Ok(Json(AuthTokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        })),
        None => Err(AppError::unauthorized("invalid credentials")),
    }
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    if payload.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request("refresh_token is required"));
    }

    let service = auth_service(&state);
    let tokens = service
        .refresh(&payload.refresh_token)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to refresh token");
            AppError::internal("failed to refresh token")
        })?;

    match tokens {
        Some(tokens) => Ok(Json(AuthTokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        })),
        None => Err(AppError::unauthorized("invalid refresh token")),
    }
}

#[derive(Deserialize)]
pub struct RevokeRequest {
    pub refresh_token: String,
}

pub async fn revoke_token(
    State(state): State<AppState>,
    Json(payload): Json<RevokeRequest>,
) -> Result<StatusCode, AppError> {
    if payload.refresh_token.trim().is_empty() {
        return Err(AppError::bad_request("refresh_token is required"));
    }

    // Revocation is idempotent: unknown or already-revoked tokens still 204.
    let service = auth_service(&state);
    service
        .revoke_refresh_token(&payload.refresh_token)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to revoke token");
            AppError::internal("failed to revoke token")
        })?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_current_user(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let service = auth_service(&state);
    let user = service.get_current_user(auth.user_id).await.map_err(|err| {
        tracing::error!(error = ?err, user_id = %auth.user_id, "failed to fetch current user");
        AppError::internal("failed to fetch current user")
    })?;

    match user {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::not_found("user not found")),
    }
}

// ---------------------------------------------------------------------------
// Contact form
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub status: &'static str,
    pub next: &'static str,
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name cannot be empty"));
    }
    if payload.name.len() > MAX_CONTACT_NAME_LEN {
        return Err(AppError::bad_request("name must be at most 100 characters"));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError::bad_request("email cannot be empty"));
    }
    if payload.email.len() > MAX_CONTACT_EMAIL_LEN {
        return Err(AppError::bad_request("email must be at most 100 characters"));
    }
    if payload.subject.trim().is_empty() {
        return Err(AppError::bad_request("subject cannot be empty"));
    }
    if payload.subject.len() > MAX_CONTACT_SUBJECT_LEN {
        return Err(AppError::bad_request("subject must be at most 200 characters"));
    }
    if payload.message.trim().is_empty() {
        return Err(AppError::bad_request("message cannot be empty"));
    }
    if contains_header_break(&payload.name) || contains_header_break(&payload.subject) {
        return Err(AppError::bad_request("invalid header"));
    }

    let reply_to: Mailbox = payload
        .email
        .parse()
        .map_err(|_| AppError::bad_request("invalid email address"))?;

    let service = ContactService::new(state.mailer.clone());
    service
        .send_feedback(&payload.name, reply_to, &payload.subject, payload.message)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to send contact message");
            AppError::internal("failed to send message")
        })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ContactResponse {
            status: "sent",
            next: "/contact/success",
        }),
    ))
}

#[derive(Serialize)]
pub struct ContactSuccessResponse {
    pub title: &'static str,
}

pub async fn contact_success() -> Json<ContactSuccessResponse> {
    Json(ContactSuccessResponse { title: "Thank you" })
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<PostSummary>,
    pub count: usize,
}

pub async fn search_posts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let q = query.q.unwrap_or_default();
    if q.is_empty() {
        return Ok(Json(SearchResponse {
            results: Vec::new(),
            count: 0,
        }));
    }

    let service = SearchService::new(state.db.clone());
    let results = service.search_posts(&q).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to search posts");
        AppError::internal("failed to search posts")
    })?;

    let count = results.len();
    Ok(Json(SearchResponse { results, count }))
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TagPostsResponse {
    pub tag: Tag,
    pub posts: Vec<PostSummary>,
    pub common_tags: Vec<TagCount>,
}

pub async fn list_tag_posts(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TagPostsResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    let tag = service.get_tag(&slug).await.map_err(|err| {
        tracing::error!(error = ?err, slug = %slug, "failed to fetch tag");
        AppError::internal("failed to fetch tag")
    })?;

    let tag = tag.ok_or_else(|| AppError::not_found("tag not found"))?;

    let posts = service.list_by_tag(tag.id).await.map_err(|err| {
        tracing::error!(error = ?err, slug = %slug, "failed to list posts for tag");
        AppError::internal("failed to fetch tag")
    })?;

    let common_tags = service.common_tags(COMMON_TAGS_LIMIT).await.map_err(|err| {
        tracing::error!(error = ?err, "failed to list common tags");
        AppError::internal("failed to fetch tag")
    })?;

    Ok(Json(TagPostsResponse {
        tag,
        posts,
        common_tags,
    }))
}
