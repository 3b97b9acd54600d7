use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

/// A blog article. Created by seed/admin tooling, only read here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub heading: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub image_key: Option<String>,
    pub author_id: Uuid,
    pub author_username: Option<String>,
    pub created_at: Date,
    pub tags: Vec<String>,
}

/// Listing/sidebar shape: everything but the article body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub heading: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub image_key: Option<String>,
    pub author_username: Option<String>,
    pub created_at: Date,
    pub tags: Vec<String>,
}
