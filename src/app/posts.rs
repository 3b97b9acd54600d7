use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::post::{Post, PostSummary};
use crate::domain::tag::{Tag, TagCount};
use crate::infra::db::Db;

/// One page of the home listing. The page number is clamped rather than
/// rejected, and an empty table still has one (empty) page.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub items: Vec<PostSummary>,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_count: i64,
}

/// Summary SELECT over posts with the author username and aggregated tag
/// names. `filter` slots in before GROUP BY; placeholders in it must start
/// at $1, extra clauses (LIMIT/OFFSET) are appended by the caller.
pub(crate) fn summary_columns_query(filter: &str) -> String {
    format!(
        "SELECT p.id, p.heading, p.title, p.slug, p.description, p.image_key, \
                u.username AS author_username, p.created_at, \
                COALESCE(ARRAY_AGG(t.name ORDER BY t.name) FILTER (WHERE t.name IS NOT NULL), '{{}}') AS tags \
         FROM posts p \
         JOIN users u ON p.author_id = u.id \
         LEFT JOIN post_tags pt ON pt.post_id = p.id \
         LEFT JOIN tags t ON t.id = pt.tag_id \
         {} \
         GROUP BY p.id, u.username \
         ORDER BY p.created_at DESC, p.id DESC",
        filter
    )
}

pub(crate) fn summary_from_row(row: &PgRow) -> PostSummary {
    PostSummary {
        id: row.get("id"),
        heading: row.get("heading"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        image_key: row.get("image_key"),
        author_username: Some(row.get("author_username")),
        created_at: row.get("created_at"),
        tags: row.get("tags"),
    }
}

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn list_page(&self, page: Option<i64>, page_size: i64) -> Result<PostPage> {
        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.db.pool())
            .await?;

        let total_pages = ((total_count + page_size - 1) / page_size).max(1);
        let page = page.unwrap_or(1).max(1).min(total_pages);
        let offset = (page - 1) * page_size;

        let rows = sqlx::query(&format!(
            "{} LIMIT $1 OFFSET $2",
            summary_columns_query("")
        ))
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        Ok(PostPage {
            items: rows.iter().map(summary_from_row).collect(),
            page,
            page_size,
            total_pages,
            total_count,
        })
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let row = sqlx::query(
            "SELECT p.id, p.heading, p.title, p.slug, p.description, p.content, p.image_key, \
                    p.author_id, u.username AS author_username, p.created_at, \
                    COALESCE(ARRAY_AGG(t.name ORDER BY t.name) FILTER (WHERE t.name IS NOT NULL), '{}') AS tags \
             FROM posts p \
             JOIN users u ON p.author_id = u.id \
             LEFT JOIN post_tags pt ON pt.post_id = p.id \
             LEFT JOIN tags t ON t.id = pt.tag_id \
             WHERE p.slug = $1 \
             GROUP BY p.id, u.username",
        )
        .bind(slug)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| Post {
            id: row.get("id"),
            heading: row.get("heading"),
            title: row.get("title"),
            slug: row.get("slug"),
            description: row.get("description"),
            content: row.get("content"),
            image_key: row.get("image_key"),
            author_id: row.get("author_id"),
            author_username: Some(row.get("author_username")),
            created_at: row.get("created_at"),
            tags: row.get("tags"),
        }))
    }

    pub async fn id_by_slug(&self, slug: &str) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar("SELECT id FROM posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(id)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<PostSummary>> {
        let rows = sqlx::query(&format!("{} LIMIT $1", summary_columns_query("")))
            .bind(limit)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    pub async fn get_tag(&self, slug: &str) -> Result<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug FROM tags WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|row| Tag {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        }))
    }

    pub async fn list_by_tag(&self, tag_id: Uuid) -> Result<Vec<PostSummary>> {
        let rows = sqlx::query(&summary_columns_query(
            "WHERE EXISTS ( \
                SELECT 1 FROM post_tags px \
                WHERE px.post_id = p.id AND px.tag_id = $1 \
             )",
        ))
        .bind(tag_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    /// Most-used tags, busiest first, for the sidebar.
    pub async fn common_tags(&self, limit: i64) -> Result<Vec<TagCount>> {
        let rows = sqlx::query(
            "SELECT t.name, t.slug, COUNT(pt.post_id) AS post_count \
             FROM tags t \
             JOIN post_tags pt ON pt.tag_id = t.id \
             GROUP BY t.id \
             ORDER BY post_count DESC, t.name ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| TagCount {
                name: row.get("name"),
                slug: row.get("slug"),
                post_count: row.get("post_count"),
            })
            .collect())
    }
}
