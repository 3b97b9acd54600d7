use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct CommentService {
    db: Db,
}

impl CommentService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(&self, post_id: Uuid, author_id: Uuid, body: String) -> Result<Comment> {
        let row = sqlx::query(
            "WITH inserted_comment AS ( \
                INSERT INTO comments (post_id, author_id, body) \
                VALUES ($1, $2, $3) \
                RETURNING id, post_id, author_id, body, created_at \
             ) \
             SELECT c.*, u.username AS author_username \
             FROM inserted_comment c \
             JOIN users u ON c.author_id = u.id",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(self.db.pool())
        .await?;

        Ok(Comment {
            id: row.get("id"),
            post_id: row.get("post_id"),
            author_id: row.get("author_id"),
            author_username: Some(row.get("author_username")),
            body: row.get("body"),
            created_at: row.get("created_at"),
        })
    }

    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT c.id, c.post_id, c.author_id, u.username AS author_username, \
                    c.body, c.created_at \
             FROM comments c \
             JOIN users u ON c.author_id = u.id \
             WHERE c.post_id = $1 \
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(post_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            comments.push(Comment {
                id: row.get("id"),
                post_id: row.get("post_id"),
                author_id: row.get("author_id"),
                author_username: Some(row.get("author_username")),
                body: row.get("body"),
                created_at: row.get("created_at"),
            });
        }

        Ok(comments)
    }
}
