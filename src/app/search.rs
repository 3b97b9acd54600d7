use anyhow::Result;

use crate::app::posts::{summary_columns_query, summary_from_row};
use crate::domain::post::PostSummary;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct SearchService {
    db: Db,
}

impl SearchService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Case-insensitive substring match over heading and content.
    /// Callers decide what an empty query means; here it would match everything.
    pub async fn search_posts(&self, query: &str) -> Result<Vec<PostSummary>> {
        let pattern = format!("%{}%", escape_like_pattern(query));
        let rows = sqlx::query(&summary_columns_query(
            "WHERE p.heading ILIKE $1 ESCAPE '\\' OR p.content ILIKE $1 ESCAPE '\\'",
        ))
        .bind(&pattern)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }
}

fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '%' | '_' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}
