//! Summary persistence.
//!
//! Summaries are append-only; readers pick the most recent one.

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Summary;

/// Store a new summary referencing the given items.
pub async fn insert_summary(
    pool: &SqlitePool,
    user_id: &str,
    summary_text: &str,
    item_ids: &[String],
) -> Result<Summary> {
    let id = uuid::Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO summaries (id, summary_text, target_items, user_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(summary_text)
    .bind(Json(item_ids))
    .bind(user_id)
    .execute(pool)
    .await?;

    get_summary(pool, user_id, &id).await
}

/// Get one of a user's summaries.
pub async fn get_summary(pool: &SqlitePool, user_id: &str, id: &str) -> Result<Summary> {
    sqlx::query_as::<_, Summary>(
        r#"
        SELECT id, summary_text, target_items, created_at, user_id
        FROM summaries
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Summary",
        id: id.to_string(),
    })
}

/// Most recent summary for a user, if any.
pub async fn latest_for_user(pool: &SqlitePool, user_id: &str) -> Result<Option<Summary>> {
    let record = sqlx::query_as::<_, Summary>(
        r#"
        SELECT id, summary_text, target_items, created_at, user_id
        FROM summaries
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Recent summaries for a user, newest first.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str, limit: i64) -> Result<Vec<Summary>> {
    let rows = sqlx::query_as::<_, Summary>(
        r#"
        SELECT id, summary_text, target_items, created_at, user_id
        FROM summaries
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
