//! Item persistence.
//!
//! Status changes here only move items forward. `mark_summarized` touches rows
//! that are still `pending`, so applying it twice is a no-op.

use std::time::Duration;

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Item, ItemStatus, NewItem, SourceType};

const ITEM_COLUMNS: &str = "id, source_type, content, meta_data, status, created_at, user_id";

/// Insert a new pending item and return its ID.
pub async fn insert_item(pool: &SqlitePool, item: &NewItem) -> Result<String> {
    let id = uuid::Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO items (id, source_type, content, meta_data, status, user_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(item.source_type)
    .bind(&item.content)
    .bind(Json(&item.meta))
    .bind(ItemStatus::Pending)
    .bind(&item.user_id)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Insert a pending item unless one with the same (team, channel, ts) exists.
///
/// Returns the new item's ID, or `None` when a matching item was already
/// stored. Items whose metadata lacks any part of the key are inserted
/// unconditionally.
pub async fn insert_if_absent(pool: &SqlitePool, item: &NewItem) -> Result<Option<String>> {
    let (team, channel, ts) = match (&item.meta.team, &item.meta.channel, &item.meta.ts) {
        (Some(team), Some(channel), Some(ts)) => (team, channel, ts),
        _ => return insert_item(pool, item).await.map(Some),
    };

    let id = uuid::Uuid::new_v4().to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO items (id, source_type, content, meta_data, status, user_id)
        SELECT ?, ?, ?, ?, ?, ?
        WHERE NOT EXISTS (
            SELECT 1 FROM items
            WHERE json_extract(meta_data, '$.team') = ?
              AND json_extract(meta_data, '$.channel') = ?
              AND json_extract(meta_data, '$.ts') = ?
        )
        "#,
    )
    .bind(&id)
    .bind(item.source_type)
    .bind(&item.content)
    .bind(Json(&item.meta))
    .bind(ItemStatus::Pending)
    .bind(&item.user_id)
    .bind(team)
    .bind(channel)
    .bind(ts)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        Ok(None)
    } else {
        Ok(Some(id))
    }
}

/// Check whether a message with the given source key is already stored.
pub async fn exists_by_source(
    pool: &SqlitePool,
    team: &str,
    channel: &str,
    ts: &str,
) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT 1 FROM items
        WHERE json_extract(meta_data, '$.team') = ?
          AND json_extract(meta_data, '$.channel') = ?
          AND json_extract(meta_data, '$.ts') = ?
        LIMIT 1
        "#,
    )
    .bind(team)
    .bind(channel)
    .bind(ts)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

/// Get an item owned by a user.
pub async fn get_item(pool: &SqlitePool, user_id: &str, id: &str) -> Result<Item> {
    let sql = format!(
        "SELECT {} FROM items WHERE id = ? AND user_id = ?",
        ITEM_COLUMNS
    );

    sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Item",
            id: id.to_string(),
        })
}

/// Distinct owners of pending items.
pub async fn pending_user_ids(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT user_id
        FROM items
        WHERE status = ?
        ORDER BY user_id ASC
        "#,
    )
    .bind(ItemStatus::Pending)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Oldest pending items for a user, capped at `limit`.
pub async fn pending_for_user(pool: &SqlitePool, user_id: &str, limit: i64) -> Result<Vec<Item>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM items
        WHERE user_id = ? AND status = ?
        ORDER BY created_at ASC, rowid ASC
        LIMIT ?
        "#,
        ITEM_COLUMNS
    );

    let rows = sqlx::query_as::<_, Item>(&sql)
        .bind(user_id)
        .bind(ItemStatus::Pending)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// List a user's items with a given status, newest first.
pub async fn list_by_status(
    pool: &SqlitePool,
    user_id: &str,
    status: ItemStatus,
    limit: i64,
) -> Result<Vec<Item>> {
    let sql = format!(
        r#"
        SELECT {}
        FROM items
        WHERE user_id = ? AND status = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?
        "#,
        ITEM_COLUMNS
    );

    let rows = sqlx::query_as::<_, Item>(&sql)
        .bind(user_id)
        .bind(status)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Mark a user's pending items as summarized.
///
/// Items that are not pending (already summarized, done, archived) are left
/// untouched. Returns the number of rows changed.
pub async fn mark_summarized(pool: &SqlitePool, user_id: &str, ids: &[String]) -> Result<u64> {
    transition(pool, user_id, ids, &[ItemStatus::Pending], ItemStatus::Summarized).await
}

/// Mark a user's items as done.
pub async fn mark_done(pool: &SqlitePool, user_id: &str, ids: &[String]) -> Result<u64> {
    transition(
        pool,
        user_id,
        ids,
        &[ItemStatus::Pending, ItemStatus::Summarized],
        ItemStatus::Done,
    )
    .await
}

/// Archive a user's items, whatever their current status.
pub async fn archive_items(pool: &SqlitePool, user_id: &str, ids: &[String]) -> Result<u64> {
    transition(
        pool,
        user_id,
        ids,
        &[ItemStatus::Pending, ItemStatus::Summarized, ItemStatus::Done],
        ItemStatus::Archived,
    )
    .await
}

async fn transition(
    pool: &SqlitePool,
    user_id: &str,
    ids: &[String],
    from: &[ItemStatus],
    to: ItemStatus,
) -> Result<u64> {
    if ids.is_empty() || from.is_empty() {
        return Ok(0);
    }

    let id_list = serde_json::to_string(ids)?;
    let from_list =
        serde_json::to_string(&from.iter().map(ItemStatus::as_str).collect::<Vec<_>>())?;

    let result = sqlx::query(
        r#"
        UPDATE items
        SET status = ?
        WHERE user_id = ?
          AND id IN (SELECT value FROM json_each(?))
          AND status IN (SELECT value FROM json_each(?))
        "#,
    )
    .bind(to)
    .bind(user_id)
    .bind(id_list)
    .bind(from_list)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete processed items older than `age`.
///
/// Pending items and saved web links are never removed.
pub async fn delete_processed_older_than(pool: &SqlitePool, age: Duration) -> Result<u64> {
    let modifier = format!("-{} seconds", age.as_secs());
    let processed: Vec<ItemStatus> = ItemStatus::ALL
        .into_iter()
        .filter(ItemStatus::is_processed)
        .collect();
    let placeholders = vec!["?"; processed.len()].join(", ");
    let sql = format!(
        r#"
        DELETE FROM items
        WHERE created_at < datetime('now', ?)
          AND status IN ({})
          AND source_type != ?
        "#,
        placeholders
    );

    let mut query = sqlx::query(&sql).bind(modifier);
    for status in processed {
        query = query.bind(status);
    }
    let result = query.bind(SourceType::Web).execute(pool).await?;

    Ok(result.rows_affected())
}

/// Count a user's items.
pub async fn count_for_user(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM items WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
