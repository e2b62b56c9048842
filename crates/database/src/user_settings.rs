//! User settings persistence.

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::UserSettings;
use crate::validation::{normalize_list, validate_instructions, validate_list};
use crate::Result;

/// Create or update a user's settings.
///
/// Keyword and VIP lists are trimmed and de-duplicated; blank instructions are
/// stored as NULL.
pub async fn upsert_settings(pool: &SqlitePool, settings: &UserSettings) -> Result<()> {
    validate_list("alert_keywords", &settings.alert_keywords.0)?;
    validate_list("vip_user_ids", &settings.vip_user_ids.0)?;

    let instructions = settings
        .report_custom_instructions
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());
    if let Some(text) = instructions {
        validate_instructions(text)?;
    }

    let keywords = normalize_list(&settings.alert_keywords.0);
    let vips = normalize_list(&settings.vip_user_ids.0);

    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id, alert_keywords, vip_user_ids, report_custom_instructions)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            alert_keywords = excluded.alert_keywords,
            vip_user_ids = excluded.vip_user_ids,
            report_custom_instructions = excluded.report_custom_instructions,
            updated_at = datetime('now')
        "#,
    )
    .bind(&settings.user_id)
    .bind(Json(keywords))
    .bind(Json(vips))
    .bind(instructions)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a user's settings, if stored.
pub async fn get_settings(pool: &SqlitePool, user_id: &str) -> Result<Option<UserSettings>> {
    let record = sqlx::query_as::<_, UserSettings>(
        r#"
        SELECT user_id, alert_keywords, vip_user_ids, report_custom_instructions, updated_at
        FROM user_settings
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Get a user's custom summarization instructions.
pub async fn get_custom_instructions(pool: &SqlitePool, user_id: &str) -> Result<Option<String>> {
    let instructions: Option<Option<String>> = sqlx::query_scalar(
        r#"
        SELECT report_custom_instructions
        FROM user_settings
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(instructions.flatten())
}
