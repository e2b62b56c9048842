//! Workspace persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Workspace;

/// Create or update a workspace, keyed on team ID.
pub async fn upsert_workspace(pool: &SqlitePool, workspace: &Workspace) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO workspaces (team_id, access_token, team_name, icon_url, user_id)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(team_id) DO UPDATE SET
            access_token = excluded.access_token,
            team_name = excluded.team_name,
            icon_url = excluded.icon_url,
            user_id = excluded.user_id,
            updated_at = datetime('now')
        "#,
    )
    .bind(&workspace.team_id)
    .bind(&workspace.access_token)
    .bind(&workspace.team_name)
    .bind(&workspace.icon_url)
    .bind(&workspace.user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// List every workspace that has a non-empty access token.
pub async fn list_pollable(pool: &SqlitePool) -> Result<Vec<Workspace>> {
    let rows = sqlx::query_as::<_, Workspace>(
        r#"
        SELECT team_id, access_token, team_name, icon_url, user_id
        FROM workspaces
        WHERE TRIM(access_token) != ''
        ORDER BY created_at ASC, team_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List workspaces owned by a user.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Workspace>> {
    let rows = sqlx::query_as::<_, Workspace>(
        r#"
        SELECT team_id, access_token, team_name, icon_url, user_id
        FROM workspaces
        WHERE user_id = ?
        ORDER BY created_at ASC, team_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a user's workspace by team ID.
pub async fn get_for_user(pool: &SqlitePool, user_id: &str, team_id: &str) -> Result<Workspace> {
    sqlx::query_as::<_, Workspace>(
        r#"
        SELECT team_id, access_token, team_name, icon_url, user_id
        FROM workspaces
        WHERE team_id = ? AND user_id = ?
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Workspace",
        id: team_id.to_string(),
    })
}

/// Get a workspace by team ID regardless of owner.
///
/// Used when a webhook event arrives and only the team is known.
pub async fn get_by_team(pool: &SqlitePool, team_id: &str) -> Result<Workspace> {
    sqlx::query_as::<_, Workspace>(
        r#"
        SELECT team_id, access_token, team_name, icon_url, user_id
        FROM workspaces
        WHERE team_id = ?
        "#,
    )
    .bind(team_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Workspace",
        id: team_id.to_string(),
    })
}
