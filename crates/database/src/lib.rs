//! SQLite persistence layer for the message buffer.
//!
//! This crate provides async database operations for connected workspaces,
//! ingested items, digest summaries and user settings using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{item, Database, ItemMeta, NewItem, SourceType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:buffer.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Save a link for later
//!     let link = NewItem {
//!         source_type: SourceType::Web,
//!         content: "https://example.com/article".to_string(),
//!         meta: ItemMeta::default(),
//!         user_id: "user-1".to_string(),
//!     };
//!     item::insert_item(db.pool(), &link).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod item;
pub mod models;
pub mod summary;
pub mod user_settings;
pub mod validation;
pub mod workspace;

pub use error::{DatabaseError, Result};
pub use models::{
    Item, ItemMeta, ItemStatus, NewItem, SourceType, Summary, UserSettings, Workspace,
};
pub use validation::ValidationError;

pub use sqlx::types::Json;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/buffer.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every in-memory connection is a separate database, so keep one.
        let pool_size = if url.contains(":memory:") { 1 } else { pool_size };

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether the pool has been closed.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn slack_item(user_id: &str, team: &str, channel: &str, ts: &str, text: &str) -> NewItem {
        NewItem {
            source_type: SourceType::Slack,
            content: text.to_string(),
            meta: ItemMeta {
                user: Some("U1".to_string()),
                user_name: Some("Alice".to_string()),
                channel: Some(channel.to_string()),
                ts: Some(ts.to_string()),
                team: Some(team.to_string()),
                created_via: Some("poll".to_string()),
                ..Default::default()
            },
            user_id: user_id.to_string(),
        }
    }

    async fn backdate(db: &Database, id: &str, days: i64) {
        sqlx::query("UPDATE items SET created_at = datetime('now', ?) WHERE id = ?")
            .bind(format!("-{} days", days))
            .bind(id)
            .execute(db.pool())
            .await
            .unwrap();
    }

    async fn set_status(db: &Database, id: &str, status: ItemStatus) {
        sqlx::query("UPDATE items SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_workspace_upsert_and_list() {
        let db = test_db().await;

        let mut ws = Workspace {
            team_id: "T1".to_string(),
            access_token: "xoxb-1".to_string(),
            team_name: Some("Acme".to_string()),
            icon_url: None,
            user_id: "user-1".to_string(),
        };
        workspace::upsert_workspace(db.pool(), &ws).await.unwrap();

        ws.team_name = Some("Acme Inc".to_string());
        workspace::upsert_workspace(db.pool(), &ws).await.unwrap();

        let empty = Workspace {
            team_id: "T2".to_string(),
            access_token: String::new(),
            team_name: None,
            icon_url: None,
            user_id: "user-2".to_string(),
        };
        workspace::upsert_workspace(db.pool(), &empty).await.unwrap();

        let pollable = workspace::list_pollable(db.pool()).await.unwrap();
        assert_eq!(pollable.len(), 1);
        assert_eq!(pollable[0].team_name.as_deref(), Some("Acme Inc"));

        let fetched = workspace::get_for_user(db.pool(), "user-1", "T1").await.unwrap();
        assert_eq!(fetched.access_token, "xoxb-1");

        let other = workspace::get_for_user(db.pool(), "user-2", "T1").await;
        assert!(matches!(other, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_insert_if_absent_deduplicates() {
        let db = test_db().await;
        let item = slack_item("user-1", "T1", "C1", "1700000000.000100", "deploy failed");

        let first = item::insert_if_absent(db.pool(), &item).await.unwrap();
        assert!(first.is_some());

        let second = item::insert_if_absent(db.pool(), &item).await.unwrap();
        assert!(second.is_none());

        // Same channel and ts in another team is a different message.
        let other_team = slack_item("user-1", "T2", "C1", "1700000000.000100", "deploy failed");
        assert!(item::insert_if_absent(db.pool(), &other_team)
            .await
            .unwrap()
            .is_some());

        assert_eq!(item::count_for_user(db.pool(), "user-1").await.unwrap(), 2);
        assert!(item::exists_by_source(db.pool(), "T1", "C1", "1700000000.000100")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_pending_queries_are_scoped_and_capped() {
        let db = test_db().await;

        for i in 0..5 {
            let item = slack_item("user-a", "T1", "C1", &format!("100.{}", i), "a");
            item::insert_item(db.pool(), &item).await.unwrap();
        }
        let b = slack_item("user-b", "T2", "C9", "200.0", "b");
        item::insert_item(db.pool(), &b).await.unwrap();

        let users = item::pending_user_ids(db.pool()).await.unwrap();
        assert_eq!(users, vec!["user-a".to_string(), "user-b".to_string()]);

        let batch = item::pending_for_user(db.pool(), "user-a", 3).await.unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch.iter().all(|item| item.user_id == "user-a"));
        assert_eq!(batch[0].meta().ts.as_deref(), Some("100.0"));
    }

    #[tokio::test]
    async fn test_mark_summarized_is_monotone() {
        let db = test_db().await;
        let id = item::insert_item(db.pool(), &slack_item("u", "T", "C", "1.0", "x"))
            .await
            .unwrap();
        let ids = vec![id.clone()];

        assert_eq!(item::mark_summarized(db.pool(), "u", &ids).await.unwrap(), 1);
        assert_eq!(item::mark_summarized(db.pool(), "u", &ids).await.unwrap(), 0);

        item::archive_items(db.pool(), "u", &ids).await.unwrap();
        assert_eq!(item::mark_summarized(db.pool(), "u", &ids).await.unwrap(), 0);

        let stored = item::get_item(db.pool(), "u", &id).await.unwrap();
        assert_eq!(stored.status, ItemStatus::Archived);
    }

    #[test]
    fn test_only_pending_is_unprocessed() {
        let processed: Vec<ItemStatus> = ItemStatus::ALL
            .into_iter()
            .filter(ItemStatus::is_processed)
            .collect();
        assert_eq!(
            processed,
            vec![ItemStatus::Summarized, ItemStatus::Done, ItemStatus::Archived]
        );
    }

    #[tokio::test]
    async fn test_mark_summarized_ignores_other_users() {
        let db = test_db().await;
        let id = item::insert_item(db.pool(), &slack_item("owner", "T", "C", "1.0", "x"))
            .await
            .unwrap();

        let changed = item::mark_summarized(db.pool(), "intruder", &[id.clone()])
            .await
            .unwrap();
        assert_eq!(changed, 0);

        let stored = item::get_item(db.pool(), "owner", &id).await.unwrap();
        assert_eq!(stored.status, ItemStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_processed_older_than() {
        let db = test_db().await;
        let week = Duration::from_secs(7 * 24 * 60 * 60);

        let old_done = item::insert_item(db.pool(), &slack_item("u", "T", "C", "1.0", "x"))
            .await
            .unwrap();
        set_status(&db, &old_done, ItemStatus::Done).await;
        backdate(&db, &old_done, 10).await;

        let old_pending = item::insert_item(db.pool(), &slack_item("u", "T", "C", "2.0", "y"))
            .await
            .unwrap();
        backdate(&db, &old_pending, 10).await;

        let old_link = item::insert_item(
            db.pool(),
            &NewItem {
                source_type: SourceType::Web,
                content: "https://example.com".to_string(),
                meta: ItemMeta::default(),
                user_id: "u".to_string(),
            },
        )
        .await
        .unwrap();
        set_status(&db, &old_link, ItemStatus::Done).await;
        backdate(&db, &old_link, 10).await;

        let fresh_done = item::insert_item(db.pool(), &slack_item("u", "T", "C", "3.0", "z"))
            .await
            .unwrap();
        set_status(&db, &fresh_done, ItemStatus::Summarized).await;

        let deleted = item::delete_processed_older_than(db.pool(), week).await.unwrap();
        assert_eq!(deleted, 1);

        assert!(item::get_item(db.pool(), "u", &old_done).await.is_err());
        assert!(item::get_item(db.pool(), "u", &old_pending).await.is_ok());
        assert!(item::get_item(db.pool(), "u", &old_link).await.is_ok());
        assert!(item::get_item(db.pool(), "u", &fresh_done).await.is_ok());
    }

    #[tokio::test]
    async fn test_summary_roundtrip_and_latest() {
        let db = test_db().await;
        let ids = vec!["a".to_string(), "b".to_string()];

        summary::insert_summary(db.pool(), "u", "first", &ids).await.unwrap();
        let second = summary::insert_summary(db.pool(), "u", "second", &ids[..1])
            .await
            .unwrap();
        assert_eq!(second.item_ids(), &["a".to_string()]);

        let latest = summary::latest_for_user(db.pool(), "u").await.unwrap().unwrap();
        assert_eq!(latest.summary_text, "second");

        assert!(summary::latest_for_user(db.pool(), "nobody")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_user_settings_upsert() {
        let db = test_db().await;
        assert!(user_settings::get_custom_instructions(db.pool(), "u")
            .await
            .unwrap()
            .is_none());

        let mut settings = UserSettings::new("u");
        settings.alert_keywords.0 = vec![" 障害 ".to_string(), "障害".to_string()];
        settings.report_custom_instructions = Some("  ".to_string());
        user_settings::upsert_settings(db.pool(), &settings).await.unwrap();

        let stored = user_settings::get_settings(db.pool(), "u").await.unwrap().unwrap();
        assert_eq!(stored.alert_keywords.0, vec!["障害".to_string()]);
        assert!(stored.report_custom_instructions.is_none());

        settings.report_custom_instructions = Some("Lead with deadlines".to_string());
        user_settings::upsert_settings(db.pool(), &settings).await.unwrap();
        assert_eq!(
            user_settings::get_custom_instructions(db.pool(), "u")
                .await
                .unwrap()
                .as_deref(),
            Some("Lead with deadlines")
        );
    }
}
