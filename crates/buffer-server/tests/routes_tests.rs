//! Router tests against an in-memory database.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use buffer_server::{app, AppState};
use database::{item, Database, ItemMeta, NewItem, SourceType};
use mock_brain::EchoSummarizer;
use pipeline::{BatchSummarizer, PipelineSettings, RetentionSweeper, SourcePoller};
use slack_client::{
    Page, PostMessageParams, PostMessageResponse, SlackApi, SlackChannel, SlackError,
    SlackMessage, SlackUser,
};
use tower::ServiceExt;

/// A Slack with no workspaces to read.
struct EmptySlack;

#[async_trait]
impl SlackApi for EmptySlack {
    async fn list_users(&self, _: &str, _: Option<&str>) -> Result<Page<SlackUser>, SlackError> {
        Ok(Page::new(Vec::new(), None))
    }

    async fn list_channels(
        &self,
        _: &str,
        _: Option<&str>,
    ) -> Result<Page<SlackChannel>, SlackError> {
        Ok(Page::new(Vec::new(), None))
    }

    async fn channel_history(
        &self,
        _: &str,
        _: &str,
        _: &str,
        _: Option<&str>,
    ) -> Result<Page<SlackMessage>, SlackError> {
        Ok(Page::new(Vec::new(), None))
    }

    async fn post_message(
        &self,
        _: &str,
        _: PostMessageParams,
    ) -> Result<PostMessageResponse, SlackError> {
        Err(SlackError::Config("read-only".to_string()))
    }
}

async fn state(secret: Option<&str>) -> AppState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();

    let settings = PipelineSettings::without_delays();
    let poller = SourcePoller::new(db.clone(), Arc::new(EmptySlack), settings.clone());
    let batch = Arc::new(BatchSummarizer::new(
        db.clone(),
        poller,
        Arc::new(EchoSummarizer::new()),
    ));
    let sweeper = Arc::new(RetentionSweeper::new(db.clone(), settings.retention));
    AppState::new(db, batch, sweeper, secret.map(str::to_string))
}

fn post(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app(state(None).await);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_triggers_unavailable_without_secret() {
    let app = app(state(None).await);
    let response = app
        .oneshot(post("/api/cron/batch", Some("anything")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_triggers_reject_wrong_or_missing_secret() {
    let state = state(Some("s3cret")).await;

    let response = app(state.clone())
        .oneshot(post("/api/cron/cleanup", Some("wrong")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(state)
        .oneshot(post("/api/cron/batch", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_batch_trigger_returns_report() {
    let state = state(Some("s3cret")).await;
    let new_item = NewItem {
        source_type: SourceType::Slack,
        content: "deploy failed".to_string(),
        meta: ItemMeta {
            channel_name: Some("dev".to_string()),
            user_name: Some("Alice".to_string()),
            ..ItemMeta::default()
        },
        user_id: "owner-1".to_string(),
    };
    item::insert_item(state.db.pool(), &new_item).await.unwrap();

    let response = app(state)
        .oneshot(post("/api/cron/batch", Some("s3cret")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["users_processed"], 1);
    assert_eq!(body["results"][0]["user_id"], "owner-1");
    assert_eq!(body["results"][0]["processed_count"], 1);
    assert_eq!(body["results"][0]["summary_text"], "#dev Alice: deploy failed");
}

#[tokio::test]
async fn test_cleanup_trigger_returns_count() {
    let state = state(Some("s3cret")).await;
    let response = app(state)
        .oneshot(post("/api/cron/cleanup", Some("s3cret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["deleted"], 0);
}

#[tokio::test]
async fn test_closed_store_reports_unavailable() {
    let state = state(Some("s3cret")).await;
    state.db.close().await;

    let response = app(state)
        .oneshot(post("/api/cron/cleanup", Some("s3cret")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
