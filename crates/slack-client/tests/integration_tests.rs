//! Integration tests for slack-client against a mock Web API.

use std::time::Duration;

use mockito::{Matcher, Server};
use slack_client::{PostMessageParams, SlackApi, SlackClient, SlackConfig, SlackError};

fn client_for(server: &Server) -> SlackClient {
    SlackClient::new(SlackConfig::new(server.url())).unwrap()
}

mod config_tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SlackConfig::default();
        assert_eq!(config.api_url, "https://slack.com/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.page_limit, 200);
    }

    #[test]
    fn test_method_url_trims_slash() {
        let config = SlackConfig::new("http://localhost:9000/api/");
        assert_eq!(
            config.method_url("users.list"),
            "http://localhost:9000/api/users.list"
        );
    }
}

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_users_with_cursor() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users.list")
            .match_header("authorization", "Bearer xoxb-1")
            .match_query(Matcher::UrlEncoded("limit".into(), "200".into()))
            .with_status(200)
            .with_body(
                r#"{"ok": true,
                    "members": [{"id": "U1", "name": "alice", "profile": {"display_name": "Alice"}}],
                    "response_metadata": {"next_cursor": "dXNlcjpVMg=="}}"#,
            )
            .create_async()
            .await;

        let page = client_for(&server).list_users("xoxb-1", None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].display_name(), "Alice");
        assert_eq!(page.next_cursor.as_deref(), Some("dXNlcjpVMg=="));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_channels_requests_all_kinds() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/conversations.list")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "types".into(),
                    "public_channel,private_channel,mpim,im".into(),
                ),
                Matcher::UrlEncoded("exclude_archived".into(), "true".into()),
                Matcher::UrlEncoded("cursor".into(), "next".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"ok": true,
                    "channels": [{"id": "C1", "name": "dev"}, {"id": "D1", "is_im": true, "user": "U2"}],
                    "response_metadata": {"next_cursor": ""}}"#,
            )
            .create_async()
            .await;

        let page = client_for(&server)
            .list_channels("xoxb-1", Some("next"))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_channel_history_passes_oldest() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("channel".into(), "C1".into()),
                Matcher::UrlEncoded("oldest".into(), "1700000000.000000".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"ok": true, "messages": [
                    {"type": "message", "user": "U1", "text": "deploy failed", "ts": "1700000100.000200"},
                    {"type": "message", "subtype": "channel_join", "user": "U2", "text": "", "ts": "1700000050.000100"}
                ]}"#,
            )
            .create_async()
            .await;

        let page = client_for(&server)
            .channel_history("xoxb-1", "C1", "1700000000.000000", None)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more());
        assert!(page.items[0].is_plain_user_message());
        assert!(!page.items[1].is_plain_user_message());
    }

    #[tokio::test]
    async fn test_channel_history_follows_cursor() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Regex(r"^limit=\d+&channel=C1&".into()))
            .expect(1)
            .with_status(200)
            .with_body(
                r#"{"ok": true, "has_more": true,
                    "messages": [{"type": "message", "user": "U1", "text": "newest", "ts": "1700000200.000100"}],
                    "response_metadata": {"next_cursor": "c2"}}"#,
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::UrlEncoded("cursor".into(), "c2".into()))
            .expect(1)
            .with_status(200)
            .with_body(
                r#"{"ok": true, "has_more": false,
                    "messages": [{"type": "message", "user": "U1", "text": "older", "ts": "1700000100.000100"}],
                    "response_metadata": {"next_cursor": ""}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let page = client
            .channel_history("xoxb-1", "C1", "0", None)
            .await
            .unwrap();
        assert_eq!(page.items[0].text, "newest");
        assert_eq!(page.next_cursor.as_deref(), Some("c2"));

        let next = client
            .channel_history("xoxb-1", "C1", "0", page.next_cursor.as_deref())
            .await
            .unwrap();
        assert_eq!(next.items[0].text, "older");
        assert!(!next.has_more());

        first.assert_async().await;
        second.assert_async().await;
    }
}

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_429_reports_retry_after() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;

        let err = client_for(&server)
            .channel_history("xoxb-1", "C1", "0", None)
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn test_ratelimited_body_without_header() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/conversations.list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok": false, "error": "ratelimited"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .list_channels("xoxb-1", None)
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(err.retry_after(), None);
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users.list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok": false, "error": "invalid_auth"}"#)
            .create_async()
            .await;

        match client_for(&server).list_users("xoxb-bad", None).await {
            Err(SlackError::Api { method, error }) => {
                assert_eq!(method, "users.list");
                assert_eq!(error, "invalid_auth");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_token_fails_without_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users.list")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let result = client_for(&server).list_users("  ", None).await;
        assert!(matches!(result, Err(SlackError::Config(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users.list")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("upstream down")
            .create_async()
            .await;

        match client_for(&server).list_users("xoxb-1", None).await {
            Err(SlackError::Status { status, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream down");
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }
}

mod post_tests {
    use super::*;

    #[tokio::test]
    async fn test_post_message_in_thread() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat.postMessage")
            .match_header("authorization", "Bearer xoxb-1")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "channel": "C1",
                "text": "了解です",
                "thread_ts": "1700000100.000200"
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "channel": "C1", "ts": "1700000200.000300"}"#)
            .create_async()
            .await;

        let params = PostMessageParams::text("C1", "了解です").in_thread("1700000100.000200");
        let posted = client_for(&server)
            .post_message("xoxb-1", params)
            .await
            .unwrap();
        assert_eq!(posted.ts, "1700000200.000300");
        mock.assert_async().await;
    }
}
