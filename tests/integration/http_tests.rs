use crate::common::test_config;
use discord_rs::prelude::*;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

async fn client_for(server: &Server) -> Client {
    let client = Client::with_config(test_config(&server.url(), None)).unwrap();
    client.http().set_token(Token::new("abc").unwrap()).await;
    client
}

#[tokio::test]
async fn test_get_current_user_sends_bot_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/@me")
        .match_header("authorization", "Bot abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "80351110224678912",
                "username": "test-bot",
                "discriminator": "0",
                "avatar": null,
                "bot": true,
                "mfa_enabled": true,
                "verified": true
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server).await;
    let user = client.get_current_user().await.unwrap();

    assert_eq!(user.username, "test-bot");
    assert!(user.bot);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limited_request_is_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/@me")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "You are being rate limited.", "retry_after": 0.01, "global": false}"#)
        .expect(2)
        .create_async()
        .await;

    let config = Arc::new(test_config(&server.url(), None));
    let http = HttpClient::new(config)
        .unwrap()
        .with_retry_config(RetryConfig::with_max_retries_and_delay(1, 10));

    let result: Result<CurrentUser, AppError> = http.get("users/@me").await;

    assert!(matches!(result, Err(AppError::RateLimitExceeded)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_retry_after_header_used_without_body_value() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/@me")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_header("retry-after", "0.05")
        .with_body(r#"{"message": "You are being rate limited.", "global": true}"#)
        .expect(2)
        .create_async()
        .await;

    // The fallback delay is a minute, so finishing quickly means the header was used
    let config = Arc::new(test_config(&server.url(), None));
    let http = HttpClient::new(config)
        .unwrap()
        .with_retry_config(RetryConfig::with_max_retries_and_delay(1, 60_000));

    let result: Result<CurrentUser, AppError> =
        timeout(Duration::from_secs(10), http.get("users/@me"))
            .await
            .expect("retry should follow the Retry-After header");

    assert!(matches!(result, Err(AppError::RateLimitExceeded)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_huge_retry_after_does_not_panic() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/@me")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "You are being rate limited.", "retry_after": 1e30}"#)
        .create_async()
        .await;

    let config = Arc::new(test_config(&server.url(), None));
    let http = HttpClient::new(config)
        .unwrap()
        .with_retry_config(RetryConfig::with_max_retries(0));

    let request = tokio::spawn(async move { http.get::<CurrentUser>("users/@me").await });
    let result = request.await.expect("request task should not panic");

    assert!(matches!(result, Err(AppError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/@me")
        .with_status(401)
        .with_body(r#"{"message": "401: Unauthorized", "code": 0}"#)
        .create_async()
        .await;

    let client = client_for(&server).await;
    let result = client.get_current_user().await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn test_unknown_channel() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/channels/290926798999357250")
        .with_status(404)
        .with_body(r#"{"message": "Unknown Channel", "code": 10003}"#)
        .create_async()
        .await;

    let client = client_for(&server).await;
    let channel_id: Snowflake = "290926798999357250".parse().unwrap();
    let result = client.get_channel(channel_id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_api_error_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/channels/290926798999357250/messages")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Invalid Form Body", "code": 50035}"#)
        .create_async()
        .await;

    let client = client_for(&server).await;
    let channel_id: Snowflake = "290926798999357250".parse().unwrap();
    let result = client
        .create_message(channel_id, &CreateMessage::text("hello"))
        .await;

    match result {
        Err(AppError::Api { code, message, .. }) => {
            assert_eq!(code, Some(50035));
            assert_eq!(message, "Invalid Form Body");
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[tokio::test]
async fn test_create_message() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/channels/290926798999357250/messages")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({"content": "hello"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "334385199974967042",
                "channel_id": "290926798999357250",
                "author": {"id": "80351110224678912", "username": "test-bot", "bot": true},
                "content": "hello",
                "timestamp": "2017-07-11T17:27:07.299000+00:00",
                "edited_timestamp": null,
                "tts": false,
                "mention_everyone": false,
                "mentions": [],
                "mention_roles": []
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server).await;
    let channel_id: Snowflake = "290926798999357250".parse().unwrap();
    let message = client
        .create_message(channel_id, &CreateMessage::text("hello"))
        .await
        .unwrap();

    assert_eq!(message.content, "hello");
    assert_eq!(message.channel_id, channel_id);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gateway_bot() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/gateway/bot")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "url": "wss://gateway.discord.gg",
                "shards": 9,
                "session_start_limit": {
                    "total": 1000,
                    "remaining": 999,
                    "reset_after": 14400000,
                    "max_concurrency": 1
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server).await;
    let gateway = client.get_gateway_bot().await.unwrap();
    assert_eq!(gateway.shards, 9);
    assert_eq!(gateway.session_start_limit.remaining, 999);
}

#[tokio::test]
async fn test_gateway_url_fallback() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/gateway")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let http = HttpClient::new(Arc::new(test_config(&server.url(), None))).unwrap();
    let url = http.get_gateway_url().await.unwrap();
    assert_eq!(url, "wss://gateway.discord.gg/?v=10&encoding=json");
}
