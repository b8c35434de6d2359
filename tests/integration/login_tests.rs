use crate::common::*;
use discord_rs::prelude::*;
use futures_util::StreamExt;
use mockito::Server;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

const NO_REST: &str = "http://127.0.0.1:9";

fn config_file(contents: &str) -> ConfigFile {
    let path = std::env::temp_dir().join(format!("discord-rs-{}.json", nanoid::nanoid!()));
    std::fs::write(&path, contents).unwrap();
    let config = ConfigFile::from_path(&path).unwrap();
    std::fs::remove_file(path).unwrap();
    config
}

#[tokio::test]
async fn test_login_identifies_with_config_token() {
    let gateway = MockGateway::bind().await;
    let url = gateway.url.clone();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let resume_url = url.clone();
    gateway.serve(move |_, mut ws| {
        let tx = tx.clone();
        let resume_url = resume_url.clone();
        async move {
            send_hello(&mut ws, 45_000).await;
            let identify = recv_op(&mut ws, 2).await.expect("identify");
            tx.send(identify).unwrap();
            send_ready(&mut ws, 1, "session-1", &resume_url).await;
            let _ = recv_close(&mut ws).await;
        }
    });

    let config = config_file(r#"{"token": "abc"}"#);
    let mut client = Client::with_config(test_config(NO_REST, Some(&url))).unwrap();
    client.login(config.token).await.unwrap();

    let identify = rx.recv().await.unwrap();
    assert_eq!(identify["d"]["token"], "abc");
    assert_eq!(identify["d"]["intents"], client.config().gateway.intents);
    assert!(client.is_logged_in());
    assert_eq!(client.user().await.unwrap().username, "test-bot");
    assert_eq!(client.session().await.session_id.as_deref(), Some("session-1"));

    client.shutdown().await.unwrap();
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_login_without_token_never_connects() {
    let gateway = MockGateway::bind().await;
    let url = gateway.url.clone();
    let (tx, mut rx) = mpsc::unbounded_channel::<usize>();
    gateway.serve(move |index, _ws| {
        let tx = tx.clone();
        async move {
            tx.send(index).unwrap();
        }
    });

    let config = config_file(r#"{"name": "no token here"}"#);
    assert_eq!(config.token, None);

    let mut client = Client::with_config(test_config(NO_REST, Some(&url))).unwrap();
    let result = client.login(config.token).await;

    assert!(matches!(result, Err(AppError::MissingToken)));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_login_resolves_gateway_over_rest() {
    let gateway = MockGateway::bind().await;
    let url = gateway.url.clone();
    let resume_url = url.clone();
    gateway.serve(move |_, mut ws| {
        let resume_url = resume_url.clone();
        async move {
            send_hello(&mut ws, 45_000).await;
            recv_op(&mut ws, 2).await.expect("identify");
            send_ready(&mut ws, 1, "session-1", &resume_url).await;
            let _ = recv_close(&mut ws).await;
        }
    });

    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/gateway")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "url": url }).to_string())
        .create_async()
        .await;

    let mut client = Client::with_config(test_config(&server.url(), None)).unwrap();
    client.login(Some("abc".to_string())).await.unwrap();
    mock.assert_async().await;

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_login_rejected_token() {
    let gateway = MockGateway::bind().await;
    let url = gateway.url.clone();
    gateway.serve(|_, mut ws| async move {
        send_hello(&mut ws, 45_000).await;
        recv_op(&mut ws, 2).await.expect("identify");
        let frame = CloseFrame {
            code: CloseCode::from(4004),
            reason: "Authentication failed.".into(),
        };
        let _ = ws.close(Some(frame)).await;
        while ws.next().await.is_some() {}
    });

    let mut client = Client::with_config(test_config(NO_REST, Some(&url))).unwrap();
    let result = client.login(Some("Bot wrong".to_string())).await;

    assert!(matches!(result, Err(AppError::AuthenticationFailed)));
    assert!(!client.is_logged_in());
    assert!(!client.http().has_token().await);
}

#[tokio::test]
async fn test_login_malformed_ready() {
    let gateway = MockGateway::bind().await;
    let url = gateway.url.clone();
    gateway.serve(|_, mut ws| async move {
        send_hello(&mut ws, 45_000).await;
        recv_op(&mut ws, 2).await.expect("identify");
        send_dispatch(&mut ws, "READY", 1, json!({"v": 10})).await;
        let _ = recv_close(&mut ws).await;
    });

    let mut client = Client::with_config(test_config(NO_REST, Some(&url))).unwrap();
    let result = timeout(Duration::from_secs(10), client.login(Some("abc".to_string())))
        .await
        .expect("login should fail before its own timeout");

    assert!(matches!(result, Err(AppError::Deserialization(_))));
    assert!(!client.is_logged_in());
    assert!(!client.http().has_token().await);
}

#[tokio::test]
async fn test_login_twice() {
    let gateway = MockGateway::bind().await;
    let url = gateway.url.clone();
    let resume_url = url.clone();
    gateway.serve(move |_, mut ws| {
        let resume_url = resume_url.clone();
        async move {
            send_hello(&mut ws, 45_000).await;
            recv_op(&mut ws, 2).await.expect("identify");
            send_ready(&mut ws, 1, "session-1", &resume_url).await;
            let _ = recv_close(&mut ws).await;
        }
    });

    let mut client = Client::with_config(test_config(NO_REST, Some(&url))).unwrap();
    client.login(Some("abc".to_string())).await.unwrap();
    let second = client.login(Some("abc".to_string())).await;
    assert!(matches!(second, Err(AppError::AlreadyLoggedIn)));

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_events_presence_and_shutdown() {
    let gateway = MockGateway::bind().await;
    let url = gateway.url.clone();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let resume_url = url.clone();
    gateway.serve(move |_, mut ws| {
        let tx = tx.clone();
        let resume_url = resume_url.clone();
        async move {
            send_hello(&mut ws, 45_000).await;
            recv_op(&mut ws, 2).await.expect("identify");
            send_ready(&mut ws, 1, "session-1", &resume_url).await;
            send_dispatch(
                &mut ws,
                "MESSAGE_CREATE",
                2,
                json!({
                    "id": "334385199974967042",
                    "channel_id": "290926798999357250",
                    "author": {"id": "53908099506183680", "username": "Mason"},
                    "content": "ping",
                    "timestamp": "2017-07-11T17:27:07.299000+00:00",
                    "tts": false,
                    "mention_everyone": false,
                    "mentions": [],
                    "mention_roles": []
                }),
            )
            .await;
            let presence = recv_op(&mut ws, 3).await.expect("presence update");
            tx.send(presence).unwrap();
            let code = recv_close(&mut ws).await;
            tx.send(json!(code)).unwrap();
        }
    });

    let mut client = Client::with_config(test_config(NO_REST, Some(&url))).unwrap();
    client.login(Some("abc".to_string())).await.unwrap();

    let first = timeout(Duration::from_secs(5), client.next_event()).await.unwrap();
    assert!(matches!(first, Some(Event::Ready(_))));
    match timeout(Duration::from_secs(5), client.next_event()).await.unwrap() {
        Some(Event::MessageCreate(message)) => assert_eq!(message.content, "ping"),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(client.session().await.sequence, Some(2));

    client.update_presence("idle").await.unwrap();
    let presence = rx.recv().await.unwrap();
    assert_eq!(presence["d"]["status"], "idle");

    client.shutdown().await.unwrap();
    let close_code = rx.recv().await.unwrap();
    assert_eq!(close_code, json!(1000));
    assert!(client.next_event().await.is_none());
}
