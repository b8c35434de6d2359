// Common utilities for integration tests

use discord_rs::prelude::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::future::Future;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

/// Server side of a gateway connection
pub type ServerSocket = WebSocketStream<TcpStream>;

/// A local WebSocket server standing in for the Discord gateway
pub struct MockGateway {
    listener: TcpListener,
    /// `ws://` URL of the server
    pub url: String,
}

impl MockGateway {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock gateway");
        let addr = listener.local_addr().expect("mock gateway address");
        Self {
            listener,
            url: format!("ws://{addr}"),
        }
    }

    /// Accepts connections one after another, handing each to `handler`
    /// together with its index
    pub fn serve<F, Fut>(self, mut handler: F)
    where
        F: FnMut(usize, ServerSocket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let mut index = 0;
            while let Ok((stream, _)) = self.listener.accept().await {
                let Ok(ws) = accept_async(stream).await else {
                    continue;
                };
                handler(index, ws).await;
                index += 1;
            }
        });
    }
}

/// Configuration pointing the client at local servers
pub fn test_config(rest_url: &str, gateway_url: Option<&str>) -> Config {
    setup_logger();
    Config::new().with_endpoints(rest_url, gateway_url)
}

pub async fn send_json(ws: &mut ServerSocket, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("send to client");
}

pub async fn send_hello(ws: &mut ServerSocket, heartbeat_interval: u64) {
    send_json(
        ws,
        json!({"op": 10, "d": {"heartbeat_interval": heartbeat_interval}, "s": null, "t": null}),
    )
    .await;
}

pub async fn send_dispatch(ws: &mut ServerSocket, name: &str, seq: u64, data: Value) {
    send_json(ws, json!({"op": 0, "d": data, "s": seq, "t": name})).await;
}

pub async fn send_ready(ws: &mut ServerSocket, seq: u64, session_id: &str, resume_url: &str) {
    send_dispatch(
        ws,
        "READY",
        seq,
        json!({
            "v": 10,
            "user": {"id": "80351110224678912", "username": "test-bot", "discriminator": "0", "bot": true},
            "guilds": [{"id": "41771983423143937", "unavailable": true}],
            "session_id": session_id,
            "resume_gateway_url": resume_url
        }),
    )
    .await;
}

/// Reads frames until one with opcode `op` arrives; `None` once the socket closes
pub async fn recv_op(ws: &mut ServerSocket, op: u64) -> Option<Value> {
    while let Some(Ok(message)) = ws.next().await {
        match message {
            Message::Text(text) => {
                let value: Value = serde_json::from_str(text.as_str()).expect("client sent json");
                if value["op"] == op {
                    return Some(value);
                }
            }
            Message::Close(_) => return None,
            _ => {}
        }
    }
    None
}

/// Reads until the client closes; returns the close code it sent
pub async fn recv_close(ws: &mut ServerSocket) -> Option<u16> {
    while let Some(Ok(message)) = ws.next().await {
        if let Message::Close(frame) = message {
            return Some(frame.map_or(1005, |f| u16::from(f.code)));
        }
    }
    None
}
