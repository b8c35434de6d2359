/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Gateway WebSocket worker
//!
//! A single task owns the socket. It performs the Hello/Identify (or Resume)
//! handshake, heartbeats, forwards dispatches as [`Event`]s and reconnects when
//! the gateway asks for it or the connection drops. The client talks to it
//! through a [`GatewayHandle`].
//!
//! Reference: <https://discord.com/developers/docs/topics/gateway#connecting>

use crate::application::auth::{GatewaySession, Token};
use crate::application::config::Config;
use crate::application::rate_limiter::RateLimiter;
use crate::constants::{EVENT_CHANNEL_CAPACITY, MAX_RECONNECT_BACKOFF};
use crate::error::AppError;
use crate::model::events::Event;
use crate::model::gateway::{
    ConnectionProperties, GatewayPayload, Hello, Identify, Opcode, Resume, close_code,
};
use crate::model::http::gateway_url_with_query;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, sleep_until, timeout};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message as WsMessage,
};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, WsMessage>;
type WsRead = SplitStream<WsStream>;

/// Seconds to wait for Hello after the socket opens
const HELLO_TIMEOUT_SECS: u64 = 20;
/// Close code used when the client drops a connection it wants to resume.
/// Closing with 1000 or 1001 would invalidate the session.
const RESUMABLE_CLOSE_CODE: u16 = 4000;

/// Instructions sent from the client to the worker
#[derive(Debug)]
enum Command {
    Send(GatewayPayload),
    Shutdown,
}

/// How a single connection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// Closed on request, or nobody is listening for events any more
    Shutdown,
    /// Open a new connection; the session decides between Resume and Identify
    Reconnect,
}

/// Handle to a running gateway worker
///
/// Dropping the handle asks the worker to close the connection.
pub struct GatewayHandle {
    commands: mpsc::Sender<Command>,
    session: Arc<RwLock<GatewaySession>>,
    task: Option<JoinHandle<Result<(), AppError>>>,
}

impl GatewayHandle {
    /// Queues a payload for sending; it goes through the gateway send limiter
    pub async fn send(&self, payload: GatewayPayload) -> Result<(), AppError> {
        self.commands
            .send(Command::Send(payload))
            .await
            .map_err(|_| AppError::WebSocketError("gateway worker has stopped".to_string()))
    }

    /// Session state shared with the worker
    #[must_use]
    pub fn session(&self) -> Arc<RwLock<GatewaySession>> {
        self.session.clone()
    }

    /// Whether the worker task has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Closes the connection with code 1000 and waits for the worker to exit
    ///
    /// Returns the worker's result: `Ok` after a clean close, or the error that
    /// stopped it earlier.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        let _ = self.commands.send(Command::Shutdown).await;
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        match timeout(Duration::from_secs(5), task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(AppError::WebSocketError(format!(
                "gateway worker panicked: {join_error}"
            ))),
            Err(_) => {
                warn!("Gateway worker did not stop in time");
                Err(AppError::Timeout)
            }
        }
    }
}

impl Drop for GatewayHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.commands.try_send(Command::Shutdown);
        }
    }
}

impl std::fmt::Debug for GatewayHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayHandle")
            .field("running", &!self.is_finished())
            .finish()
    }
}

/// Channels produced when a gateway worker starts
pub struct GatewayChannels {
    /// Handle used to send payloads and stop the worker
    pub handle: GatewayHandle,
    /// Events forwarded by the worker
    pub events: mpsc::Receiver<Event>,
    /// Resolves once the first READY arrives, or with the error that prevented it
    pub ready: oneshot::Receiver<Result<(), AppError>>,
}

/// State owned by the gateway worker task
pub struct GatewayConnection {
    url: String,
    token: Token,
    config: Arc<Config>,
    session: Arc<RwLock<GatewaySession>>,
    limiter: RateLimiter,
    events: mpsc::Sender<Event>,
    /// Events waiting for room in the event channel
    backlog: VecDeque<Event>,
    /// Payloads queued while disconnected, sent after the next handshake
    outbox: VecDeque<GatewayPayload>,
    /// Whether the current connection has received any dispatch
    dispatched: bool,
    ready: Option<oneshot::Sender<Result<(), AppError>>>,
}

impl GatewayConnection {
    /// Spawns the worker for `url` (already carrying the version query)
    ///
    /// Nothing is awaited here; wait on [`GatewayChannels::ready`] to learn
    /// whether the handshake succeeded.
    pub fn spawn(
        url: String,
        token: Token,
        config: Arc<Config>,
        session: Arc<RwLock<GatewaySession>>,
    ) -> GatewayChannels {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (command_tx, command_rx) = mpsc::channel(32);
        let (ready_tx, ready_rx) = oneshot::channel();

        let connection = GatewayConnection {
            url,
            token,
            limiter: RateLimiter::new(&config.gateway_rate_limiter),
            config,
            session: session.clone(),
            events: event_tx,
            backlog: VecDeque::new(),
            outbox: VecDeque::new(),
            dispatched: false,
            ready: Some(ready_tx),
        };

        let task = tokio::spawn(connection.run(command_rx));

        GatewayChannels {
            handle: GatewayHandle {
                commands: command_tx,
                session,
                task: Some(task),
            },
            events: event_rx,
            ready: ready_rx,
        }
    }

    /// Connection loop: connect, serve, and reconnect until told to stop
    async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Result<(), AppError> {
        let mut failures: u32 = 0;
        // Reconnect requests that arrived before any dispatch, in a row
        let mut idle_reconnects: u32 = 0;

        loop {
            let url = self.next_url().await;
            let result = self.serve(&url, &mut commands).await;

            match result {
                Ok(Exit::Shutdown) => {
                    info!("Gateway connection closed");
                    self.report_ready(Err(AppError::WebSocketError(
                        "gateway closed before READY".to_string(),
                    )));
                    return Ok(());
                }
                Ok(Exit::Reconnect) if self.dispatched => {
                    failures = 0;
                    idle_reconnects = 0;
                    info!("Reconnecting to the gateway");
                }
                Ok(Exit::Reconnect) => {
                    failures = 0;
                    idle_reconnects += 1;
                    let delay = self.backoff(idle_reconnects);
                    warn!(
                        "Gateway asked to reconnect before any dispatch, waiting {} s",
                        delay.as_secs()
                    );
                    if self.wait_or_shutdown(delay, &mut commands).await {
                        return Ok(());
                    }
                }
                Err(e) if self.ready.is_some() => {
                    // Handshake never completed: report to login instead of retrying
                    error!("Gateway login failed: {e}");
                    let message = e.to_string();
                    self.report_ready(Err(e));
                    return Err(AppError::WebSocketError(message));
                }
                Err(e) if is_fatal(&e) => {
                    error!("Gateway connection cannot be resumed: {e}");
                    return Err(e);
                }
                Err(e) => {
                    failures += 1;
                    let max = self.config.gateway.max_reconnect_attempts;
                    if max > 0 && failures > max {
                        error!("Giving up after {} failed reconnects: {e}", failures - 1);
                        return Err(e);
                    }
                    let delay = self.backoff(failures);
                    warn!(
                        "Gateway connection lost ({e}), reconnect {} in {} s",
                        failures,
                        delay.as_secs()
                    );
                    if self.wait_or_shutdown(delay, &mut commands).await {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Resume URL when a session can be resumed, otherwise the initial URL
    async fn next_url(&self) -> String {
        let session = self.session.read().await;
        match (&session.resume_gateway_url, session.can_resume()) {
            (Some(resume_url), true) => match gateway_url_with_query(resume_url) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Ignoring invalid resume url: {e}");
                    self.url.clone()
                }
            },
            _ => self.url.clone(),
        }
    }

    fn backoff(&self, failures: u32) -> Duration {
        let base = self.config.gateway.reconnect_interval.max(1);
        let secs = base.saturating_mul(1 << failures.saturating_sub(1).min(16));
        Duration::from_secs(secs.min(MAX_RECONNECT_BACKOFF))
    }

    /// Sleeps for `delay`; returns true if a shutdown arrived meanwhile
    async fn wait_or_shutdown(
        &mut self,
        delay: Duration,
        commands: &mut mpsc::Receiver<Command>,
    ) -> bool {
        let deadline = Instant::now() + delay;
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => return false,
                cmd = commands.recv() => match cmd {
                    Some(Command::Send(payload)) => {
                        debug!("Queueing op {} payload until reconnected", payload.op);
                        self.outbox.push_back(payload);
                    }
                    Some(Command::Shutdown) | None => return true,
                }
            }
        }
    }

    fn report_ready(&mut self, result: Result<(), AppError>) {
        if let Some(tx) = self.ready.take() {
            let _ = tx.send(result);
        }
    }

    /// Runs one connection from handshake to close
    async fn serve(
        &mut self,
        url: &str,
        commands: &mut mpsc::Receiver<Command>,
    ) -> Result<Exit, AppError> {
        info!("Connecting to the gateway at {}", url);
        self.dispatched = false;
        let (ws_stream, response) = connect_async(url).await?;
        debug!("Gateway upgrade status: {}", response.status());

        let (mut write, mut read) = ws_stream.split();

        let hello = match timeout(Duration::from_secs(HELLO_TIMEOUT_SECS), read_hello(&mut read))
            .await
        {
            Ok(hello) => hello?,
            Err(_) => return Err(AppError::Timeout),
        };
        let heartbeat_interval = Duration::from_millis(hello.heartbeat_interval.max(1));
        debug!("Received Hello, heartbeat every {} ms", hello.heartbeat_interval);

        self.send_handshake(&mut write).await?;
        while let Some(payload) = self.outbox.pop_front() {
            self.limiter.wait().await;
            send_payload(&mut write, &payload).await?;
        }

        // First beat after interval * jitter so clients do not heartbeat in lockstep
        let mut next_beat = Instant::now() + heartbeat_interval.mul_f64(rand::random::<f64>());
        let mut heartbeat_acked = true;
        let events = self.events.clone();

        loop {
            tokio::select! {
                _ = sleep_until(next_beat) => {
                    if !heartbeat_acked {
                        warn!("Heartbeat not acknowledged, connection is zombied");
                        close(&mut write, RESUMABLE_CLOSE_CODE, "zombied connection").await;
                        return Ok(Exit::Reconnect);
                    }
                    self.send_heartbeat(&mut write).await?;
                    heartbeat_acked = false;
                    next_beat += heartbeat_interval;
                }

                permit = events.reserve(), if !self.backlog.is_empty() => match permit {
                    Ok(permit) => {
                        if let Some(event) = self.backlog.pop_front() {
                            permit.send(event);
                        }
                    }
                    Err(_) => {
                        info!("Event receiver dropped, closing gateway");
                        close(&mut write, 1000, "").await;
                        return Ok(Exit::Shutdown);
                    }
                },

                cmd = commands.recv() => match cmd {
                    Some(Command::Send(payload)) => {
                        self.limiter.wait().await;
                        send_payload(&mut write, &payload).await?;
                    }
                    Some(Command::Shutdown) | None => {
                        close(&mut write, 1000, "").await;
                        return Ok(Exit::Shutdown);
                    }
                },

                msg = read.next() => match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        let payload: GatewayPayload = match serde_json::from_str(&text) {
                            Ok(p) => p,
                            Err(e) => {
                                warn!("Failed to parse gateway payload: {e}");
                                continue;
                            }
                        };
                        if let Some(exit) = self.handle_payload(payload, &mut write, &mut heartbeat_acked).await? {
                            match exit {
                                Exit::Reconnect => close(&mut write, RESUMABLE_CLOSE_CODE, "reconnecting").await,
                                Exit::Shutdown => close(&mut write, 1000, "").await,
                            }
                            return Ok(exit);
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        return self.handle_close(frame).await;
                    }
                    Some(Ok(WsMessage::Binary(_))) => {
                        warn!("Ignoring binary gateway frame, compression is not enabled");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        return Err(e.into());
                    }
                    None => {
                        return Err(AppError::WebSocketError("gateway connection ended".to_string()));
                    }
                },
            }
        }
    }

    async fn send_handshake(&self, write: &mut WsWrite) -> Result<(), AppError> {
        let session = self.session.read().await.clone();
        let payload = match (&session.session_id, session.sequence) {
            (Some(session_id), Some(seq)) => {
                info!("Resuming session {} at sequence {}", session_id, seq);
                GatewayPayload::new(
                    Opcode::Resume,
                    Resume {
                        token: self.token.as_str().to_string(),
                        session_id: session_id.clone(),
                        seq,
                    },
                )?
            }
            _ => {
                debug!("Identifying with intents {}", self.config.gateway.intents);
                GatewayPayload::new(
                    Opcode::Identify,
                    Identify {
                        token: self.token.as_str().to_string(),
                        properties: ConnectionProperties::default(),
                        compress: false,
                        large_threshold: self.config.gateway.large_threshold,
                        intents: self.config.gateway.intents,
                        shard: None,
                    },
                )?
            }
        };
        self.limiter.wait().await;
        send_payload(write, &payload).await
    }

    async fn send_heartbeat(&self, write: &mut WsWrite) -> Result<(), AppError> {
        let sequence = self.session.read().await.sequence;
        debug!("Sending heartbeat (seq {:?})", sequence);
        send_payload(write, &GatewayPayload::heartbeat(sequence)).await
    }

    /// Reacts to one frame; `Some(exit)` ends the connection
    async fn handle_payload(
        &mut self,
        payload: GatewayPayload,
        write: &mut WsWrite,
        heartbeat_acked: &mut bool,
    ) -> Result<Option<Exit>, AppError> {
        if let Some(seq) = payload.s {
            self.session.write().await.update_sequence(seq);
        }

        match payload.opcode() {
            Ok(Opcode::Dispatch) => {
                self.dispatched = true;
                let name = payload.t.unwrap_or_default();
                let event = if name == "READY" && self.ready.is_some() {
                    Event::try_from_dispatch(&name, payload.d).map_err(|e| {
                        AppError::Deserialization(format!("invalid READY payload: {e}"))
                    })?
                } else {
                    Event::from_dispatch(&name, payload.d)
                };
                match &event {
                    Event::Ready(ready) => {
                        let mut session = self.session.write().await;
                        session.session_id = Some(ready.session_id.clone());
                        session.resume_gateway_url = Some(ready.resume_gateway_url.clone());
                        session.user = Some(ready.user.clone());
                        drop(session);
                        info!("Gateway ready, logged in as {}", ready.user.username);
                        self.report_ready(Ok(()));
                    }
                    Event::Resumed => info!("Session resumed"),
                    _ => debug!("Dispatch {}", name),
                }
                if !self.forward(event) {
                    info!("Event receiver dropped, closing gateway");
                    return Ok(Some(Exit::Shutdown));
                }
                Ok(None)
            }
            Ok(Opcode::Heartbeat) => {
                debug!("Gateway requested a heartbeat");
                self.send_heartbeat(write).await?;
                Ok(None)
            }
            Ok(Opcode::HeartbeatAck) => {
                *heartbeat_acked = true;
                debug!("Heartbeat acknowledged");
                Ok(None)
            }
            Ok(Opcode::Reconnect) => {
                info!("Gateway requested a reconnect");
                Ok(Some(Exit::Reconnect))
            }
            Ok(Opcode::InvalidSession) => {
                let resumable = payload.d.as_bool().unwrap_or(false);
                warn!("Session invalidated (resumable: {})", resumable);
                if !resumable {
                    self.session.write().await.clear();
                    // Discord asks for a random 1-5 s pause before identifying again
                    let pause = Duration::from_millis(1000 + rand::random::<u64>() % 4000);
                    sleep(pause).await;
                }
                Ok(Some(Exit::Reconnect))
            }
            Ok(op) => {
                debug!("Ignoring unexpected opcode {:?}", op);
                Ok(None)
            }
            Err(op) => {
                debug!("Ignoring unknown opcode {}", op);
                Ok(None)
            }
        }
    }

    /// Hands an event to the client, keeping it in the backlog while the
    /// channel is full; false once the receiver is gone
    fn forward(&mut self, event: Event) -> bool {
        if !self.backlog.is_empty() {
            self.backlog.push_back(event);
            if self.backlog.len() % EVENT_CHANNEL_CAPACITY == 0 {
                warn!("{} gateway events are waiting to be read", self.backlog.len());
            }
            return true;
        }
        match self.events.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                debug!("Event channel full, buffering {}", event.name());
                self.backlog.push_back(event);
                true
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    async fn handle_close(&mut self, frame: Option<CloseFrame>) -> Result<Exit, AppError> {
        let (code, reason) = frame
            .map(|f| (u16::from(f.code), f.reason.as_str().to_string()))
            .unwrap_or((1005, String::new()));
        warn!("Gateway closed the connection: {} {}", code, reason);

        if code == close_code::AUTHENTICATION_FAILED {
            return Err(AppError::AuthenticationFailed);
        }
        if close_code::is_fatal(code) {
            return Err(AppError::GatewayClosed { code, reason });
        }
        if close_code::requires_identify(code) {
            self.session.write().await.clear();
        }
        Err(AppError::WebSocketError(format!(
            "closed by gateway with code {code}"
        )))
    }
}

fn is_fatal(error: &AppError) -> bool {
    matches!(
        error,
        AppError::AuthenticationFailed | AppError::GatewayClosed { .. }
    )
}

async fn read_hello(read: &mut WsRead) -> Result<Hello, AppError> {
    loop {
        match read.next().await {
            Some(Ok(WsMessage::Text(text))) => {
                let payload: GatewayPayload = serde_json::from_str(&text)?;
                if payload.opcode() != Ok(Opcode::Hello) {
                    return Err(AppError::Deserialization(format!(
                        "expected Hello, got op {}",
                        payload.op
                    )));
                }
                return Ok(serde_json::from_value(payload.d)?);
            }
            Some(Ok(WsMessage::Close(frame))) => {
                let code = frame.map_or(1005, |f| u16::from(f.code));
                if code == close_code::AUTHENTICATION_FAILED {
                    return Err(AppError::AuthenticationFailed);
                }
                return Err(AppError::WebSocketError(format!(
                    "closed before Hello with code {code}"
                )));
            }
            Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => continue,
            Some(Ok(other)) => {
                return Err(AppError::Deserialization(format!(
                    "unexpected first message: {other:?}"
                )));
            }
            Some(Err(e)) => return Err(e.into()),
            None => {
                return Err(AppError::WebSocketError(
                    "connection closed before Hello".to_string(),
                ));
            }
        }
    }
}

async fn send_payload(write: &mut WsWrite, payload: &GatewayPayload) -> Result<(), AppError> {
    let text = serde_json::to_string(payload)?;
    write.send(WsMessage::Text(text.into())).await?;
    Ok(())
}

async fn close(write: &mut WsWrite, code: u16, reason: &str) {
    let frame = CloseFrame {
        code: CloseCode::from(code),
        reason: reason.to_string().into(),
    };
    if let Err(e) = write.send(WsMessage::Close(Some(frame))).await {
        debug!("Failed to send close frame: {e}");
    }
}
