/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Discord client
//!
//! [`Client`] is built without touching the network. [`Client::login`] sets
//! the bot token, opens the gateway connection and returns once READY arrives.
//! Events are then read with [`Client::next_event`].
//!
//! # Example
//! ```no_run
//! use discord_rs::prelude::*;
//!
//! # async fn run() -> Result<(), AppError> {
//! let mut client = Client::new();
//! client.login(Some("my-bot-token".to_string())).await?;
//! while let Some(event) = client.next_event().await {
//!     info!("{}", event.name());
//! }
//! # Ok(())
//! # }
//! ```

use crate::application::auth::{GatewaySession, Token};
use crate::application::config::Config;
use crate::application::interfaces::{ChannelService, UserService};
use crate::constants::LOGIN_TIMEOUT_SECS;
use crate::error::AppError;
use crate::model::events::Event;
use crate::model::gateway::{GatewayPayload, Opcode, PresenceUpdate};
use crate::model::http::{HttpClient, gateway_url_with_query};
use crate::presentation::channel::Channel;
use crate::presentation::gateway::GatewayBot;
use crate::presentation::message::{CreateMessage, Message};
use crate::presentation::user::CurrentUser;
use crate::transport::ws::{GatewayChannels, GatewayConnection, GatewayHandle};
use crate::utils::snowflake::Snowflake;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Presence statuses accepted by the gateway
const PRESENCE_STATUSES: [&str; 5] = ["online", "dnd", "idle", "invisible", "offline"];

/// Discord bot client
pub struct Client {
    config: Arc<Config>,
    http_client: Arc<HttpClient>,
    session: Arc<RwLock<GatewaySession>>,
    gateway: Option<GatewayHandle>,
    events: Option<mpsc::Receiver<Event>>,
}

impl Client {
    /// Creates a client configured from the environment
    ///
    /// No request is made and no token is set.
    ///
    /// # Panics
    /// If the HTTP client cannot be built (TLS backend unavailable); use
    /// [`Client::with_config`] to handle that case.
    pub fn new() -> Self {
        Self::with_config(Config::new()).expect("failed to build the HTTP client")
    }

    /// Creates a client from an explicit configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);
        let http_client = Arc::new(HttpClient::new(config.clone())?);
        Ok(Self {
            config,
            http_client,
            session: Arc::new(RwLock::new(GatewaySession::default())),
            gateway: None,
            events: None,
        })
    }

    /// Logs in with a bot token and waits for the gateway to be READY
    ///
    /// # Arguments
    /// * `token` - Bot token, with or without the `Bot ` prefix
    ///
    /// # Returns
    /// * `Err(AppError::MissingToken)` - `token` is `None`; nothing is sent
    /// * `Err(AppError::AlreadyLoggedIn)` - a gateway connection is already running
    /// * `Err(AppError::InvalidToken)` - the token is empty or malformed
    /// * `Err(AppError::AuthenticationFailed)` - the gateway rejected the token
    /// * `Err(AppError::Timeout)` - READY did not arrive in time
    pub async fn login(&mut self, token: Option<String>) -> Result<(), AppError> {
        if self.is_logged_in() {
            return Err(AppError::AlreadyLoggedIn);
        }
        let token = Token::new(token.ok_or(AppError::MissingToken)?)?;

        self.http_client.set_token(token.clone()).await;
        if let Err(e) = self.connect(token).await {
            warn!("Login failed: {e}");
            self.http_client.clear_token().await;
            return Err(e);
        }
        Ok(())
    }

    async fn connect(&mut self, token: Token) -> Result<(), AppError> {
        let url = match &self.config.gateway.url {
            Some(url) => gateway_url_with_query(url)?,
            None => self.http_client.get_gateway_url().await?,
        };
        *self.session.write().await = GatewaySession::default();

        let GatewayChannels {
            mut handle,
            events,
            ready,
        } = GatewayConnection::spawn(url, token, self.config.clone(), self.session.clone());

        let outcome = match timeout(Duration::from_secs(LOGIN_TIMEOUT_SECS), ready).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(AppError::WebSocketError(
                "gateway worker stopped before READY".to_string(),
            )),
            Err(_) => Err(AppError::Timeout),
        };

        match outcome {
            Ok(()) => {
                if let Some(user) = &self.session.read().await.user {
                    info!("Logged in as {} ({})", user.username, user.id);
                }
                self.gateway = Some(handle);
                self.events = Some(events);
                Ok(())
            }
            Err(e) => {
                if let Err(worker_error) = handle.shutdown().await {
                    debug!("Gateway worker exited with: {worker_error}");
                }
                Err(e)
            }
        }
    }

    /// Waits for the next gateway event
    ///
    /// Returns `None` when not logged in or once the connection has stopped
    /// and every buffered event has been read.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.as_mut()?.recv().await
    }

    /// Whether a gateway connection is running
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.gateway
            .as_ref()
            .is_some_and(|gateway| !gateway.is_finished())
    }

    /// The bot user reported by READY
    pub async fn user(&self) -> Option<CurrentUser> {
        self.session.read().await.user.clone()
    }

    /// A snapshot of the gateway session
    pub async fn session(&self) -> GatewaySession {
        self.session.read().await.clone()
    }

    /// Updates the bot's presence
    ///
    /// While the worker is reconnecting the update is queued and sent once
    /// the connection is back.
    ///
    /// # Arguments
    /// * `status` - `online`, `dnd`, `idle`, `invisible` or `offline`
    pub async fn update_presence(&self, status: &str) -> Result<(), AppError> {
        if !PRESENCE_STATUSES.contains(&status) {
            return Err(AppError::InvalidInput(format!(
                "unknown presence status: {status}"
            )));
        }
        let gateway = self.gateway.as_ref().ok_or(AppError::NotLoggedIn)?;
        let payload = GatewayPayload::new(Opcode::PresenceUpdate, PresenceUpdate::status(status))?;
        gateway.send(payload).await
    }

    /// Closes the gateway connection and forgets the token
    ///
    /// Does nothing when not logged in.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.events = None;
        self.http_client.clear_token().await;
        match self.gateway.take() {
            Some(mut gateway) => {
                info!("Shutting down the gateway connection");
                gateway.shutdown().await
            }
            None => Ok(()),
        }
    }

    /// The REST client, for endpoints without a dedicated method
    #[must_use]
    pub fn http(&self) -> Arc<HttpClient> {
        self.http_client.clone()
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api", &self.config.rest_api.base_url)
            .field("intents", &self.config.gateway.intents)
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Client {{ api: {}, logged_in: {} }}",
            self.config.rest_api.base_url,
            self.is_logged_in()
        )
    }
}

#[async_trait]
impl UserService for Client {
    async fn get_current_user(&self) -> Result<CurrentUser, AppError> {
        let user: CurrentUser = self.http_client.get("users/@me").await?;
        debug!("Current user: {}", user.username);
        Ok(user)
    }

    async fn get_gateway_bot(&self) -> Result<GatewayBot, AppError> {
        let gateway: GatewayBot = self.http_client.get("gateway/bot").await?;
        info!(
            "Gateway {} recommends {} shard(s), {} session starts left",
            gateway.url, gateway.shards, gateway.session_start_limit.remaining
        );
        Ok(gateway)
    }
}

#[async_trait]
impl ChannelService for Client {
    async fn get_channel(&self, channel_id: Snowflake) -> Result<Channel, AppError> {
        let path = format!("channels/{channel_id}");
        self.http_client.get(&path).await
    }

    async fn create_message(
        &self,
        channel_id: Snowflake,
        message: &CreateMessage,
    ) -> Result<Message, AppError> {
        let length = message.content.as_deref().map_or(0, |c| c.chars().count());
        if length == 0 || length > CreateMessage::MAX_CONTENT_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "message content must be 1 to {} characters, got {length}",
                CreateMessage::MAX_CONTENT_LENGTH
            )));
        }
        let path = format!("channels/{channel_id}/messages");
        info!("Sending message to channel {}", channel_id);
        self.http_client.post(&path, message).await
    }

    async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<Message, AppError> {
        let path = format!("channels/{channel_id}/messages/{message_id}");
        self.http_client.get(&path).await
    }
}
