use crate::error::AppError;
use crate::presentation::channel::Channel;
use crate::presentation::message::{CreateMessage, Message};
use crate::utils::snowflake::Snowflake;
use async_trait::async_trait;

/// Interface for the channel service
#[async_trait]
pub trait ChannelService: Send + Sync {
    /// Gets a channel by ID
    async fn get_channel(&self, channel_id: Snowflake) -> Result<Channel, AppError>;

    /// Posts a message to a channel
    ///
    /// # Arguments
    /// * `channel_id` - Target channel
    /// * `message` - Message body; content must be 1 to 2000 characters
    ///
    /// # Returns
    /// * The created message
    /// * `Err(AppError::InvalidInput)` - if the content is empty or too long,
    ///   checked before any request is made
    async fn create_message(
        &self,
        channel_id: Snowflake,
        message: &CreateMessage,
    ) -> Result<Message, AppError>;

    /// Gets a single message
    async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<Message, AppError>;
}
