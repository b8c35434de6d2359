use crate::error::AppError;
use crate::presentation::gateway::GatewayBot;
use crate::presentation::user::CurrentUser;
use async_trait::async_trait;

/// Interface for the user service
#[async_trait]
pub trait UserService: Send + Sync {
    /// Gets the user the token belongs to (`GET /users/@me`)
    async fn get_current_user(&self) -> Result<CurrentUser, AppError>;

    /// Gets the gateway URL together with the recommended shard count and the
    /// identify budget (`GET /gateway/bot`)
    ///
    /// # Returns
    /// * `Err(AppError::Unauthorized)` - if no valid token is set
    async fn get_gateway_bot(&self) -> Result<GatewayBot, AppError>;
}
