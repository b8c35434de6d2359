/// Channel models
pub mod channel;
/// Gateway discovery models
pub mod gateway;
/// Guild models
pub mod guild;
/// Message models
pub mod message;
/// User models
pub mod user;
