/// Channel and message endpoints
pub mod channel;
/// Current user and gateway endpoints
pub mod user;

pub use channel::ChannelService;
pub use user::UserService;
