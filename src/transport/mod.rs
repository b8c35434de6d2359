/// Gateway WebSocket worker
pub mod ws;

pub use ws::{GatewayChannels, GatewayConnection, GatewayHandle};
