/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/
/// Events delivered by the gateway
pub mod events;
/// Gateway opcodes, payloads and close codes
pub mod gateway;
/// HTTP request utilities with rate limiting and retry
pub mod http;
/// Retry configuration for HTTP requests
pub mod retry;
