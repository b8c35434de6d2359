/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/
use crate::utils::config::get_env_or_none;
use std::time::Duration;

/// Delay used when a 429 response carries no `retry_after`
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Configuration for HTTP request retry behavior on `429 Too Many Requests`
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries on rate limit (None = infinite retries)
    pub max_retry_count: Option<u32>,
    /// Fallback delay in milliseconds when Discord does not say how long to wait
    pub retry_delay_ms: Option<u64>,
}

impl RetryConfig {
    /// Creates a retry configuration from `MAX_RETRY_COUNT` / `RETRY_DELAY_MS`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new retry configuration with infinite retries
    #[must_use]
    pub fn infinite() -> Self {
        Self {
            max_retry_count: None,
            retry_delay_ms: None,
        }
    }

    /// Creates a new retry configuration with a maximum number of retries
    ///
    /// `with_max_retries(0)` fails on the first 429.
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retry_count: Some(max_retries),
            retry_delay_ms: None,
        }
    }

    /// Creates a new retry configuration with both max retries and fallback delay
    #[must_use]
    pub fn with_max_retries_and_delay(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retry_count: Some(max_retries),
            retry_delay_ms: Some(delay_ms),
        }
    }

    /// Whether another attempt is allowed after `retries` retries already made
    #[must_use]
    pub fn allows(&self, retries: u32) -> bool {
        self.max_retry_count.is_none_or(|max| retries < max)
    }

    /// Delay before the next attempt, preferring the server's `retry_after`
    #[must_use]
    pub fn delay(&self, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| {
            Duration::from_millis(self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS))
        })
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        let max_retry_count: Option<u32> = get_env_or_none("MAX_RETRY_COUNT");
        let retry_delay_ms: Option<u64> = get_env_or_none("RETRY_DELAY_MS");

        Self {
            max_retry_count,
            retry_delay_ms,
        }
    }
}
