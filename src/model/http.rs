/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

use crate::application::auth::Token;
use crate::application::config::Config;
use crate::application::rate_limiter::RateLimiter;
use crate::constants::{GATEWAY_QUERY, GATEWAY_URL, MAX_RETRY_AFTER_SECS, USER_AGENT};
use crate::error::AppError;
use crate::model::retry::RetryConfig;
use crate::presentation::gateway::GatewayInfo;
use reqwest::Client as HttpInternalClient;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use url::Url;

/// REST client for the Discord API
///
/// Handles:
/// - the `Authorization: Bot <token>` header once a token is set
/// - the global rate limit for all API requests
/// - retrying `429 Too Many Requests` after the advertised `retry_after`
pub struct HttpClient {
    http_client: HttpInternalClient,
    config: Arc<Config>,
    token: RwLock<Option<Token>>,
    rate_limiter: Arc<RwLock<RateLimiter>>,
    retry_config: RetryConfig,
}

impl HttpClient {
    /// Creates a new client; no request is made and no token is set
    ///
    /// # Returns
    /// * `Err(AppError::Network)` - if the underlying HTTP client cannot be built
    pub fn new(config: Arc<Config>) -> Result<Self, AppError> {
        let http_client = HttpInternalClient::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()?;
        let rate_limiter = Arc::new(RwLock::new(RateLimiter::new(&config.rate_limiter)));

        Ok(Self {
            http_client,
            config,
            token: RwLock::new(None),
            rate_limiter,
            retry_config: RetryConfig::default(),
        })
    }

    /// Replaces the retry policy used for every request
    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Sets the token used for authenticated requests
    pub async fn set_token(&self, token: Token) {
        *self.token.write().await = Some(token);
    }

    /// Removes the token; later requests are sent unauthenticated
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    /// Whether a token is set
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Makes a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.request(Method::GET, path, None::<()>).await
    }

    /// Makes a POST request
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: B,
    ) -> Result<T, AppError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Makes a PATCH request
    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: B,
    ) -> Result<T, AppError> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    /// Makes a DELETE request; Discord answers these with `204 No Content`
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.request_internal(Method::DELETE, path, &None::<()>)
            .await?;
        Ok(())
    }

    /// Makes a request and deserializes the JSON response
    pub async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, AppError> {
        let response = self.request_internal(method, path, &body).await?;
        self.parse_response(response).await
    }

    /// Resolves the gateway URL with `GET /gateway`
    ///
    /// Falls back to [`GATEWAY_URL`] when the response has no `url`. The
    /// returned URL carries the version and encoding query.
    pub async fn get_gateway_url(&self) -> Result<String, AppError> {
        let info: GatewayInfo = self.get("gateway").await?;
        let base = match info.url {
            Some(url) => url,
            None => {
                warn!("Gateway response had no url, using {}", GATEWAY_URL);
                GATEWAY_URL.to_string()
            }
        };
        gateway_url_with_query(&base)
    }

    async fn request_internal<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &Option<B>,
    ) -> Result<Response, AppError> {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            let path = path.trim_start_matches('/');
            format!("{}/{}", self.config.rest_api.base_url, path)
        };

        let authorization = self.token.read().await.as_ref().map(Token::authorization);

        let mut headers = vec![("Accept", "application/json")];
        if body.is_some() {
            headers.push(("Content-Type", "application/json"));
        }
        if let Some(value) = authorization.as_deref() {
            headers.push(("Authorization", value));
        }

        make_http_request(
            &self.http_client,
            self.rate_limiter.clone(),
            method,
            &url,
            headers,
            body,
            self.retry_config.clone(),
        )
        .await
    }

    async fn parse_response<T: DeserializeOwned>(&self, response: Response) -> Result<T, AppError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Failed to parse response body: {e}");
            AppError::Deserialization(e.to_string())
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.rest_api.base_url)
            .field("rate_limiter", &"RateLimiter")
            .finish()
    }
}

/// Appends the version and encoding query to a gateway URL
///
/// ```
/// use discord_rs::model::http::gateway_url_with_query;
/// let url = gateway_url_with_query("wss://gateway.discord.gg").unwrap();
/// assert_eq!(url, "wss://gateway.discord.gg/?v=10&encoding=json");
/// ```
pub fn gateway_url_with_query(base: &str) -> Result<String, AppError> {
    let mut url = Url::parse(base)?;
    match url.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(AppError::InvalidInput(format!(
                "gateway url must be ws:// or wss://, got {other}://"
            )));
        }
    }
    url.set_query(Some(GATEWAY_QUERY));
    Ok(url.to_string())
}

/// Error object returned by Discord on failed requests
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u64>,
    #[serde(default)]
    message: Option<String>,
}

/// Body of a `429 Too Many Requests` response
#[derive(Debug, Deserialize)]
struct RateLimitBody {
    /// Seconds to wait
    retry_after: f64,
    #[serde(default)]
    global: bool,
}

/// Makes an HTTP request with rate limiting and retry on `429`
///
/// # Arguments
///
/// * `client` - The HTTP client to use for the request
/// * `rate_limiter` - Shared rate limiter to control request rate
/// * `method` - HTTP method (GET, POST, PATCH, DELETE, ...)
/// * `url` - Full URL to request
/// * `headers` - Vector of (header_name, header_value) tuples
/// * `body` - Optional request body (will be serialized to JSON)
/// * `retry_config` - How many times a 429 is retried
///
/// # Returns
///
/// * `Ok(Response)` - Successful HTTP response
/// * `Err(AppError)` - `Unauthorized` (401), `Forbidden` (403), `NotFound` (404),
///   `RateLimitExceeded` once retries are exhausted, `Api` for other Discord errors
///
/// # Example
///
/// ```ignore
/// let response = make_http_request(
///     &client,
///     rate_limiter.clone(),
///     Method::GET,
///     "https://discord.com/api/v10/users/@me",
///     vec![("Authorization", "Bot <token>")],
///     &None::<()>,
///     RetryConfig::with_max_retries(3),
/// ).await?;
/// ```
pub async fn make_http_request<B: Serialize>(
    client: &Client,
    rate_limiter: Arc<RwLock<RateLimiter>>,
    method: Method,
    url: &str,
    headers: Vec<(&str, &str)>,
    body: &Option<B>,
    retry_config: RetryConfig,
) -> Result<Response, AppError> {
    let mut retry_count = 0;

    loop {
        {
            let limiter = rate_limiter.read().await;
            limiter.wait().await;
        }

        debug!("{} {}", method, url);

        let mut request = client.request(method.clone(), url);
        for (name, value) in &headers {
            request = request.header(*name, *value);
        }
        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let header_delay = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<f64>().ok());
                let body_text = response.text().await.unwrap_or_default();
                let parsed = serde_json::from_str::<RateLimitBody>(&body_text).ok();
                let global = parsed.as_ref().is_some_and(|b| b.global);
                let retry_after = parsed
                    .map(|b| b.retry_after)
                    .or(header_delay)
                    .and_then(retry_after_delay);

                if !retry_config.allows(retry_count) {
                    error!(
                        "Rate limited on {} after {} retries, giving up",
                        url, retry_count
                    );
                    return Err(AppError::RateLimitExceeded);
                }
                retry_count += 1;

                let delay = retry_config.delay(retry_after);
                warn!(
                    "Rate limited (attempt {}, global: {}). Waiting {} ms before retry...",
                    retry_count,
                    global,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            StatusCode::UNAUTHORIZED => {
                let body_text = response.text().await.unwrap_or_default();
                error!("Unauthorized: {}", body_text);
                return Err(AppError::Unauthorized);
            }
            StatusCode::FORBIDDEN => {
                let body_text = response.text().await.unwrap_or_default();
                error!("Forbidden: {}", body_text);
                return Err(AppError::Forbidden);
            }
            StatusCode::NOT_FOUND => {
                debug!("Not found: {}", url);
                return Err(AppError::NotFound);
            }
            _ => {
                let body_text = response.text().await.unwrap_or_default();
                error!("Request failed with status {}: {}", status, body_text);
                return Err(match serde_json::from_str::<ApiErrorBody>(&body_text) {
                    Ok(ApiErrorBody {
                        code,
                        message: Some(message),
                    }) => AppError::Api {
                        status,
                        code,
                        message,
                    },
                    _ => AppError::Unexpected(status),
                });
            }
        }
    }
}

/// Converts a `retry_after` in seconds, capped at [`MAX_RETRY_AFTER_SECS`]
///
/// Negative or non-finite values give `None`.
fn retry_after_delay(secs: f64) -> Option<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let cap = Duration::from_secs(MAX_RETRY_AFTER_SECS);
    Some(Duration::try_from_secs_f64(secs).map_or(cap, |delay| delay.min(cap)))
}
