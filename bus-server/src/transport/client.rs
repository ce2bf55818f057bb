//! Rate-limited provider HTTP client.
//!
//! Wraps `reqwest` with per-instance call spacing, default headers, and
//! provider authentication.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use serde::Serialize;
use tracing::{debug, trace};

use super::error::TransportError;
use super::throttle::Throttle;

/// Default user agent sent to every provider.
const DEFAULT_USER_AGENT: &str = "BusAggregator/1.0";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one provider's transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// API key, sent as `X-API-Key`
    pub api_key: Option<String>,
    /// Bearer token, sent as `Authorization: Bearer ...`
    pub bearer_token: Option<String>,
    /// User agent header value
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum gap between calls on this transport
    pub min_interval: Duration,
}

impl TransportConfig {
    /// Create a config for the given base URL with no credentials and no
    /// call spacing.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            bearer_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_interval: Duration::ZERO,
        }
    }

    /// Set the base URL (for testing against a local server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Send an `X-API-Key` header.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Send an `Authorization: Bearer` header.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Override the user agent.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the minimum gap between calls.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }
}

/// One outbound call: method, path, query, extra headers, optional JSON body.
#[derive(Debug, Clone)]
pub struct TransportRequest<'a, B: ?Sized = ()> {
    method: Method,
    path: &'a str,
    query: Vec<(&'a str, String)>,
    headers: Vec<(&'a str, String)>,
    body: Option<&'a B>,
}

impl<'a> TransportRequest<'a, ()> {
    /// A GET request without a body.
    pub fn get(path: &'a str) -> Self {
        Self {
            method: Method::GET,
            path,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }
}

impl<'a, B: Serialize + ?Sized> TransportRequest<'a, B> {
    /// A request with a JSON body.
    pub fn with_body(method: Method, path: &'a str, body: &'a B) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// A POST request with a JSON body.
    pub fn post(path: &'a str, body: &'a B) -> Self {
        Self::with_body(Method::POST, path, body)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Add a header, overriding defaults and credentials of the same name.
    pub fn header(mut self, name: &'a str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

/// HTTP client for one provider, spacing calls by a minimum interval.
#[derive(Debug)]
pub struct RateLimitedTransport {
    http: reqwest::Client,
    config: TransportConfig,
    throttle: Throttle,
}

impl RateLimitedTransport {
    /// Create a transport with the given configuration.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            throttle: Throttle::new(config.min_interval),
            config,
        })
    }

    /// Perform one call and return the raw response body.
    ///
    /// Waits out the minimum interval first. Statuses outside 200-299 become
    /// [`TransportError::Protocol`] with the body preserved.
    pub async fn invoke<B: Serialize + ?Sized>(
        &self,
        request: TransportRequest<'_, B>,
    ) -> Result<Vec<u8>, TransportError> {
        // Encode before waiting so a bad request does not consume a slot.
        let headers = self.build_headers(&request.headers)?;
        let body = request
            .body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| TransportError::Encoding(e.to_string()))?;

        let waited = self.throttle.acquire().await;
        if !waited.is_zero() {
            trace!(waited_ms = waited.as_millis() as u64, "throttled provider call");
        }

        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            request.path
        );
        debug!(method = %request.method, url = %url, "sending provider request");

        let mut builder = self.http.request(request.method, &url).headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(TransportError::Protocol {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }

    /// Defaults, then credentials, then caller overrides.
    fn build_headers(&self, overrides: &[(&str, String)]) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, header_value(&self.config.user_agent)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = &self.config.api_key {
            headers.insert(HeaderName::from_static("x-api-key"), header_value(key)?);
        }
        if let Some(token) = &self.config.bearer_token {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        }

        for (name, value) in overrides {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TransportError::Encoding(format!("invalid header name: {name}")))?;
            headers.insert(name, header_value(value)?);
        }

        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value)
        .map_err(|_| TransportError::Encoding("invalid header value".to_string()))
}
