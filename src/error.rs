use thiserror::Error;

/// Errors returned by the remote imagery API client.
///
/// Handlers treat every variant the same way: the cause is logged and the
/// user sees a generic, resource-specific notice.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request could not be sent or the connection failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request exceeded its per-call timeout
    #[error("Request timed out after {seconds}s: {url}")]
    Timeout { url: String, seconds: u64 },

    /// The remote API answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body was not the JSON shape we expected
    #[error("Malformed response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A base URL or path segment could not be turned into a request URL
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Errors detected while validating startup configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// API key is empty after trimming
    #[error("NASA API key is empty. Set --api-key or NASA_API_KEY")]
    EmptyApiKey,

    /// Port 0 cannot be served
    #[error("port must be greater than 0")]
    InvalidPort,

    /// A base URL is not an absolute http(s) URL
    #[error("Invalid {name}: {value} ({reason})")]
    InvalidBaseUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
}
