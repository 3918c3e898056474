//! Limits applied by the router's middleware layers.

use std::time::Duration;

use crate::config::Config;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default request body limit.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Timeout and body-size limits for the HTTP front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpLimits {
    /// Requests still running after this long get a 408.
    pub request_timeout: Duration,
    /// Bodies larger than this get a 413 before decoding.
    pub max_body_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            request_timeout: REQUEST_TIMEOUT,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

impl From<&Config> for HttpLimits {
    fn from(cfg: &Config) -> Self {
        Self {
            request_timeout: cfg.request_timeout(),
            max_body_bytes: cfg.max_body_bytes,
        }
    }
}
