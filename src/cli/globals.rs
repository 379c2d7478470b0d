use crate::gateway::{GatewayError, HttpGateway};
use std::time::Duration;

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    pub url: String,
    pub timeout: Option<Duration>,
}

impl GlobalArgs {
    /// `timeout_secs == 0` disables the request timeout.
    #[must_use]
    pub fn new(url: String, timeout_secs: u64) -> Self {
        Self {
            url,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        }
    }

    /// # Errors
    /// Returns `GatewayError::Url` for a malformed base URL.
    pub fn gateway(&self) -> Result<HttpGateway, GatewayError> {
        HttpGateway::new(&self.url, self.timeout)
    }
}
