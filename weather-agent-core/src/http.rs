use std::time::Duration;

use reqwest::Client;

use crate::error::ClientError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeouts applied to the shared connection pool. Fixed once the client
/// is built.
///
/// `connect_timeout` bounds connection setup and `read_timeout` bounds each
/// read from the socket. reqwest has no separate write bound; request
/// bodies here are empty GETs. `request_timeout` is an optional cap on the
/// whole exchange and is off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub request_timeout: Option<Duration>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            request_timeout: None,
        }
    }
}

impl HttpSettings {
    /// Build the process-wide client. Clone the result into each
    /// collaborator; clones share one pool.
    pub fn build_client(&self) -> Result<Client, ClientError> {
        let mut builder = Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout);
        if let Some(total) = self.request_timeout {
            builder = builder.timeout(total);
        }

        builder.build().map_err(|err| {
            tracing::error!(error = %err, "failed to build HTTP client");
            ClientError::Network("could not initialise HTTP client".to_string())
        })
    }
}
