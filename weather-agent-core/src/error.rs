use reqwest::StatusCode;

/// Failures reported by the HTTP collaborators.
///
/// Messages are kept short enough to show to a user as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned status {status}")]
    HttpStatus { status: StatusCode, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("response is missing field `{0}`")]
    MissingField(&'static str),
}

impl ClientError {
    pub(crate) fn http_status(status: StatusCode, body: &str) -> Self {
        ClientError::HttpStatus {
            status,
            body: truncate_body(body),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let summary = if err.is_timeout() {
            "request timed out"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_decode() {
            return ClientError::Decode("malformed response body".to_string());
        } else {
            "request failed"
        };
        ClientError::Network(summary.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
