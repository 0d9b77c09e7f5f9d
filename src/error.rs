use thiserror::Error;

/// Startup failures. Any of these prevents the relay from serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

/// Failures of the single upstream search call. Never retried.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error {status} - {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Everything that can end a stream with an `error` event.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("failed to encode result: {0}")]
    Encode(serde_json::Error),
}

impl RelayError {
    /// Text carried by the `error` event sent to the client.
    pub fn client_message(&self) -> String {
        match self {
            RelayError::Upstream(err @ UpstreamError::Http { .. }) => err.to_string(),
            other => format!("Exception: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_carries_status_and_body() {
        let err = RelayError::from(UpstreamError::Http {
            status: 429,
            body: "rate limited".to_string(),
        });
        assert_eq!(err.client_message(), "HTTP error 429 - rate limited");
    }

    #[test]
    fn test_other_errors_are_generic() {
        let decode = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = RelayError::from(UpstreamError::Decode(decode));
        assert!(err.client_message().starts_with("Exception: invalid response body"));
    }
}
