//! Error taxonomy shared by the gateway, the controller, and the cache.
//!
//! Errors are plain data (`Clone + PartialEq`) because they are stored in
//! controller and enrichment state and rendered later, not just propagated.

use thiserror::Error;

/// Failure of a single News Pulse operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PulseError {
    /// The request could not complete (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    ///
    /// `message` is the server-provided `detail` when present, otherwise a
    /// generic label for the endpoint (e.g. `"Search failed"`).
    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A blank query was submitted. Suppressed locally, never shown.
    #[error("query is empty")]
    EmptyInput,
}

impl PulseError {
    /// Returns `true` for errors that should never reach the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, PulseError::EmptyInput)
    }

    /// Short human-readable text for inline display next to an item.
    pub fn user_message(&self) -> String {
        match self {
            PulseError::Network(_) => "Network error, try again".to_string(),
            PulseError::Http { message, .. } => message.clone(),
            PulseError::Decode(_) => "Unexpected response from server".to_string(),
            PulseError::EmptyInput => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_prefers_server_message() {
        let err = PulseError::Http {
            status: 503,
            message: "Gemini quota exceeded".to_string(),
        };
        assert_eq!(err.user_message(), "Gemini quota exceeded");
        assert_eq!(err.to_string(), "Gemini quota exceeded (HTTP 503)");
    }

    #[test]
    fn empty_input_is_silent() {
        assert!(PulseError::EmptyInput.is_silent());
        assert!(!PulseError::Network("refused".into()).is_silent());
        assert!(PulseError::EmptyInput.user_message().is_empty());
    }
}
