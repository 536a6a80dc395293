// ── Core error types ──
//
// Domain errors from noxsync-core. Consumers never see HTTP status codes
// or JSON parse failures directly; the `From<noxsync_api::Error>` impl
// translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out")]
    Timeout,

    // ── Remote errors ────────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Malformed response: {message}")]
    Encoding { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for failures of the remote systems (as opposed to
    /// local configuration or programming errors).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::AuthenticationFailed { .. }
                | Self::Timeout
                | Self::Api { .. }
                | Self::Encoding { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<noxsync_api::Error> for CoreError {
    fn from(err: noxsync_api::Error) -> Self {
        match err {
            noxsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            noxsync_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            noxsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            noxsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            noxsync_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            noxsync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Encoding { message }
            }
        }
    }
}
