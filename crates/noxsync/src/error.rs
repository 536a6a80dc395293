//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable process exit code.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use noxsync_config::ConfigError;
use noxsync_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    /// Argument errors; clap exits with this itself.
    #[allow(dead_code)]
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const CONFIG: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(noxsync::connection_failed),
        help(
            "Check that the service is running and reachable: {reason}\n\
             For self-signed certificates set `insecure = true` or `ca_cert` in the config."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(noxsync::timeout),
        help("Increase `sync.timeout` or pass --timeout.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(noxsync::auth_failed),
        help(
            "Verify the NetBox API token and the Oxidized credentials.\n\
             Secrets resolve from the *_env variable, then the `noxsync` keyring entry, then the file."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for {system}")]
    #[diagnostic(
        code(noxsync::no_credentials),
        help(
            "Set the secret in the config file, name an environment variable with \
             `token_env` / `password_env`, or store it in the keyring under service `noxsync`."
        )
    )]
    NoCredentials { system: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(noxsync::api_error))]
    Api { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid configuration value for {field}: {reason}")]
    #[diagnostic(
        code(noxsync::invalid_config),
        help("Edit the file shown by `noxsync config path`, or set NOXSYNC_<SECTION>__<KEY>.")
    )]
    InvalidConfig { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(noxsync::config))]
    Config(Box<ConfigError>),

    // ── Sync result ──────────────────────────────────────────────────
    #[error("Sync finished with {failed} failed device(s) and {failed_writes} failed write(s)")]
    #[diagnostic(
        code(noxsync::sync_incomplete),
        help("Re-run with -v for per-device details.")
    )]
    SyncIncomplete { failed: usize, failed_writes: usize },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("Cannot read {}", path.display())]
    #[diagnostic(code(noxsync::read_input))]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(noxsync::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(noxsync::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::InvalidConfig { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::Api { .. }
            | Self::SyncIncomplete { .. }
            | Self::ReadInput { .. }
            | Self::Render(_)
            | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout => Self::Timeout,
            CoreError::Api { message, status } => Self::Api {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },
            CoreError::Encoding { message } => Self::Api { message },
            CoreError::Config { message } => Self::InvalidConfig {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::InvalidConfig { field, reason },
            ConfigError::NoCredentials { system } => Self::NoCredentials { system },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let conn: CliError = CoreError::ConnectionFailed {
            url: "https://netbox.example.com".into(),
            reason: "refused".into(),
        }
        .into();
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let auth: CliError = CoreError::AuthenticationFailed {
            message: "bad token".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let api: CliError = CoreError::Api {
            message: "boom".into(),
            status: Some(500),
        }
        .into();
        assert_eq!(api.exit_code(), exit_code::GENERAL);
        assert_eq!(api.to_string(), "API error: HTTP 500: boom");
    }

    #[test]
    fn config_errors_map_to_exit_codes() {
        let invalid: CliError = ConfigError::Validation {
            field: "netbox.url".into(),
            reason: "not set".into(),
        }
        .into();
        assert_eq!(invalid.exit_code(), exit_code::CONFIG);

        let creds: CliError = ConfigError::NoCredentials {
            system: "netbox".into(),
        }
        .into();
        assert_eq!(creds.exit_code(), exit_code::AUTH);
    }
}
