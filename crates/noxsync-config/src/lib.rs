//! Configuration for the `noxsync` binary.
//!
//! TOML file + `NOXSYNC_` environment overlay, credential resolution
//! (env var → keyring → plaintext), and translation to
//! `noxsync_core::SyncConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use noxsync_core::{EndpointConfig, NetboxConfig, OxidizedConfig, SyncConfig, TlsVerification};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Keyring service under which secrets are stored.
pub const KEYRING_SERVICE: &str = "noxsync";
/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "NOXSYNC_";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for {system}")]
    NoCredentials { system: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub netbox: NetboxSection,

    #[serde(default)]
    pub oxidized: OxidizedSection,

    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetboxSection {
    /// NetBox base URL (e.g., "https://netbox.example.com").
    pub url: Option<String>,

    /// API token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// Device role slugs to synchronize. Accepts a list or a
    /// comma-separated string.
    #[serde(default, deserialize_with = "roles")]
    pub roles: Vec<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OxidizedSection {
    /// Oxidized web base URL.
    pub url: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSection {
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Request timeout in seconds, for both systems.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Tag attached to interfaces and VLANs the sync writes.
    pub managed_tag: Option<String>,

    #[serde(default)]
    pub dry_run: bool,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout: default_timeout(),
            managed_tag: None,
            dry_run: false,
        }
    }
}

fn default_workers() -> usize {
    noxsync_core::config::DEFAULT_WORKERS
}
fn default_timeout() -> u64 {
    30
}

fn roles<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Roles {
        List(Vec<String>),
        Csv(String),
    }

    let raw = match Roles::deserialize(deserializer)? {
        Roles::List(list) => list,
        Roles::Csv(csv) => csv.split(',').map(str::to_owned).collect(),
    };
    Ok(raw
        .into_iter()
        .map(|r| r.trim().to_owned())
        .filter(|r| !r.is_empty())
        .collect())
}

impl Config {
    /// Copy with every secret replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.netbox.token.is_some() {
            copy.netbox.token = Some(REDACTED.into());
        }
        if copy.oxidized.password.is_some() {
            copy.oxidized.password = Some(REDACTED.into());
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "noxsync", "noxsync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("noxsync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load defaults, then `path` (or [`config_path`]) if it exists, then
/// `NOXSYNC_*` variables (`NOXSYNC_NETBOX__URL`, `NOXSYNC_SYNC__WORKERS`).
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

fn resolve_secret(
    system: &str,
    env_name: Option<&str>,
    keyring_user: &str,
    plaintext: Option<&str>,
) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(env_name) = env_name {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, keyring_user) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(value) = plaintext {
        return Ok(SecretString::from(value.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        system: system.into(),
    })
}

pub fn resolve_netbox_token(section: &NetboxSection) -> Result<SecretString, ConfigError> {
    resolve_secret(
        "netbox",
        section.token_env.as_deref(),
        "netbox/token",
        section.token.as_deref(),
    )
}

pub fn resolve_oxidized_password(section: &OxidizedSection) -> Result<SecretString, ConfigError> {
    resolve_secret(
        "oxidized",
        section.password_env.as_deref(),
        "oxidized/password",
        section.password.as_deref(),
    )
}

// ── Translation to core config ──────────────────────────────────────

fn endpoint(
    field: &str,
    url: Option<&str>,
    ca_cert: Option<&PathBuf>,
    insecure: Option<bool>,
    timeout: Duration,
) -> Result<EndpointConfig, ConfigError> {
    let raw = url.ok_or_else(|| ConfigError::Validation {
        field: field.into(),
        reason: "not set".into(),
    })?;
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })?;

    let tls = if insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(EndpointConfig { url, tls, timeout })
}

/// Build the core `SyncConfig`, resolving both secrets.
pub fn to_sync_config(config: &Config) -> Result<SyncConfig, ConfigError> {
    let timeout = Duration::from_secs(config.sync.timeout);

    let netbox = NetboxConfig {
        endpoint: endpoint(
            "netbox.url",
            config.netbox.url.as_deref(),
            config.netbox.ca_cert.as_ref(),
            config.netbox.insecure,
            timeout,
        )?,
        token: resolve_netbox_token(&config.netbox)?,
        roles: config.netbox.roles.clone(),
    };

    let username = config
        .oxidized
        .username
        .clone()
        .ok_or_else(|| ConfigError::NoCredentials {
            system: "oxidized".into(),
        })?;
    let oxidized = OxidizedConfig {
        endpoint: endpoint(
            "oxidized.url",
            config.oxidized.url.as_deref(),
            config.oxidized.ca_cert.as_ref(),
            config.oxidized.insecure,
            timeout,
        )?,
        username,
        password: resolve_oxidized_password(&config.oxidized)?,
    };

    if config.sync.workers == 0 {
        return Err(ConfigError::Validation {
            field: "sync.workers".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(SyncConfig {
        netbox,
        oxidized,
        workers: config.sync.workers,
        managed_tag: config.sync.managed_tag.clone().filter(|t| !t.is_empty()),
        dry_run: config.sync.dry_run,
    })
}
