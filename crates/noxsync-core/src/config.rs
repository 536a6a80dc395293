// ── Runtime sync configuration ──
//
// These types describe *where* NetBox and Oxidized live and how a sync
// pass behaves. They carry credential data and tuning, but never touch
// disk. The CLI builds a `SyncConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use noxsync_api::{NetboxClient, OxidizedClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Workers used when the caller does not say otherwise.
pub const DEFAULT_WORKERS: usize = 3;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    #[default]
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Base URL plus transport tuning for one remote system.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl EndpointConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetboxConfig {
    pub endpoint: EndpointConfig,
    pub token: SecretString,
    /// Device role slugs to synchronize. Empty means every device.
    pub roles: Vec<String>,
}

impl NetboxConfig {
    pub fn client(&self) -> Result<NetboxClient, CoreError> {
        let client = NetboxClient::new(
            self.endpoint.url.as_str(),
            &self.token,
            &self.endpoint.transport(),
        )?;
        Ok(client.with_roles(self.roles.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct OxidizedConfig {
    pub endpoint: EndpointConfig,
    pub username: String,
    pub password: SecretString,
}

impl OxidizedConfig {
    pub fn client(&self) -> Result<OxidizedClient, CoreError> {
        Ok(OxidizedClient::new(
            self.endpoint.url.as_str(),
            &self.username,
            &self.password,
            &self.endpoint.transport(),
        )?)
    }
}

/// Everything one sync pass needs.
///
/// Built by the CLI; core never reads config files.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub netbox: NetboxConfig,
    pub oxidized: OxidizedConfig,
    /// Concurrent device workers (at least one is always started).
    pub workers: usize,
    /// Tag applied to every interface the sync creates or touches.
    pub managed_tag: Option<String>,
    /// Plan and log writes without sending them.
    pub dry_run: bool,
}
