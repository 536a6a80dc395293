// ── Remote snapshot types ──
//
// Read-side views of NetBox and Oxidized objects, trimmed to what the
// reconciler compares. Built from the wire types in `crate::convert`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A config-archive node eligible for synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveNode {
    /// Hostname; matched exactly against NetBox device names.
    pub name: String,
    /// Identifier used to fetch the configuration text.
    pub fetch_name: String,
    /// Archive model label, e.g. `FortiOS`.
    pub model: String,
}

/// A NetBox device in one of the configured roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: u64,
    pub name: String,
    pub site_id: u64,
    pub tenant_id: Option<u64>,
}

/// Reference to another interface on the same device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub id: u64,
    pub name: String,
}

/// NetBox 802.1Q mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VlanMode {
    Access,
    Tagged,
    TaggedAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntaggedVlan {
    pub id: u64,
    pub vid: u16,
}

/// Snapshot of one NetBox interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteInterface {
    pub id: u64,
    pub name: String,
    /// NetBox interface type value (`1000base-t`, `lag`, `virtual`, ...).
    pub kind: String,
    pub enabled: bool,
    pub description: String,
    pub parent: Option<LinkRef>,
    pub lag: Option<LinkRef>,
    pub bridge: Option<LinkRef>,
    pub mode: Option<VlanMode>,
    pub untagged_vlan: Option<UntaggedVlan>,
    pub tags: Vec<u64>,
}

impl RemoteInterface {
    /// A bare interface of the given type with NetBox defaults.
    pub fn new(id: u64, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            enabled: true,
            description: String::new(),
            parent: None,
            lag: None,
            bridge: None,
            mode: None,
            untagged_vlan: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanRecord {
    pub id: u64,
    pub vid: u16,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: u64,
    pub name: String,
}
