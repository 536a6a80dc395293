// ── Parsed FortiOS interface types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Canonical interface classification shared by the parser, the reconciler
/// and the apply step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InterfaceKind {
    Physical,
    Aggregate,
    Vlan,
    VirtualSwitch,
}

impl InterfaceKind {
    /// Kinds that other interfaces attach to as members.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Aggregate | Self::VirtualSwitch)
    }
}

/// Administrative status as written in the device configuration.
///
/// `Unset` means the configuration does not say; it never drives a change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InterfaceStatus {
    Enabled,
    Disabled,
    #[default]
    Unset,
}

impl InterfaceStatus {
    /// Map a FortiOS `set status` value.
    pub fn from_fortios(raw: &str) -> Self {
        match raw {
            "up" => Self::Enabled,
            "down" => Self::Disabled,
            _ => Self::Unset,
        }
    }

    /// The NetBox `enabled` value this status asks for, if any.
    pub fn desired_enabled(self) -> Option<bool> {
        match self {
            Self::Enabled => Some(true),
            Self::Disabled => Some(false),
            Self::Unset => None,
        }
    }
}

/// One interface as described by the device configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInterface {
    pub name: String,
    pub kind: InterfaceKind,
    /// Member port names, in configuration order. Only containers have any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    /// Name of the containing interface (VLAN carrier or virtual switch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(default)]
    pub description: String,
    /// Raw FortiOS speed token (`1000full`, `auto`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default)]
    pub status: InterfaceStatus,
}

impl ParsedInterface {
    pub fn new(name: impl Into<String>, kind: InterfaceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            members: Vec::new(),
            parent: None,
            vlan_id: None,
            description: String::new(),
            speed: None,
            status: InterfaceStatus::Unset,
        }
    }

    /// Members with placeholder and empty tokens removed.
    pub fn usable_members(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .map(String::as_str)
            .filter(|m| !m.is_empty() && *m != "''")
    }
}
