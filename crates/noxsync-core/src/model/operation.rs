// ── Pending change types ──
//
// A `PendingOperation` is the reconciler's output for one interface. Only
// fields that differ from the remote snapshot are populated; `None` means
// "leave as is". `InterfaceWrite` is the same change set with parent
// references resolved to ids, ready for the inventory.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::interface::InterfaceKind;
use super::inventory::VlanMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationMode {
    Create,
    Update,
}

/// Which NetBox link field carries the parent reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParentSlot {
    /// Physical member of an aggregate.
    Lag,
    /// Physical member of a virtual switch.
    Bridge,
    /// VLAN sub-interface on its carrier.
    Parent,
}

/// Desired parent of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    pub slot: ParentSlot,
    pub name: String,
    /// `None` while the parent does not exist remotely yet; resolved by the
    /// apply step once an earlier operation has created it.
    pub id: Option<u64>,
}

/// The fields an operation changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceChanges {
    /// NetBox interface type value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_mode: Option<VlanMode>,
    /// NetBox VLAN id (not the 802.1Q tag).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub untagged_vlan: Option<u64>,
    /// Full replacement tag id list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<u64>>,
}

impl InterfaceChanges {
    pub fn is_empty(&self) -> bool {
        self.port_type.is_none()
            && self.description.is_none()
            && self.enabled.is_none()
            && self.parent.is_none()
            && self.vlan_mode.is_none()
            && self.untagged_vlan.is_none()
            && self.tags.is_none()
    }
}

/// A create or update the reconciler wants applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOperation {
    pub mode: OperationMode,
    pub name: String,
    pub device_id: u64,
    /// Remote id; always present for updates, absent for creates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_id: Option<u64>,
    pub kind: InterfaceKind,
    pub changes: InterfaceChanges,
}

impl PendingOperation {
    /// Apply tier: containers first, then anything that attaches to a
    /// parent, then the rest.
    pub fn tier(&self) -> u8 {
        if self.kind.is_container() {
            0
        } else if self.changes.parent.is_some() || self.kind == InterfaceKind::Vlan {
            1
        } else {
            2
        }
    }
}

/// Resolved change set sent to the inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceWrite {
    pub port_type: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub parent: Option<u64>,
    pub lag: Option<u64>,
    pub bridge: Option<u64>,
    pub mode: Option<VlanMode>,
    pub untagged_vlan: Option<u64>,
    pub tags: Option<Vec<u64>>,
}

impl InterfaceWrite {
    /// Copy every change, placing `parent_id` in the slot the link names.
    pub fn from_changes(changes: &InterfaceChanges, parent_id: Option<u64>) -> Self {
        let slot = changes.parent.as_ref().map(|p| p.slot);
        let pick = |want: ParentSlot| parent_id.filter(|_| slot == Some(want));
        Self {
            port_type: changes.port_type.clone(),
            description: changes.description.clone(),
            enabled: changes.enabled,
            parent: pick(ParentSlot::Parent),
            lag: pick(ParentSlot::Lag),
            bridge: pick(ParentSlot::Bridge),
            mode: changes.vlan_mode,
            untagged_vlan: changes.untagged_vlan,
            tags: changes.tags.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A VLAN to create in the device's site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanRequest {
    pub site_id: u64,
    pub tenant_id: Option<u64>,
    pub vid: u16,
    pub name: String,
    pub tags: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(kind: InterfaceKind, parent: Option<ParentLink>) -> PendingOperation {
        PendingOperation {
            mode: OperationMode::Update,
            name: "x".into(),
            device_id: 1,
            interface_id: Some(1),
            kind,
            changes: InterfaceChanges {
                parent,
                ..InterfaceChanges::default()
            },
        }
    }

    #[test]
    fn tiers_put_containers_first() {
        let link = ParentLink {
            slot: ParentSlot::Lag,
            name: "agg1".into(),
            id: None,
        };
        assert_eq!(op(InterfaceKind::Aggregate, None).tier(), 0);
        assert_eq!(op(InterfaceKind::VirtualSwitch, None).tier(), 0);
        assert_eq!(op(InterfaceKind::Physical, Some(link)).tier(), 1);
        assert_eq!(op(InterfaceKind::Vlan, None).tier(), 1);
        assert_eq!(op(InterfaceKind::Physical, None).tier(), 2);
    }

    #[test]
    fn write_places_parent_in_its_slot() {
        let changes = InterfaceChanges {
            parent: Some(ParentLink {
                slot: ParentSlot::Bridge,
                name: "lan".into(),
                id: None,
            }),
            ..InterfaceChanges::default()
        };
        let write = InterfaceWrite::from_changes(&changes, Some(42));
        assert_eq!(write.bridge, Some(42));
        assert_eq!(write.lag, None);
        assert_eq!(write.parent, None);
        assert!(!write.is_empty());
        assert!(InterfaceWrite::from_changes(&changes, None).is_empty());
    }
}
