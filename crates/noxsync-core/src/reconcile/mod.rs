// ── Reconciliation engine ──
//
// One-shot classification of every local interface against the NetBox
// snapshot of the same device: unmatched → create candidate, matched →
// field deltas → update or no-op. Operations come back in apply order.

mod links;
mod rules;
mod vlans;

pub use rules::{MAX_DESCRIPTION_LEN, create_blocker, create_type, promoted_type};
pub use vlans::VlanRegistry;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use self::links::MembershipIndex;
use crate::error::CoreError;
use crate::inventory::Inventory;
use crate::model::{
    DeviceRecord, InterfaceChanges, InterfaceKind, OperationMode, ParentLink, ParentSlot,
    ParsedInterface, PendingOperation, RemoteInterface, TagRecord, VlanMode, eq_fold, fold_key,
};

/// Diffs one device's parsed interfaces against its remote snapshot.
///
/// The only remote calls made while planning are VLAN creations through
/// the [`VlanRegistry`]; everything else is read from the snapshot.
pub struct Reconciler<'a, I> {
    inventory: &'a I,
    device: &'a DeviceRecord,
    remote: &'a [RemoteInterface],
    by_name: HashMap<String, usize>,
    vlans: VlanRegistry,
    managed_tag: Option<u64>,
}

impl<'a, I: Inventory> Reconciler<'a, I> {
    pub fn new(
        inventory: &'a I,
        device: &'a DeviceRecord,
        remote: &'a [RemoteInterface],
        vlans: VlanRegistry,
    ) -> Self {
        let mut by_name = HashMap::with_capacity(remote.len());
        for (idx, iface) in remote.iter().enumerate() {
            by_name.entry(fold_key(&iface.name)).or_insert(idx);
        }
        Self {
            inventory,
            device,
            remote,
            by_name,
            vlans,
            managed_tag: None,
        }
    }

    /// Mark every created or touched interface, and every created VLAN,
    /// with `tag`.
    pub fn with_managed_tag(mut self, tag: Option<&TagRecord>) -> Self {
        self.managed_tag = tag.map(|t| t.id);
        self.vlans.set_tags(self.managed_tag.into_iter().collect());
        self
    }

    pub fn vlans(&self) -> &VlanRegistry {
        &self.vlans
    }

    /// Compute the ordered operation list for `local`.
    ///
    /// Fails only when a VLAN the plan depends on cannot be created.
    pub async fn plan(
        &mut self,
        local: &[ParsedInterface],
    ) -> Result<Vec<PendingOperation>, CoreError> {
        let links = MembershipIndex::build(local);
        let creatable: HashSet<String> = local
            .iter()
            .filter(|i| self.find_remote(&i.name).is_none() && create_blocker(i).is_none())
            .map(|i| fold_key(&i.name))
            .collect();

        let mut operations = Vec::new();
        for iface in local {
            if let Some(op) = self.classify(iface, &links, &creatable).await? {
                operations.push(op);
            }
        }

        operations.sort_by_key(PendingOperation::tier);
        hoist_deferred_parents(&mut operations);
        Ok(operations)
    }

    fn find_remote(&self, name: &str) -> Option<&'a RemoteInterface> {
        let remote = self.remote;
        self.by_name
            .get(&fold_key(name))
            .and_then(|&idx| remote.get(idx))
    }

    async fn classify(
        &mut self,
        iface: &ParsedInterface,
        links: &MembershipIndex<'_>,
        creatable: &HashSet<String>,
    ) -> Result<Option<PendingOperation>, CoreError> {
        let device_record = self.device;
        let device = device_record.name.as_str();
        let parent = links
            .parent_of(iface)
            .and_then(|(slot, name)| self.resolve_parent(iface, slot, name, creatable));

        let Some(remote) = self.find_remote(&iface.name) else {
            if let Some(reason) = create_blocker(iface) {
                debug!(device, interface = %iface.name, reason, "unmatched, not creating");
                return Ok(None);
            }
            let changes = self.create_changes(iface, parent).await?;
            info!(device, interface = %iface.name, kind = %iface.kind, mode = "create", "unmatched");
            return Ok(Some(self.operation(OperationMode::Create, iface, None, changes)));
        };

        let changes = self.update_changes(iface, remote, parent).await?;
        if changes.is_empty() {
            debug!(device, interface = %iface.name, "matched, in sync");
            return Ok(None);
        }
        info!(
            device,
            interface = %iface.name,
            remote_id = remote.id,
            mode = "update",
            ?changes,
            "matched, drifted"
        );
        Ok(Some(self.operation(
            OperationMode::Update,
            iface,
            Some(remote.id),
            changes,
        )))
    }

    fn operation(
        &self,
        mode: OperationMode,
        iface: &ParsedInterface,
        interface_id: Option<u64>,
        changes: InterfaceChanges,
    ) -> PendingOperation {
        PendingOperation {
            mode,
            name: iface.name.clone(),
            device_id: self.device.id,
            interface_id,
            kind: iface.kind,
            changes,
        }
    }

    // ── Delta rules ──────────────────────────────────────────────────

    async fn update_changes(
        &mut self,
        iface: &ParsedInterface,
        remote: &RemoteInterface,
        parent: Option<ParentLink>,
    ) -> Result<InterfaceChanges, CoreError> {
        let mut changes = InterfaceChanges {
            port_type: promoted_type(iface.kind)
                .filter(|t| remote.kind != *t)
                .map(str::to_owned),
            description: self.description_change(iface, Some(&remote.description)),
            enabled: iface
                .status
                .desired_enabled()
                .filter(|&enabled| enabled != remote.enabled),
            parent: parent.filter(|link| !already_linked(remote, link)),
            ..InterfaceChanges::default()
        };

        if let Some(tag) = self.managed_tag {
            if !remote.tags.contains(&tag) {
                let mut tags = remote.tags.clone();
                tags.push(tag);
                changes.tags = Some(tags);
            }
        }

        self.vlan_changes(iface, Some(remote), &mut changes).await?;
        Ok(changes)
    }

    async fn create_changes(
        &mut self,
        iface: &ParsedInterface,
        parent: Option<ParentLink>,
    ) -> Result<InterfaceChanges, CoreError> {
        let mut changes = InterfaceChanges {
            port_type: Some(create_type(iface).to_owned()),
            description: self.description_change(iface, None),
            enabled: iface.status.desired_enabled(),
            parent,
            tags: self.managed_tag.map(|tag| vec![tag]),
            ..InterfaceChanges::default()
        };
        self.vlan_changes(iface, None, &mut changes).await?;
        Ok(changes)
    }

    /// An empty local description never clears the remote one.
    fn description_change(&self, iface: &ParsedInterface, remote: Option<&str>) -> Option<String> {
        let local = iface.description.as_str();
        if local.is_empty() || remote.is_some_and(|r| eq_fold(r, local)) {
            return None;
        }
        if local.chars().count() > MAX_DESCRIPTION_LEN {
            warn!(
                device = %self.device.name,
                interface = %iface.name,
                length = local.chars().count(),
                "description exceeds {MAX_DESCRIPTION_LEN} characters, not writing it"
            );
            return None;
        }
        Some(local.to_owned())
    }

    /// Parent ids come from the snapshot. A parent that is missing remotely
    /// but will be created in this pass is deferred; any other miss drops
    /// the link.
    fn resolve_parent(
        &self,
        iface: &ParsedInterface,
        slot: ParentSlot,
        name: &str,
        creatable: &HashSet<String>,
    ) -> Option<ParentLink> {
        let id = self.find_remote(name).map(|r| r.id);
        if id.is_none() {
            if !creatable.contains(&fold_key(name)) {
                warn!(
                    device = %self.device.name,
                    interface = %iface.name,
                    parent = name,
                    "parent is neither in NetBox nor creatable, leaving unlinked"
                );
                return None;
            }
            debug!(
                device = %self.device.name,
                interface = %iface.name,
                parent = name,
                "parent not in NetBox yet, deferring id"
            );
        }
        Some(ParentLink {
            slot,
            name: name.to_owned(),
            id,
        })
    }

    async fn vlan_changes(
        &mut self,
        iface: &ParsedInterface,
        remote: Option<&RemoteInterface>,
        changes: &mut InterfaceChanges,
    ) -> Result<(), CoreError> {
        if iface.kind != InterfaceKind::Vlan {
            return Ok(());
        }
        let Some(vid) = iface.vlan_id else {
            warn!(
                device = %self.device.name,
                interface = %iface.name,
                "VLAN interface has no usable tag, skipping VLAN assignment"
            );
            return Ok(());
        };

        if remote.and_then(|r| r.mode) != Some(VlanMode::Access) {
            changes.vlan_mode = Some(VlanMode::Access);
        }
        if remote.and_then(|r| r.untagged_vlan).map(|v| v.vid) != Some(vid) {
            let vlan_id = self.vlans.resolve(self.inventory, vid, &iface.name).await?;
            changes.untagged_vlan = Some(vlan_id);
        }
        Ok(())
    }
}

/// Move the create of a deferred parent in front of the first operation
/// that needs it. Tiers alone miss a VLAN whose carrier is a physical port
/// created in the same pass.
fn hoist_deferred_parents(operations: &mut Vec<PendingOperation>) {
    let mut budget = operations.len();
    let mut i = 0;
    while i < operations.len() {
        let pending = operations[i]
            .changes
            .parent
            .as_ref()
            .filter(|link| link.id.is_none())
            .map(|link| link.name.clone());
        let later = pending.and_then(|name| {
            operations
                .iter()
                .skip(i + 1)
                .position(|op| op.mode == OperationMode::Create && eq_fold(&op.name, &name))
                .map(|offset| i + 1 + offset)
        });
        match later {
            Some(j) if budget > 0 => {
                budget -= 1;
                let parent = operations.remove(j);
                operations.insert(i, parent);
            }
            _ => i += 1,
        }
    }
}

fn already_linked(remote: &RemoteInterface, link: &ParentLink) -> bool {
    let current = match link.slot {
        ParentSlot::Lag => remote.lag.as_ref(),
        ParentSlot::Bridge => remote.bridge.as_ref(),
        ParentSlot::Parent => remote.parent.as_ref(),
    };
    current.is_some_and(|c| eq_fold(&c.name, &link.name))
}
