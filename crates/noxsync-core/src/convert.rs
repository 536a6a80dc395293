// ── API-to-domain type conversions ──
//
// Bridges raw `noxsync-api` response types into the snapshot types in
// `crate::model`, and implements the `ConfigArchive` / `Inventory` seams
// for the HTTP clients.

use std::str::FromStr;

use noxsync_api::NetboxClient;
use noxsync_api::OxidizedClient;
use noxsync_api::netbox::models::{
    Device, Interface, InterfacePatch, NestedInterface, Tag, Vlan, WritableInterface, WritableVlan,
};
use noxsync_api::oxidized::models::Node;
use tracing::debug;

use crate::error::CoreError;
use crate::inventory::{ConfigArchive, Inventory};
use crate::model::{
    ArchiveNode, DeviceRecord, InterfaceWrite, LinkRef, RemoteInterface, TagRecord, UntaggedVlan,
    VlanMode, VlanRecord, VlanRequest,
};

/// Status given to VLANs created during a sync.
const VLAN_STATUS_ACTIVE: &str = "active";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Read side
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl From<Node> for ArchiveNode {
    fn from(n: Node) -> Self {
        Self {
            fetch_name: n.fetch_name().to_owned(),
            name: n.name,
            model: n.model,
        }
    }
}

impl From<NestedInterface> for LinkRef {
    fn from(n: NestedInterface) -> Self {
        Self {
            id: n.id,
            name: n.name,
        }
    }
}

impl From<Interface> for RemoteInterface {
    fn from(i: Interface) -> Self {
        Self {
            id: i.id,
            name: i.name,
            kind: i.kind.value,
            enabled: i.enabled,
            description: i.description,
            parent: i.parent.map(LinkRef::from),
            lag: i.lag.map(LinkRef::from),
            bridge: i.bridge.map(LinkRef::from),
            // Unknown modes read as "none", which the reconciler corrects.
            mode: i.mode.and_then(|m| VlanMode::from_str(&m.value).ok()),
            untagged_vlan: i
                .untagged_vlan
                .map(|v| UntaggedVlan { id: v.id, vid: v.vid }),
            tags: i.tags.into_iter().map(|t| t.id).collect(),
        }
    }
}

impl From<Vlan> for VlanRecord {
    fn from(v: Vlan) -> Self {
        Self {
            id: v.id,
            vid: v.vid,
            name: v.name,
        }
    }
}

impl From<Tag> for TagRecord {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}

/// Devices without a name cannot be matched to an archive node.
fn device_record(d: Device) -> Option<DeviceRecord> {
    let Some(name) = d.name.filter(|n| !n.is_empty()) else {
        debug!(device_id = d.id, "skipping unnamed device");
        return None;
    };
    Some(DeviceRecord {
        id: d.id,
        name,
        site_id: d.site.id,
        tenant_id: d.tenant.map(|t| t.id),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Write side
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn writable_interface(
    device_id: u64,
    name: &str,
    write: &InterfaceWrite,
) -> Result<WritableInterface, CoreError> {
    let kind = write.port_type.clone().ok_or_else(|| {
        CoreError::Internal(format!("create of {name} carries no interface type"))
    })?;
    Ok(WritableInterface {
        device: device_id,
        name: name.to_owned(),
        kind,
        description: write.description.clone(),
        enabled: write.enabled,
        parent: write.parent,
        lag: write.lag,
        bridge: write.bridge,
        mode: write.mode.map(|m| m.to_string()),
        untagged_vlan: write.untagged_vlan,
        tags: write.tags.clone().unwrap_or_default(),
    })
}

impl From<&InterfaceWrite> for InterfacePatch {
    fn from(w: &InterfaceWrite) -> Self {
        Self {
            kind: w.port_type.clone(),
            description: w.description.clone(),
            enabled: w.enabled,
            parent: w.parent,
            lag: w.lag,
            bridge: w.bridge,
            mode: w.mode.map(|m| m.to_string()),
            untagged_vlan: w.untagged_vlan,
            tags: w.tags.clone(),
        }
    }
}

impl From<&VlanRequest> for WritableVlan {
    fn from(r: &VlanRequest) -> Self {
        Self {
            site: r.site_id,
            vid: r.vid,
            name: r.name.clone(),
            tenant: r.tenant_id,
            status: VLAN_STATUS_ACTIVE.to_owned(),
            tags: r.tags.clone(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Seam implementations
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl ConfigArchive for OxidizedClient {
    async fn list_nodes(&self) -> Result<Vec<ArchiveNode>, CoreError> {
        let nodes = OxidizedClient::list_nodes(self).await?;
        Ok(nodes.into_iter().map(ArchiveNode::from).collect())
    }

    async fn fetch_config(&self, fetch_name: &str) -> Result<String, CoreError> {
        Ok(OxidizedClient::fetch_config(self, fetch_name).await?)
    }
}

impl Inventory for NetboxClient {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, CoreError> {
        let devices = NetboxClient::list_devices(self).await?;
        Ok(devices.into_iter().filter_map(device_record).collect())
    }

    async fn list_interfaces(&self, device_id: u64) -> Result<Vec<RemoteInterface>, CoreError> {
        let interfaces = NetboxClient::list_interfaces(self, device_id).await?;
        Ok(interfaces.into_iter().map(RemoteInterface::from).collect())
    }

    async fn list_vlans(&self, site_id: u64) -> Result<Vec<VlanRecord>, CoreError> {
        let vlans = NetboxClient::list_vlans(self, site_id).await?;
        Ok(vlans.into_iter().map(VlanRecord::from).collect())
    }

    async fn find_tag(&self, name: &str) -> Result<Option<TagRecord>, CoreError> {
        Ok(NetboxClient::find_tag(self, name).await?.map(TagRecord::from))
    }

    async fn get_or_create_tag(&self, name: &str) -> Result<TagRecord, CoreError> {
        Ok(NetboxClient::get_or_create_tag(self, name).await?.into())
    }

    async fn create_interface(
        &self,
        device_id: u64,
        name: &str,
        write: &InterfaceWrite,
    ) -> Result<RemoteInterface, CoreError> {
        let body = writable_interface(device_id, name, write)?;
        Ok(NetboxClient::create_interface(self, &body).await?.into())
    }

    async fn update_interface(
        &self,
        interface_id: u64,
        write: &InterfaceWrite,
    ) -> Result<RemoteInterface, CoreError> {
        let body = InterfacePatch::from(write);
        Ok(NetboxClient::update_interface(self, interface_id, &body)
            .await?
            .into())
    }

    async fn create_vlan(&self, request: &VlanRequest) -> Result<VlanRecord, CoreError> {
        let body = WritableVlan::from(request);
        Ok(NetboxClient::create_vlan(self, &body).await?.into())
    }
}
