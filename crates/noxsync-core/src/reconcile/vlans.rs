// Per-device VLAN tag → NetBox VLAN id registry.

use std::collections::HashMap;

use tracing::info;

use crate::error::CoreError;
use crate::inventory::Inventory;
use crate::model::{DeviceRecord, VlanRecord, VlanRequest};

/// VLANs of one device's site, keyed by 802.1Q tag.
///
/// Seeded from `ListVlans(site)` and extended in place as missing VLANs are
/// created, so each tag costs at most one create per pass.
#[derive(Debug, Clone)]
pub struct VlanRegistry {
    site_id: u64,
    tenant_id: Option<u64>,
    tags: Vec<u64>,
    by_vid: HashMap<u16, u64>,
    created: usize,
}

impl VlanRegistry {
    /// When the site holds several VLANs with one tag, the first listed wins.
    pub fn new(device: &DeviceRecord, vlans: &[VlanRecord]) -> Self {
        let mut by_vid = HashMap::with_capacity(vlans.len());
        for vlan in vlans {
            by_vid.entry(vlan.vid).or_insert(vlan.id);
        }
        Self {
            site_id: device.site_id,
            tenant_id: device.tenant_id,
            tags: Vec::new(),
            by_vid,
            created: 0,
        }
    }

    /// Tag ids attached to VLANs this registry creates.
    pub fn set_tags(&mut self, tags: Vec<u64>) {
        self.tags = tags;
    }

    pub fn get(&self, vid: u16) -> Option<u64> {
        self.by_vid.get(&vid).copied()
    }

    /// Distinct tags known, seeded or created.
    pub fn len(&self) -> usize {
        self.by_vid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_vid.is_empty()
    }

    /// VLANs created through this registry so far.
    pub fn created(&self) -> usize {
        self.created
    }

    /// NetBox id for `vid`, creating the VLAN (named `name`) when the site
    /// lacks it.
    pub async fn resolve<I: Inventory>(
        &mut self,
        inventory: &I,
        vid: u16,
        name: &str,
    ) -> Result<u64, CoreError> {
        if let Some(id) = self.get(vid) {
            return Ok(id);
        }

        let request = VlanRequest {
            site_id: self.site_id,
            tenant_id: self.tenant_id,
            vid,
            name: name.to_owned(),
            tags: self.tags.clone(),
        };
        let vlan = inventory.create_vlan(&request).await?;
        info!(site_id = self.site_id, vid, vlan_id = vlan.id, name, "created VLAN");

        self.by_vid.insert(vid, vlan.id);
        self.created += 1;
        Ok(vlan.id)
    }
}
