// Shared in-memory fakes for the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use noxsync_core::{
    ArchiveNode, ConfigArchive, CoreError, DeviceRecord, Inventory, InterfaceWrite, LinkRef,
    RemoteInterface, TagRecord, UntaggedVlan, VlanRecord, VlanRequest,
};

pub const FIXTURE: &str = include_str!("../fixtures/fortigate.conf");

pub fn device(id: u64, name: &str) -> DeviceRecord {
    DeviceRecord {
        id,
        name: name.to_owned(),
        site_id: 10,
        tenant_id: Some(20),
    }
}

// ── Inventory ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct State {
    pub devices: Vec<DeviceRecord>,
    pub interfaces: HashMap<u64, Vec<RemoteInterface>>,
    pub vlans: Vec<(u64, VlanRecord)>,
    pub tags: Vec<TagRecord>,
    pub next_id: u64,
    /// Every write, as `"<verb> <name-or-id>"`.
    pub writes: Vec<String>,
    pub created_vlans: Vec<VlanRequest>,
    pub fail_writes_for: HashSet<String>,
    pub fail_interfaces_for: HashSet<u64>,
}

/// NetBox stand-in that applies writes to its own state, so a second
/// plan sees the effect of the first.
#[derive(Default)]
pub struct FakeInventory {
    pub state: Mutex<State>,
}

impl FakeInventory {
    pub fn new(devices: Vec<DeviceRecord>) -> Self {
        let inv = Self::default();
        {
            let mut state = inv.state.lock().unwrap();
            state.devices = devices;
            state.next_id = 1000;
        }
        inv
    }

    pub fn with_interface(self, device_id: u64, iface: RemoteInterface) -> Self {
        self.state
            .lock()
            .unwrap()
            .interfaces
            .entry(device_id)
            .or_default()
            .push(iface);
        self
    }

    pub fn with_vlan(self, site_id: u64, id: u64, vid: u16) -> Self {
        self.state.lock().unwrap().vlans.push((
            site_id,
            VlanRecord {
                id,
                vid,
                name: format!("vlan{vid}"),
            },
        ));
        self
    }

    pub fn interfaces(&self, device_id: u64) -> Vec<RemoteInterface> {
        self.state
            .lock()
            .unwrap()
            .interfaces
            .get(&device_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn interface(&self, device_id: u64, name: &str) -> Option<RemoteInterface> {
        self.interfaces(device_id).into_iter().find(|i| i.name == name)
    }

    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }
}

fn link(all: &[RemoteInterface], id: Option<u64>) -> Option<LinkRef> {
    let id = id?;
    all.iter().find(|i| i.id == id).map(|i| LinkRef {
        id,
        name: i.name.clone(),
    })
}

fn write_into(
    state: &State,
    target: &mut RemoteInterface,
    all: &[RemoteInterface],
    w: &InterfaceWrite,
) {
    if let Some(kind) = &w.port_type {
        target.kind.clone_from(kind);
    }
    if let Some(description) = &w.description {
        target.description.clone_from(description);
    }
    if let Some(enabled) = w.enabled {
        target.enabled = enabled;
    }
    if w.parent.is_some() {
        target.parent = link(all, w.parent);
    }
    if w.lag.is_some() {
        target.lag = link(all, w.lag);
    }
    if w.bridge.is_some() {
        target.bridge = link(all, w.bridge);
    }
    if w.mode.is_some() {
        target.mode = w.mode;
    }
    if let Some(vlan_id) = w.untagged_vlan {
        target.untagged_vlan = state
            .vlans
            .iter()
            .find(|(_, v)| v.id == vlan_id)
            .map(|(_, v)| UntaggedVlan { id: v.id, vid: v.vid });
    }
    if let Some(tags) = &w.tags {
        target.tags.clone_from(tags);
    }
}

fn write_failure(name: &str) -> CoreError {
    CoreError::Api {
        message: format!("rejected write for {name}"),
        status: Some(400),
    }
}

impl Inventory for FakeInventory {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, CoreError> {
        Ok(self.state.lock().unwrap().devices.clone())
    }

    async fn list_interfaces(&self, device_id: u64) -> Result<Vec<RemoteInterface>, CoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_interfaces_for.contains(&device_id) {
            return Err(CoreError::Timeout);
        }
        Ok(state.interfaces.get(&device_id).cloned().unwrap_or_default())
    }

    async fn list_vlans(&self, site_id: u64) -> Result<Vec<VlanRecord>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .vlans
            .iter()
            .filter(|(site, _)| *site == site_id)
            .map(|(_, v)| v.clone())
            .collect())
    }

    async fn find_tag(&self, name: &str) -> Result<Option<TagRecord>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.tags.iter().find(|t| t.name == name).cloned())
    }

    async fn get_or_create_tag(&self, name: &str) -> Result<TagRecord, CoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(tag) = state.tags.iter().find(|t| t.name == name) {
            return Ok(tag.clone());
        }
        state.next_id += 1;
        let tag = TagRecord {
            id: state.next_id,
            name: name.to_owned(),
        };
        state.tags.push(tag.clone());
        state.writes.push(format!("create-tag {name}"));
        Ok(tag)
    }

    async fn create_interface(
        &self,
        device_id: u64,
        name: &str,
        write: &InterfaceWrite,
    ) -> Result<RemoteInterface, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.writes.push(format!("create {name}"));
        if state.fail_writes_for.contains(name) {
            return Err(write_failure(name));
        }
        state.next_id += 1;
        let all = state.interfaces.get(&device_id).cloned().unwrap_or_default();
        let mut created = RemoteInterface::new(state.next_id, name, "");
        write_into(&state, &mut created, &all, write);
        state
            .interfaces
            .entry(device_id)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update_interface(
        &self,
        interface_id: u64,
        write: &InterfaceWrite,
    ) -> Result<RemoteInterface, CoreError> {
        let mut state = self.state.lock().unwrap();
        let (device_id, idx) = state
            .interfaces
            .iter()
            .find_map(|(dev, list)| {
                list.iter()
                    .position(|i| i.id == interface_id)
                    .map(|idx| (*dev, idx))
            })
            .ok_or_else(|| CoreError::Api {
                message: "no such interface".into(),
                status: Some(404),
            })?;
        let all = state.interfaces[&device_id].clone();
        let mut target = all[idx].clone();
        state.writes.push(format!("update {}", target.name));
        if state.fail_writes_for.contains(&target.name) {
            return Err(write_failure(&target.name));
        }
        write_into(&state, &mut target, &all, write);
        state.interfaces.get_mut(&device_id).unwrap()[idx] = target.clone();
        Ok(target)
    }

    async fn create_vlan(&self, request: &VlanRequest) -> Result<VlanRecord, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let vlan = VlanRecord {
            id: state.next_id,
            vid: request.vid,
            name: request.name.clone(),
        };
        state.vlans.push((request.site_id, vlan.clone()));
        state.created_vlans.push(request.clone());
        state.writes.push(format!("create-vlan {}", request.vid));
        Ok(vlan)
    }
}

// ── Archive ──────────────────────────────────────────────────────────

/// Oxidized stand-in serving fixed configuration texts.
#[derive(Default)]
pub struct FakeArchive {
    pub nodes: Vec<ArchiveNode>,
    pub configs: HashMap<String, String>,
    /// Fetch name whose fetch panics, taking its worker down.
    pub panic_on: Option<String>,
}

impl FakeArchive {
    pub fn with_node(mut self, name: &str, model: &str, config: Option<&str>) -> Self {
        let fetch_name = format!("firewalls/{name}");
        if let Some(text) = config {
            self.configs.insert(fetch_name.clone(), text.to_owned());
        }
        self.nodes.push(ArchiveNode {
            name: name.to_owned(),
            fetch_name,
            model: model.to_owned(),
        });
        self
    }
}

impl ConfigArchive for FakeArchive {
    async fn list_nodes(&self) -> Result<Vec<ArchiveNode>, CoreError> {
        Ok(self.nodes.clone())
    }

    async fn fetch_config(&self, fetch_name: &str) -> Result<String, CoreError> {
        if self.panic_on.as_deref() == Some(fetch_name) {
            panic!("archive blew up on {fetch_name}");
        }
        self.configs
            .get(fetch_name)
            .cloned()
            .ok_or_else(|| CoreError::Api {
                message: format!("node {fetch_name} not found"),
                status: Some(404),
            })
    }
}
