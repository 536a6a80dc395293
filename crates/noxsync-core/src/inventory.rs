// ── Remote system seams ──
//
// The reconciler and sync runner talk to Oxidized and NetBox only through
// these traits. `crate::convert` implements them for the HTTP clients;
// tests implement them in memory.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use crate::error::CoreError;
use crate::model::{
    ArchiveNode, DeviceRecord, InterfaceWrite, RemoteInterface, TagRecord, VlanRecord,
    VlanRequest,
};

/// Source of device backups.
pub trait ConfigArchive: Send + Sync {
    fn list_nodes(&self) -> impl Future<Output = Result<Vec<ArchiveNode>, CoreError>> + Send;

    /// Raw configuration text for a node, by its fetch name.
    fn fetch_config(&self, fetch_name: &str)
    -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// The inventory being reconciled.
pub trait Inventory: Send + Sync {
    /// Devices in the configured roles.
    fn list_devices(&self) -> impl Future<Output = Result<Vec<DeviceRecord>, CoreError>> + Send;

    fn list_interfaces(
        &self,
        device_id: u64,
    ) -> impl Future<Output = Result<Vec<RemoteInterface>, CoreError>> + Send;

    fn list_vlans(
        &self,
        site_id: u64,
    ) -> impl Future<Output = Result<Vec<VlanRecord>, CoreError>> + Send;

    fn find_tag(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<TagRecord>, CoreError>> + Send;

    fn get_or_create_tag(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<TagRecord, CoreError>> + Send;

    /// Create an interface. `write.port_type` must be set.
    fn create_interface(
        &self,
        device_id: u64,
        name: &str,
        write: &InterfaceWrite,
    ) -> impl Future<Output = Result<RemoteInterface, CoreError>> + Send;

    fn update_interface(
        &self,
        interface_id: u64,
        write: &InterfaceWrite,
    ) -> impl Future<Output = Result<RemoteInterface, CoreError>> + Send;

    fn create_vlan(
        &self,
        request: &VlanRequest,
    ) -> impl Future<Output = Result<VlanRecord, CoreError>> + Send;
}

// ── Dry run ──────────────────────────────────────────────────────────

/// Inventory wrapper that reads through to `inner` and logs writes
/// instead of sending them.
///
/// Writes answer with synthetic objects so a whole pass can be planned,
/// including parents that would only exist after an earlier create.
/// Synthetic ids count down from `u64::MAX` and never collide with real
/// ones.
pub struct DryRun<I> {
    inner: I,
    next_id: AtomicU64,
}

impl<I> DryRun<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            next_id: AtomicU64::new(u64::MAX),
        }
    }

    pub fn into_inner(self) -> I {
        self.inner
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_sub(1, Ordering::Relaxed)
    }
}

impl<I: Inventory> Inventory for DryRun<I> {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, CoreError> {
        self.inner.list_devices().await
    }

    async fn list_interfaces(&self, device_id: u64) -> Result<Vec<RemoteInterface>, CoreError> {
        self.inner.list_interfaces(device_id).await
    }

    async fn list_vlans(&self, site_id: u64) -> Result<Vec<VlanRecord>, CoreError> {
        self.inner.list_vlans(site_id).await
    }

    async fn find_tag(&self, name: &str) -> Result<Option<TagRecord>, CoreError> {
        self.inner.find_tag(name).await
    }

    /// An existing tag is returned as is; a missing one is not created.
    async fn get_or_create_tag(&self, name: &str) -> Result<TagRecord, CoreError> {
        if let Some(tag) = self.inner.find_tag(name).await? {
            return Ok(tag);
        }
        info!(tag = name, "dry run: would create tag");
        Ok(TagRecord {
            id: self.allocate_id(),
            name: name.to_owned(),
        })
    }

    async fn create_interface(
        &self,
        device_id: u64,
        name: &str,
        write: &InterfaceWrite,
    ) -> Result<RemoteInterface, CoreError> {
        info!(device_id, interface = name, ?write, "dry run: would create interface");
        let mut created = RemoteInterface::new(
            self.allocate_id(),
            name,
            write.port_type.clone().unwrap_or_default(),
        );
        created.description = write.description.clone().unwrap_or_default();
        created.enabled = write.enabled.unwrap_or(true);
        Ok(created)
    }

    async fn update_interface(
        &self,
        interface_id: u64,
        write: &InterfaceWrite,
    ) -> Result<RemoteInterface, CoreError> {
        info!(interface_id, ?write, "dry run: would update interface");
        Ok(RemoteInterface::new(
            interface_id,
            String::new(),
            write.port_type.clone().unwrap_or_default(),
        ))
    }

    async fn create_vlan(&self, request: &VlanRequest) -> Result<VlanRecord, CoreError> {
        info!(
            site_id = request.site_id,
            vid = request.vid,
            name = %request.name,
            "dry run: would create VLAN"
        );
        Ok(VlanRecord {
            id: self.allocate_id(),
            vid: request.vid,
            name: request.name.clone(),
        })
    }
}
