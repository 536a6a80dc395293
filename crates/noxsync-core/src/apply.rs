// ── Operation apply ──
//
// Sends a planned operation list to the inventory in order. Each
// operation stands alone: a failure is logged and counted, never rolled
// back, and the remaining operations still run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::inventory::Inventory;
use crate::model::{
    DeviceRecord, InterfaceWrite, OperationMode, PendingOperation, RemoteInterface, fold_key,
};

/// Counts from one apply pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub created: usize,
    pub updated: usize,
    /// Updates left with nothing to write once an unresolvable parent was
    /// dropped.
    pub skipped: usize,
    pub failed: usize,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Apply `operations` for `device`, whose interfaces were `remote` when
/// the operations were planned.
///
/// Deferred parent ids are filled in from interfaces created earlier in
/// the same call.
pub async fn apply<I: Inventory>(
    inventory: &I,
    device: &DeviceRecord,
    remote: &[RemoteInterface],
    operations: &[PendingOperation],
) -> ApplyReport {
    let mut ids: HashMap<String, u64> = remote
        .iter()
        .map(|iface| (fold_key(&iface.name), iface.id))
        .collect();
    let mut report = ApplyReport::default();

    for op in operations {
        let parent_id = op.changes.parent.as_ref().and_then(|link| {
            let id = link.id.or_else(|| ids.get(&fold_key(&link.name)).copied());
            if id.is_none() {
                warn!(
                    device = %device.name,
                    interface = %op.name,
                    parent = %link.name,
                    "parent still missing, dropping link"
                );
            }
            id
        });
        let write = InterfaceWrite::from_changes(&op.changes, parent_id);

        match op.mode {
            OperationMode::Create => {
                match inventory.create_interface(device.id, &op.name, &write).await {
                    Ok(created) => {
                        info!(
                            device = %device.name,
                            interface = %op.name,
                            id = created.id,
                            "created interface"
                        );
                        ids.insert(fold_key(&op.name), created.id);
                        report.created += 1;
                    }
                    Err(e) => {
                        error!(
                            device = %device.name,
                            interface = %op.name,
                            error = %e,
                            "failed to create interface"
                        );
                        report.failed += 1;
                    }
                }
            }
            OperationMode::Update => {
                let Some(interface_id) = op.interface_id else {
                    error!(
                        device = %device.name,
                        interface = %op.name,
                        "update without a remote id"
                    );
                    report.failed += 1;
                    continue;
                };
                if write.is_empty() {
                    debug!(device = %device.name, interface = %op.name, "nothing left to update");
                    report.skipped += 1;
                    continue;
                }
                match inventory.update_interface(interface_id, &write).await {
                    Ok(_) => {
                        info!(
                            device = %device.name,
                            interface = %op.name,
                            id = interface_id,
                            "updated interface"
                        );
                        report.updated += 1;
                    }
                    Err(e) => {
                        error!(
                            device = %device.name,
                            interface = %op.name,
                            id = interface_id,
                            error = %e,
                            "failed to update interface"
                        );
                        report.failed += 1;
                    }
                }
            }
        }
    }

    report
}
