// ── Sync runner ──
//
// Fans archive nodes out to a fixed pool of tokio tasks. Each node is
// processed end to end (fetch, parse, plan, apply) by exactly one worker;
// the device list is the only state shared between workers, read-only.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::apply::{ApplyReport, apply};
use crate::config::{DEFAULT_WORKERS, SyncConfig};
use crate::error::CoreError;
use crate::fortios::parse_config;
use crate::inventory::{ConfigArchive, DryRun, Inventory};
use crate::model::{ArchiveNode, DeviceRecord, PendingOperation};
use crate::reconcile::{Reconciler, VlanRegistry};

/// Archive model handled by the FortiOS parser.
pub const SUPPORTED_MODEL: &str = "FortiOS";

/// What a synchronized device went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub device_id: u64,
    /// Interfaces found in the configuration.
    pub parsed: usize,
    pub vlans_created: usize,
    pub operations: Vec<PendingOperation>,
    pub applied: ApplyReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceOutcome {
    Synced(DeviceSummary),
    NotInInventory,
    UnsupportedModel { model: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceReport {
    pub node: String,
    pub outcome: DeviceOutcome,
}

/// Per-node outcomes of one run, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub devices: Vec<DeviceReport>,
}

impl SyncReport {
    pub fn synced(&self) -> usize {
        self.count(|o| matches!(o, DeviceOutcome::Synced(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeviceOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                DeviceOutcome::NotInInventory | DeviceOutcome::UnsupportedModel { .. }
            )
        })
    }

    /// Interface writes that failed across all synced devices.
    pub fn failed_writes(&self) -> usize {
        self.devices
            .iter()
            .filter_map(|d| match &d.outcome {
                DeviceOutcome::Synced(summary) => Some(summary.applied.failed),
                _ => None,
            })
            .sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.failed_writes() == 0
    }

    fn count(&self, pred: impl Fn(&DeviceOutcome) -> bool) -> usize {
        self.devices.iter().filter(|d| pred(&d.outcome)).count()
    }
}

/// Connect to both systems described by `config` and run one pass.
pub async fn run(config: &SyncConfig) -> Result<SyncReport, CoreError> {
    let archive = config.oxidized.client()?;
    let inventory = config.netbox.client()?;

    if config.dry_run {
        info!("dry run: NetBox will not be modified");
        SyncRunner::new(Arc::new(archive), Arc::new(DryRun::new(inventory)))
            .with_workers(config.workers)
            .with_managed_tag(config.managed_tag.clone())
            .run()
            .await
    } else {
        SyncRunner::new(Arc::new(archive), Arc::new(inventory))
            .with_workers(config.workers)
            .with_managed_tag(config.managed_tag.clone())
            .run()
            .await
    }
}

/// Runs one full sync pass.
pub struct SyncRunner<A, I> {
    archive: Arc<A>,
    inventory: Arc<I>,
    workers: usize,
    managed_tag: Option<String>,
}

impl<A, I> SyncRunner<A, I>
where
    A: ConfigArchive + 'static,
    I: Inventory + 'static,
{
    pub fn new(archive: Arc<A>, inventory: Arc<I>) -> Self {
        Self {
            archive,
            inventory,
            workers: DEFAULT_WORKERS,
            managed_tag: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_managed_tag(mut self, tag: Option<String>) -> Self {
        self.managed_tag = tag.filter(|t| !t.is_empty());
        self
    }

    /// List nodes and devices, then drain every node through the pool.
    ///
    /// Only the two initial listings can fail the run; anything that goes
    /// wrong for a single node becomes that node's outcome.
    pub async fn run(&self) -> Result<SyncReport, CoreError> {
        let nodes = self.archive.list_nodes().await?;
        let devices = Arc::new(self.inventory.list_devices().await?);
        info!(
            nodes = nodes.len(),
            devices = devices.len(),
            workers = self.workers,
            "starting sync"
        );

        let (tx, rx) = mpsc::channel(nodes.len().max(1));
        for node in nodes {
            tx.send(node)
                .await
                .map_err(|_| CoreError::Internal("job queue closed early".into()))?;
        }
        drop(tx);

        let rx = Arc::new(Mutex::new(rx));
        let mut handles = Vec::with_capacity(self.workers);
        for worker in 1..=self.workers {
            let job = Worker {
                archive: Arc::clone(&self.archive),
                inventory: Arc::clone(&self.inventory),
                devices: Arc::clone(&devices),
                managed_tag: self.managed_tag.clone(),
            };
            handles.push(tokio::spawn(
                job.drain(Arc::clone(&rx))
                    .instrument(info_span!("worker", worker)),
            ));
        }

        let mut report = SyncReport::default();
        for handle in handles {
            match handle.await {
                Ok(finished) => report.devices.extend(finished),
                // The node in flight and the worker's earlier outcomes are lost.
                Err(e) => error!(error = %e, "sync worker did not finish"),
            }
        }

        info!(
            synced = report.synced(),
            skipped = report.skipped(),
            failed = report.failed(),
            "sync finished"
        );
        Ok(report)
    }
}

struct Worker<A, I> {
    archive: Arc<A>,
    inventory: Arc<I>,
    devices: Arc<Vec<DeviceRecord>>,
    managed_tag: Option<String>,
}

impl<A: ConfigArchive, I: Inventory> Worker<A, I> {
    async fn drain(self, rx: Arc<Mutex<mpsc::Receiver<ArchiveNode>>>) -> Vec<DeviceReport> {
        let mut reports = Vec::new();
        loop {
            let next = rx.lock().await.recv().await;
            let Some(node) = next else { break };
            let outcome = self
                .handle(&node)
                .instrument(info_span!("device", node = %node.name))
                .await;
            reports.push(DeviceReport {
                node: node.name,
                outcome,
            });
        }
        reports
    }

    async fn handle(&self, node: &ArchiveNode) -> DeviceOutcome {
        let Some(device) = self.devices.iter().find(|d| d.name == node.name) else {
            info!("not in NetBox, skipping");
            return DeviceOutcome::NotInInventory;
        };
        if !node.model.eq_ignore_ascii_case(SUPPORTED_MODEL) {
            warn!(model = %node.model, "unsupported model, skipping");
            return DeviceOutcome::UnsupportedModel {
                model: node.model.clone(),
            };
        }

        match self.sync_device(node, device).await {
            Ok(summary) => DeviceOutcome::Synced(summary),
            Err(e) => {
                error!(error = %e, "device sync failed");
                DeviceOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn sync_device(
        &self,
        node: &ArchiveNode,
        device: &DeviceRecord,
    ) -> Result<DeviceSummary, CoreError> {
        let inventory = self.inventory.as_ref();

        let text = self.archive.fetch_config(&node.fetch_name).await?;
        let local = parse_config(&text);
        let remote = inventory.list_interfaces(device.id).await?;
        let vlans = inventory.list_vlans(device.site_id).await?;
        let tag = match &self.managed_tag {
            Some(name) => Some(inventory.get_or_create_tag(name).await?),
            None => None,
        };
        let registry = VlanRegistry::new(device, &vlans);
        debug!(
            local = local.len(),
            remote = remote.len(),
            vlans = registry.len(),
            "snapshots loaded"
        );

        let mut reconciler =
            Reconciler::new(inventory, device, &remote, registry).with_managed_tag(tag.as_ref());
        let operations = reconciler.plan(&local).await?;
        let vlans_created = reconciler.vlans().created();

        let applied = apply(inventory, device, &remote, &operations).await;
        info!(
            planned = operations.len(),
            created = applied.created,
            updated = applied.updated,
            failed = applied.failed,
            "device reconciled"
        );

        Ok(DeviceSummary {
            device_id: device.id,
            parsed: local.len(),
            vlans_created,
            operations,
            applied,
        })
    }
}
