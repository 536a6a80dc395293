//! Parsing and reconciliation core for `noxsync`.
//!
//! The pipeline for one device, leaves first:
//!
//! - **[`fortios`]**: turns a FortiOS backup configuration into an ordered
//!   list of [`ParsedInterface`]s: section extraction, `edit`/`next` block
//!   tokenizing, per-type model building, and virtual-switch linking.
//!
//! - **[`reconcile`]**: diffs the parsed interfaces against the NetBox
//!   snapshot for the same device and emits the minimal, dependency-ordered
//!   list of [`PendingOperation`]s. VLANs missing from the site are created
//!   lazily through the [`VlanRegistry`].
//!
//! - **[`apply`]**: sends the operations to NetBox in tier order, resolving
//!   parents that were created earlier in the same pass.
//!
//! - **[`sync`]**: the worker pool that runs fetch → parse → reconcile →
//!   apply for every Oxidized node.
//!
//! The remote systems are reached only through the [`ConfigArchive`] and
//! [`Inventory`] traits, implemented for the `noxsync-api` clients in
//! [`convert`].

pub mod apply;
pub mod config;
pub mod convert;
pub mod error;
pub mod fortios;
pub mod inventory;
pub mod model;
pub mod reconcile;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use apply::{ApplyReport, apply};
pub use config::{EndpointConfig, NetboxConfig, OxidizedConfig, SyncConfig, TlsVerification};
pub use error::CoreError;
pub use fortios::parse_config;
pub use inventory::{ConfigArchive, DryRun, Inventory};
pub use reconcile::{Reconciler, VlanRegistry};
pub use sync::{DeviceOutcome, DeviceReport, DeviceSummary, SyncReport, SyncRunner, run};

pub use model::{
    ArchiveNode, DeviceRecord, InterfaceChanges, InterfaceKind, InterfaceStatus, InterfaceWrite,
    LinkRef, OperationMode, ParentLink, ParentSlot, ParsedInterface, PendingOperation,
    RemoteInterface, TagRecord, UntaggedVlan, VlanMode, VlanRecord, VlanRequest,
};
