// ── Domain model ──
//
// Three families of types: what the FortiOS parser produces (`interface`),
// what NetBox and Oxidized report back (`inventory`), and the change set
// the reconciler hands to the apply step (`operation`).

pub mod interface;
pub mod inventory;
pub mod operation;

pub use interface::{InterfaceKind, InterfaceStatus, ParsedInterface};
pub use inventory::{
    ArchiveNode, DeviceRecord, LinkRef, RemoteInterface, TagRecord, UntaggedVlan, VlanMode,
    VlanRecord,
};
pub use operation::{
    InterfaceChanges, InterfaceWrite, OperationMode, ParentLink, ParentSlot, PendingOperation,
    VlanRequest,
};

/// Unicode case-insensitive string equality.
///
/// Interface names and descriptions are compared this way throughout
/// reconciliation.
pub fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Lowercased key for name-indexed maps, consistent with [`eq_fold`].
pub fn fold_key(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_fold_ignores_case() {
        assert!(eq_fold("Port1", "PORT1"));
        assert!(eq_fold("Uplink ÉCOLE", "uplink école"));
        assert!(!eq_fold("port1", "port10"));
        assert!(eq_fold("", ""));
    }
}
