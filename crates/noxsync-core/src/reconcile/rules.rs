// Static classification tables: NetBox types per kind, physical types per
// FortiOS speed, and create eligibility.

use crate::model::{InterfaceKind, ParsedInterface};

/// NetBox's `description` column limit.
pub const MAX_DESCRIPTION_LEN: usize = 200;

const RESERVED_PORT: &str = "modem";
const RESERVED_PREFIX: &str = "npu";

/// The NetBox type a matched interface of `kind` must carry. Physical
/// ports keep whatever type NetBox has.
pub fn promoted_type(kind: InterfaceKind) -> Option<&'static str> {
    match kind {
        InterfaceKind::Aggregate => Some("lag"),
        InterfaceKind::VirtualSwitch => Some("bridge"),
        InterfaceKind::Vlan => Some("virtual"),
        InterfaceKind::Physical => None,
    }
}

/// The NetBox type to create `iface` with.
pub fn create_type(iface: &ParsedInterface) -> &'static str {
    promoted_type(iface.kind).unwrap_or_else(|| physical_type(iface.speed.as_deref()))
}

/// Why an unmatched interface must not be created, if it must not.
pub fn create_blocker(iface: &ParsedInterface) -> Option<&'static str> {
    match iface.kind {
        InterfaceKind::Physical
            if iface.name == RESERVED_PORT || iface.name.starts_with(RESERVED_PREFIX) =>
        {
            Some("reserved system port")
        }
        InterfaceKind::Aggregate if iface.usable_members().next().is_none() => {
            Some("aggregate has no members")
        }
        _ => None,
    }
}

/// Map a FortiOS speed token (`1000full`, `10000auto`, `100Gfull`, `auto`)
/// to a NetBox physical type.
fn physical_type(speed: Option<&str>) -> &'static str {
    match speed.and_then(speed_mbps) {
        Some(10) => "10base-t",
        Some(100) => "100base-tx",
        Some(10_000) => "10gbase-x-sfpp",
        Some(25_000) => "25gbase-x-sfp28",
        Some(40_000) => "40gbase-x-qsfpp",
        Some(100_000) => "100gbase-x-qsfp28",
        _ => "1000base-t",
    }
}

fn speed_mbps(token: &str) -> Option<u32> {
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    let (digits, unit) = token.split_at(digits_end);
    let value: u32 = digits.parse().ok()?;
    if unit.starts_with(['G', 'g']) {
        value.checked_mul(1000)
    } else {
        Some(value)
    }
}
