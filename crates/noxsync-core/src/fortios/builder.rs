// Block → ParsedInterface.

use tracing::warn;

use super::block::Block;
use crate::model::{InterfaceKind, InterfaceStatus, ParsedInterface};

const VIRTUAL_SWITCH_DESCRIPTION: &str = "virtual-switch";

/// Classify and build one `config system interface` entry.
///
/// Returns `None` for entries that are not modelled: loopbacks (with a
/// warning), unknown types, and untyped entries without a VLAN tag.
pub fn build_interface(block: &Block) -> Option<ParsedInterface> {
    let kind = match block.get("type") {
        "physical" => InterfaceKind::Physical,
        "aggregate" => InterfaceKind::Aggregate,
        "vlan" => InterfaceKind::Vlan,
        "" if !block.get("vlanid").is_empty() => InterfaceKind::Vlan,
        "loopback" => {
            warn!(
                interface = %block.name,
                "loopback interfaces are not synchronized, skipping"
            );
            return None;
        }
        _ => return None,
    };

    let mut iface = ParsedInterface::new(block.name.clone(), kind);
    iface.description = compose_description(
        block.get("vdom"),
        block.get("alias"),
        block.get("description"),
    );
    iface.status = InterfaceStatus::from_fortios(block.get("status"));

    match kind {
        InterfaceKind::Physical => {
            iface.speed = Some(block.get("speed"))
                .filter(|s| !s.is_empty())
                .map(str::to_owned);
        }
        InterfaceKind::Aggregate => {
            iface.members = block
                .get("member")
                .split_whitespace()
                .map(str::to_owned)
                .collect();
        }
        InterfaceKind::Vlan => {
            let alias = block.get("alias");
            if !alias.is_empty() {
                iface.name = alias.to_owned();
            }
            iface.parent = Some(block.get("interface"))
                .filter(|p| !p.is_empty())
                .map(str::to_owned);
            iface.vlan_id = parse_vlan_id(&block.name, block.get("vlanid"));
        }
        InterfaceKind::VirtualSwitch => {}
    }

    Some(iface)
}

/// `vdom: X; alias: Y; desc: Z`, omitting empty parts.
pub fn compose_description(vdom: &str, alias: &str, description: &str) -> String {
    [("vdom", vdom), ("alias", alias), ("desc", description)]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Append one virtual-switch interface per block and point every listed
/// member at it.
pub fn link_virtual_switches(interfaces: &mut Vec<ParsedInterface>, switches: &[Block]) {
    for switch in switches {
        let mut vs = ParsedInterface::new(switch.name.clone(), InterfaceKind::VirtualSwitch);
        vs.members.clone_from(&switch.children);
        vs.description = VIRTUAL_SWITCH_DESCRIPTION.to_owned();
        interfaces.push(vs);
    }

    for switch in switches {
        for iface in interfaces
            .iter_mut()
            .filter(|i| switch.children.contains(&i.name))
        {
            iface.parent = Some(switch.name.clone());
        }
    }
}

fn parse_vlan_id(interface: &str, raw: &str) -> Option<u16> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u16>() {
        Ok(vid) if (1..=4094).contains(&vid) => Some(vid),
        _ => {
            warn!(interface, vlanid = raw, "invalid VLAN id, ignoring");
            None
        }
    }
}
