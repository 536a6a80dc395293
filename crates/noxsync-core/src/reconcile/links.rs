// Member → container index, built once per plan.

use std::collections::HashMap;

use crate::model::{InterfaceKind, ParentSlot, ParsedInterface};

pub(super) struct MembershipIndex<'l> {
    container_of: HashMap<&'l str, (&'l str, InterfaceKind)>,
}

impl<'l> MembershipIndex<'l> {
    /// Later containers win, so a virtual switch (appended last by the
    /// parser) overrides an aggregate listing the same port.
    pub(super) fn build(local: &'l [ParsedInterface]) -> Self {
        let mut container_of = HashMap::new();
        for container in local.iter().filter(|i| i.kind.is_container()) {
            for member in container.usable_members() {
                container_of.insert(member, (container.name.as_str(), container.kind));
            }
        }
        Self { container_of }
    }

    /// Desired parent slot and name for `iface`, if it has one.
    pub(super) fn parent_of<'a>(
        &'a self,
        iface: &'a ParsedInterface,
    ) -> Option<(ParentSlot, &'a str)> {
        let membership = self
            .container_of
            .get(iface.name.as_str())
            .and_then(|&(container, kind)| match kind {
                InterfaceKind::VirtualSwitch => Some((ParentSlot::Bridge, container)),
                InterfaceKind::Aggregate if iface.kind == InterfaceKind::Physical => {
                    Some((ParentSlot::Lag, container))
                }
                _ => None,
            });
        if membership.is_some() || iface.kind != InterfaceKind::Vlan {
            return membership;
        }

        iface
            .parent
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| (ParentSlot::Parent, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_members(name: &str, kind: InterfaceKind, members: &[&str]) -> ParsedInterface {
        let mut iface = ParsedInterface::new(name, kind);
        iface.members = members.iter().map(|m| (*m).to_owned()).collect();
        iface
    }

    #[test]
    fn slots_follow_container_kind() {
        let mut vlan = ParsedInterface::new("vl10", InterfaceKind::Vlan);
        vlan.parent = Some("agg1".into());
        let local = vec![
            ParsedInterface::new("port1", InterfaceKind::Physical),
            ParsedInterface::new("port4", InterfaceKind::Physical),
            with_members("agg1", InterfaceKind::Aggregate, &["port1"]),
            vlan,
            with_members("lan", InterfaceKind::VirtualSwitch, &["port4"]),
        ];
        let index = MembershipIndex::build(&local);

        assert_eq!(index.parent_of(&local[0]), Some((ParentSlot::Lag, "agg1")));
        assert_eq!(index.parent_of(&local[1]), Some((ParentSlot::Bridge, "lan")));
        assert_eq!(index.parent_of(&local[2]), None);
        assert_eq!(index.parent_of(&local[3]), Some((ParentSlot::Parent, "agg1")));
    }

    #[test]
    fn virtual_switch_overrides_aggregate() {
        let local = vec![
            ParsedInterface::new("port1", InterfaceKind::Physical),
            with_members("agg1", InterfaceKind::Aggregate, &["port1"]),
            with_members("lan", InterfaceKind::VirtualSwitch, &["port1"]),
        ];
        let index = MembershipIndex::build(&local);
        assert_eq!(index.parent_of(&local[0]), Some((ParentSlot::Bridge, "lan")));
    }
}
