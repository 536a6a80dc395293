// ── FortiOS configuration parser ──
//
// Backup text → sections → `edit`/`next` blocks → `ParsedInterface`s.
// Parsing never fails: unrecognized or malformed input is skipped, and the
// result is whatever could be recovered.

mod block;
mod builder;
mod section;

pub use block::{Block, tokenize};
pub use builder::{build_interface, compose_description, link_virtual_switches};
pub use section::{INTERFACE_SECTION, VIRTUAL_SWITCH_SECTION, extract_sections};

use tracing::debug;

use crate::model::ParsedInterface;

/// Keys read from `config system interface` entries.
pub const INTERFACE_KEYS: &[&str] = &[
    "vdom",
    "type",
    "alias",
    "description",
    "member",
    "interface",
    "vlanid",
    "speed",
    "status",
];

/// Parse a full FortiOS backup into its interfaces, in document order,
/// with virtual switches appended after the regular interfaces.
pub fn parse_config(text: &str) -> Vec<ParsedInterface> {
    let [interface_lines, switch_lines] =
        extract_sections(text, [INTERFACE_SECTION, VIRTUAL_SWITCH_SECTION]);

    let mut interfaces: Vec<ParsedInterface> = tokenize(&interface_lines, INTERFACE_KEYS)
        .iter()
        .filter_map(build_interface)
        .collect();

    let switches = tokenize(&switch_lines, &[]);
    link_virtual_switches(&mut interfaces, &switches);

    debug!(
        interfaces = interfaces.len(),
        virtual_switches = switches.len(),
        "parsed FortiOS configuration"
    );
    interfaces
}
