//! `noxsync parse`: run the FortiOS parser over a local file.

use std::io::Read;
use std::path::Path;

use tabled::Tabled;

use noxsync_core::{ParsedInterface, parse_config};

use crate::cli::{GlobalOpts, ParseArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Members")]
    members: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn interface_row(iface: &ParsedInterface) -> InterfaceRow {
    InterfaceRow {
        name: iface.name.clone(),
        kind: iface.kind.to_string(),
        parent: iface.parent.clone().unwrap_or_default(),
        members: iface.members.join(", "),
        vlan: iface.vlan_id.map(|v| v.to_string()).unwrap_or_default(),
        speed: iface.speed.clone().unwrap_or_default(),
        status: iface.status.to_string(),
        description: iface.description.clone(),
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let read = |path: &Path| -> std::io::Result<String> {
        if path == Path::new("-") {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        } else {
            std::fs::read_to_string(path)
        }
    };
    read(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

pub fn handle(args: &ParseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let text = read_input(&args.file)?;
    let interfaces = parse_config(&text);
    tracing::info!(count = interfaces.len(), "parsed interfaces");

    let out = output::render_list(&global.output, &interfaces, interface_row, |i| {
        i.name.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
