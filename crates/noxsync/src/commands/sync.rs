//! `noxsync sync`: one full reconciliation pass.

use tabled::Tabled;

use noxsync_core::{DeviceOutcome, DeviceReport, SyncReport};

use crate::cli::{GlobalOpts, OutputFormat, SyncArgs};
use crate::error::CliError;
use crate::output::{self, Tone, paint};

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Parsed")]
    parsed: String,
    #[tabled(rename = "VLANs")]
    vlans: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Failed")]
    failed: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn device_row(report: &DeviceReport, color: bool) -> DeviceRow {
    match &report.outcome {
        DeviceOutcome::Synced(summary) => {
            let applied = &summary.applied;
            let tone = if applied.is_clean() { Tone::Good } else { Tone::Bad };
            DeviceRow {
                node: report.node.clone(),
                status: paint("synced", tone, color),
                parsed: summary.parsed.to_string(),
                vlans: summary.vlans_created.to_string(),
                created: applied.created.to_string(),
                updated: applied.updated.to_string(),
                failed: applied.failed.to_string(),
                detail: if applied.skipped > 0 {
                    format!("{} write(s) skipped", applied.skipped)
                } else {
                    String::new()
                },
            }
        }
        DeviceOutcome::NotInInventory => DeviceRow {
            node: report.node.clone(),
            status: paint("skipped", Tone::Neutral, color),
            parsed: String::new(),
            vlans: String::new(),
            created: String::new(),
            updated: String::new(),
            failed: String::new(),
            detail: "not in NetBox".into(),
        },
        DeviceOutcome::UnsupportedModel { model } => DeviceRow {
            node: report.node.clone(),
            status: paint("skipped", Tone::Neutral, color),
            parsed: String::new(),
            vlans: String::new(),
            created: String::new(),
            updated: String::new(),
            failed: String::new(),
            detail: format!("unsupported model {model}"),
        },
        DeviceOutcome::Failed { reason } => DeviceRow {
            node: report.node.clone(),
            status: paint("failed", Tone::Bad, color),
            parsed: String::new(),
            vlans: String::new(),
            created: String::new(),
            updated: String::new(),
            failed: String::new(),
            detail: reason.clone(),
        },
    }
}

fn footer(report: &SyncReport) -> String {
    format!(
        "{} synced, {} skipped, {} failed",
        report.synced(),
        report.skipped(),
        report.failed()
    )
}

pub async fn handle(args: &SyncArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = noxsync_config::load_config(global.config.as_deref())?;
    if args.dry_run {
        config.sync.dry_run = true;
    }
    if let Some(workers) = args.workers {
        config.sync.workers = workers;
    }
    if let Some(timeout) = args.timeout {
        config.sync.timeout = timeout;
    }
    if let Some(tag) = &args.managed_tag {
        config.sync.managed_tag = Some(tag.clone());
    }

    let sync_config = noxsync_config::to_sync_config(&config)?;
    tracing::debug!(
        workers = sync_config.workers,
        dry_run = sync_config.dry_run,
        "configuration resolved"
    );

    let mut report = noxsync_core::run(&sync_config).await?;
    report.devices.sort_by(|a, b| a.node.cmp(&b.node));

    let color = output::should_color(&global.color);
    let mut out = output::render_list(
        &global.output,
        &report.devices,
        |d| device_row(d, color),
        |d| d.node.clone(),
    )?;
    if matches!(global.output, OutputFormat::Table) {
        out.push('\n');
        out.push_str(&footer(&report));
    }
    output::print_output(&out, global.quiet);

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::SyncIncomplete {
            failed: report.failed(),
            failed_writes: report.failed_writes(),
        })
    }
}
