//! Device command handlers.

use stconf_api::ConfigClient;
use stconf_core::{Desired, DesiredDevice, DeviceRecord, Record};
use tabled::Tabled;

use super::Request;
use crate::cli::{DeviceApplyArgs, DeviceArgs, DeviceCommand};
use crate::error::CliError;
use crate::output::{self, RenderOpts};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Paused")]
    paused: bool,
    #[tabled(rename = "Addresses")]
    addresses: String,
}

impl From<&DeviceRecord> for DeviceRow {
    fn from(d: &DeviceRecord) -> Self {
        let addresses = d
            .fields
            .get("addresses")
            .and_then(serde_json::Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(serde_json::Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Self {
            id: d.device_id.clone(),
            name: d.name().unwrap_or_default().to_owned(),
            paused: d.is_paused(),
            addresses,
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// Turn parsed args into a request, validating apply args up front.
pub fn prepare(args: DeviceArgs) -> Result<Request, CliError> {
    match args.command {
        DeviceCommand::Apply(apply) => prepare_apply(apply),
        DeviceCommand::List => Ok(Request::ListDevices),
    }
}

fn prepare_apply(args: DeviceApplyArgs) -> Result<Request, CliError> {
    let desired = DesiredDevice::new(args.id, args.name, args.state.into())?;
    Ok(Request::Apply {
        desired: Desired::from(desired),
        dry_run: args.dry_run,
    })
}

pub async fn list(client: &ConfigClient, render: &RenderOpts) -> Result<(), CliError> {
    let document = stconf_core::snapshot(client).await?;
    let out = output::render_list::<_, DeviceRow>(
        &render.format,
        &document.devices,
        |d| d.device_id.clone(),
    )?;
    output::print_output(&out, render.quiet);
    Ok(())
}
