//! Folder command handlers.

use stconf_api::ConfigClient;
use stconf_core::{Desired, DesiredFolder, FolderRecord, Record};
use tabled::Tabled;

use super::Request;
use crate::cli::{FolderApplyArgs, FolderArgs, FolderCommand};
use crate::error::CliError;
use crate::output::{self, RenderOpts};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FolderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Paused")]
    paused: bool,
    #[tabled(rename = "Shared With")]
    devices: String,
}

impl From<&FolderRecord> for FolderRow {
    fn from(f: &FolderRecord) -> Self {
        Self {
            id: f.id.clone(),
            label: f.label().unwrap_or_default().to_owned(),
            path: f.path().unwrap_or_default().to_owned(),
            paused: f.is_paused(),
            devices: f.shared_with().join(", "),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

/// Turn parsed args into a request, validating apply args up front.
pub fn prepare(args: FolderArgs) -> Result<Request, CliError> {
    match args.command {
        FolderCommand::Apply(apply) => prepare_apply(apply),
        FolderCommand::List => Ok(Request::ListFolders),
    }
}

fn prepare_apply(args: FolderApplyArgs) -> Result<Request, CliError> {
    let desired = DesiredFolder::new(args.id, args.path, args.state.into())?
        .with_label(args.label)
        .with_devices(args.devices);
    Ok(Request::Apply {
        desired: Desired::from(desired),
        dry_run: args.dry_run,
    })
}

pub async fn list(client: &ConfigClient, render: &RenderOpts) -> Result<(), CliError> {
    let document = stconf_core::snapshot(client).await?;
    let out = output::render_list::<_, FolderRow>(
        &render.format,
        &document.folders,
        |f| f.id.clone(),
    )?;
    output::print_output(&out, render.quiet);
    Ok(())
}
