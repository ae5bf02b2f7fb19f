//! Command dispatch: bridges CLI args -> core apply -> output formatting.
//!
//! Handlers run in two steps. `prepare` validates args into a [`Request`]
//! without any I/O; [`execute`] then runs it against a live client.

pub mod config_cmd;
pub mod device;
pub mod folder;

use stconf_api::ConfigClient;
use stconf_core::{ApplyMode, Desired, TargetState};

use crate::cli::StateArg;
use crate::error::CliError;
use crate::output::{self, RenderOpts};

/// A validated Syncthing-bound command.
#[derive(Debug)]
pub enum Request {
    Apply { desired: Desired, dry_run: bool },
    ListDevices,
    ListFolders,
}

/// Run a prepared request against the instance behind `client`.
pub async fn execute(
    request: Request,
    client: &ConfigClient,
    render: &RenderOpts,
) -> Result<(), CliError> {
    match request {
        Request::Apply { desired, dry_run } => {
            apply_and_report(client, &desired, dry_run, render).await
        }
        Request::ListDevices => device::list(client, render).await,
        Request::ListFolders => folder::list(client, render).await,
    }
}

impl From<StateArg> for TargetState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Present => Self::Present,
            StateArg::Absent => Self::Absent,
            StateArg::Paused => Self::Paused,
        }
    }
}

fn apply_mode(dry_run: bool) -> ApplyMode {
    if dry_run {
        ApplyMode::DryRun
    } else {
        ApplyMode::Commit
    }
}

/// Run one apply and print its report.
async fn apply_and_report(
    client: &ConfigClient,
    desired: &Desired,
    dry_run: bool,
    render: &RenderOpts,
) -> Result<(), CliError> {
    let report = stconf_core::apply(client, desired, apply_mode(dry_run)).await?;
    let out = output::render_report(&render.format, &report, render.color)?;
    output::print_output(&out, render.quiet);
    Ok(())
}
