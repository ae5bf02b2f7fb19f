// ── Apply ──
//
// One invocation = fetch, reconcile in memory, and at most one replace.
// Dry-run stops right before the replace but still reports the action.

use serde::Serialize;
use tracing::{debug, info};

use crate::desired::{Desired, TargetState};
use crate::error::CoreError;
use crate::gateway::ConfigGateway;
use crate::model::{ConfigDocument, EntityKind};
use crate::reconcile::{Action, reconcile};

/// Whether a changed document is pushed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyMode {
    #[default]
    Commit,
    /// Read-only: fetch and diff, never replace.
    DryRun,
}

/// Result of one [`apply`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub kind: EntityKind,
    pub id: String,
    pub state: TargetState,
    pub action: Action,
    /// `true` when the document was (or, in dry-run, would have been) replaced.
    pub changed: bool,
    pub dry_run: bool,
}

/// Reconcile `desired` against the live document behind `gateway`.
pub async fn apply<G>(
    gateway: &G,
    desired: &Desired,
    mode: ApplyMode,
) -> Result<ApplyReport, CoreError>
where
    G: ConfigGateway + Sync,
{
    let mut document = gateway.fetch().await?;
    debug!(
        devices = document.devices.len(),
        folders = document.folders.len(),
        "fetched configuration"
    );

    let action = reconcile(&mut document, desired);
    let dry_run = mode == ApplyMode::DryRun;

    if action.changed() {
        if dry_run {
            info!(kind = %desired.kind(), id = desired.identity(), %action, "dry run, not replacing configuration");
        } else {
            gateway.replace(&document).await?;
            info!(kind = %desired.kind(), id = desired.identity(), %action, "configuration replaced");
        }
    }

    Ok(ApplyReport {
        kind: desired.kind(),
        id: desired.identity().to_owned(),
        state: desired.target(),
        action,
        changed: action.changed(),
        dry_run,
    })
}

/// Fetch the live document without reconciling anything.
pub async fn snapshot<G>(gateway: &G) -> Result<ConfigDocument, CoreError>
where
    G: ConfigGateway + Sync,
{
    gateway.fetch().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::desired::{DesiredDevice, DesiredFolder};

    /// In-memory gateway recording every replace call.
    struct MemoryGateway {
        document: Mutex<ConfigDocument>,
        replaced: Mutex<Vec<ConfigDocument>>,
        fail_fetch: bool,
    }

    impl MemoryGateway {
        fn new(value: serde_json::Value) -> Self {
            Self {
                document: Mutex::new(serde_json::from_value(value).unwrap()),
                replaced: Mutex::new(Vec::new()),
                fail_fetch: false,
            }
        }

        fn replace_count(&self) -> usize {
            self.replaced.lock().unwrap().len()
        }

        fn current(&self) -> ConfigDocument {
            self.document.lock().unwrap().clone()
        }
    }

    impl ConfigGateway for MemoryGateway {
        async fn fetch(&self) -> Result<ConfigDocument, CoreError> {
            if self.fail_fetch {
                return Err(CoreError::Rejected {
                    method: "GET".into(),
                    url: "memory://config".into(),
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(self.current())
        }

        async fn replace(&self, document: &ConfigDocument) -> Result<(), CoreError> {
            *self.document.lock().unwrap() = document.clone();
            self.replaced.lock().unwrap().push(document.clone());
            Ok(())
        }
    }

    fn present(id: &str, name: &str) -> Desired {
        DesiredDevice::new(id, Some(name.into()), TargetState::Present)
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn change_is_pushed_once() {
        let gateway = MemoryGateway::new(json!({ "devices": [], "folders": [], "version": 37 }));

        let report = apply(&gateway, &present("ABCD", "srv"), ApplyMode::Commit)
            .await
            .unwrap();

        assert!(report.changed);
        assert_eq!(report.action, Action::Created);
        assert_eq!(gateway.replace_count(), 1);
        let current = gateway.current();
        assert_eq!(current.devices[0].device_id, "ABCD");
        assert_eq!(current.extra["version"], json!(37));
    }

    #[tokio::test]
    async fn no_change_means_no_replace() {
        let gateway = MemoryGateway::new(json!({
            "devices": [{ "deviceID": "ABCD", "name": "srv", "paused": false }]
        }));

        let report = apply(&gateway, &present("ABCD", "other"), ApplyMode::Commit)
            .await
            .unwrap();

        assert!(!report.changed);
        assert_eq!(report.action, Action::Unchanged);
        assert_eq!(gateway.replace_count(), 0);
    }

    #[tokio::test]
    async fn second_apply_reports_unchanged() {
        let gateway = MemoryGateway::new(json!({ "folders": [] }));
        let desired: Desired = DesiredFolder::new("box", Some("~/box".into()), TargetState::Present)
            .unwrap()
            .into();

        let first = apply(&gateway, &desired, ApplyMode::Commit).await.unwrap();
        let second = apply(&gateway, &desired, ApplyMode::Commit).await.unwrap();

        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(gateway.replace_count(), 1);
    }

    #[tokio::test]
    async fn dry_run_reports_but_never_replaces() {
        let gateway = MemoryGateway::new(json!({
            "devices": [{ "deviceID": "X", "name": "x", "paused": false }]
        }));
        let desired: Desired = DesiredDevice::new("X", None, TargetState::Absent)
            .unwrap()
            .into();

        let report = apply(&gateway, &desired, ApplyMode::DryRun).await.unwrap();

        assert_eq!(
            report,
            ApplyReport {
                kind: EntityKind::Device,
                id: "X".into(),
                state: TargetState::Absent,
                action: Action::Removed,
                changed: true,
                dry_run: true,
            }
        );
        assert_eq!(gateway.replace_count(), 0);
        assert_eq!(gateway.current().devices.len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_fatal() {
        let mut gateway = MemoryGateway::new(json!({}));
        gateway.fail_fetch = true;

        let err = apply(&gateway, &present("A", "a"), ApplyMode::Commit)
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.response(), Some("boom"));
        assert_eq!(gateway.replace_count(), 0);
    }

    #[test]
    fn report_serializes_lowercase() {
        let report = ApplyReport {
            kind: EntityKind::Folder,
            id: "box".into(),
            state: TargetState::Paused,
            action: Action::Paused,
            changed: true,
            dry_run: false,
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "kind": "folder",
                "id": "box",
                "state": "paused",
                "action": "paused",
                "changed": true,
                "dry_run": false
            })
        );
    }
}
