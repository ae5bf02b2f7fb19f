// ── Reconciler ──
//
// One pass over one collection: find the record by identity key, then
// no-op, toggle `paused`, append a new record, or remove it. A matched
// record is never rewritten beyond its pause flag, so out-of-band edits
// (renames, relabels, share changes) survive every run.

use serde::Serialize;
use tracing::debug;

use crate::desired::{Desired, DesiredEntity, TargetState};
use crate::model::{ConfigDocument, Record};

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    /// Not found; a new record was appended.
    Created,
    /// Found running; paused in place.
    Paused,
    /// Found paused; un-paused in place.
    Resumed,
    /// Found; removed from the collection.
    Removed,
    /// Nothing to do.
    Unchanged,
}

impl Action {
    /// Whether the document was mutated and must be pushed back.
    pub fn changed(self) -> bool {
        self != Self::Unchanged
    }
}

/// Reconcile `desired` against `document`, mutating it in place.
pub fn reconcile(document: &mut ConfigDocument, desired: &Desired) -> Action {
    match desired {
        Desired::Device(device) => reconcile_entity(document, device),
        Desired::Folder(folder) => reconcile_entity(document, folder),
    }
}

/// Reconcile one entity kind against its collection in `document`.
pub fn reconcile_entity<D: DesiredEntity>(document: &mut ConfigDocument, desired: &D) -> Action {
    let kind = <D::Record as Record>::KIND;
    let identity = desired.identity();
    let records = <D::Record as Record>::collection_mut(document);
    let found = records.iter().position(|r| r.identity() == identity);

    let action = match (desired.target(), found) {
        (TargetState::Absent, None) => Action::Unchanged,
        (TargetState::Absent, Some(idx)) => {
            // `Vec::remove` shifts, keeping the order of the rest.
            records.remove(idx);
            Action::Removed
        }
        (target, Some(idx)) => {
            let want_paused = target.wants_paused();
            let record = &mut records[idx];
            if record.is_paused() == want_paused {
                Action::Unchanged
            } else {
                record.set_paused(want_paused);
                if want_paused {
                    Action::Paused
                } else {
                    Action::Resumed
                }
            }
        }
        (_, None) => {
            records.push(desired.build());
            Action::Created
        }
    };

    debug!(%kind, identity, %action, "reconciled");
    action
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::desired::{DesiredDevice, DesiredFolder};
    use crate::model::{DeviceRecord, FolderRecord};

    fn doc(value: Value) -> ConfigDocument {
        serde_json::from_value(value).unwrap()
    }

    fn device(id: &str, name: Option<&str>, state: TargetState) -> Desired {
        DesiredDevice::new(id, name.map(str::to_owned), state)
            .unwrap()
            .into()
    }

    fn folder(id: &str, path: Option<&str>, state: TargetState) -> Desired {
        DesiredFolder::new(id, path.map(str::to_owned), state)
            .unwrap()
            .into()
    }

    fn three_devices() -> ConfigDocument {
        doc(json!({
            "version": 37,
            "devices": [
                { "deviceID": "W", "name": "w", "paused": false },
                { "deviceID": "X", "name": "x", "paused": false, "introducer": true },
                { "deviceID": "Y", "name": "y", "paused": true }
            ],
            "folders": [],
            "options": { "urAccepted": -1 }
        }))
    }

    // ── Create ─────────────────────────────────────────────────────

    #[test]
    fn creates_missing_device_with_defaults() {
        let mut document = doc(json!({ "devices": [] }));

        let action = reconcile(
            &mut document,
            &device("ABCD", Some("srv"), TargetState::Present),
        );

        assert_eq!(action, Action::Created);
        assert!(action.changed());
        assert_eq!(
            document.devices,
            vec![crate::factory::create_device("ABCD", "srv", false)]
        );
        assert_eq!(document.devices[0].fields["compression"], json!("metadata"));
    }

    #[test]
    fn creates_missing_folder_paused_and_appends_last() {
        let mut document = doc(json!({
            "folders": [{ "id": "docs", "path": "/docs", "paused": false }]
        }));
        let desired: Desired = DesiredFolder::new("box", Some("~/box".into()), TargetState::Paused)
            .unwrap()
            .with_devices(vec!["AAAA".into()])
            .into();

        let action = reconcile(&mut document, &desired);

        assert_eq!(action, Action::Created);
        let ids: Vec<&str> = document.folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["docs", "box"]);
        let created = serde_json::to_value(&document.folders[1]).unwrap();
        assert_eq!(created["paused"], json!(true));
        assert_eq!(created["label"], json!("box"));
        assert_eq!(
            created["devices"],
            json!([{ "deviceID": "AAAA", "introducedBy": "" }])
        );
    }

    // ── Toggle ─────────────────────────────────────────────────────

    #[test]
    fn present_on_running_device_is_noop() {
        let mut document = three_devices();
        let before = document.clone();

        let action = reconcile(&mut document, &device("X", Some("x"), TargetState::Present));

        assert_eq!(action, Action::Unchanged);
        assert_eq!(document, before);
    }

    #[test]
    fn pausing_touches_only_the_flag() {
        let mut document = three_devices();
        let before = document.clone();

        // A different name must not be reconciled onto the existing record.
        let action = reconcile(
            &mut document,
            &device("X", Some("renamed"), TargetState::Paused),
        );

        assert_eq!(action, Action::Paused);
        let mut expected = before.devices[1].clone();
        expected.set_paused(true);
        assert_eq!(document.devices[1], expected);
        assert_eq!(document.devices[0], before.devices[0]);
        assert_eq!(document.devices[2], before.devices[2]);
    }

    #[test]
    fn present_resumes_paused_folder() {
        let original = json!({
            "folders": [{
                "id": "box",
                "label": "Box",
                "path": "/box",
                "paused": true,
                "type": "receiveonly",
                "devices": [{ "deviceID": "AAAA", "introducedBy": "" }]
            }]
        });
        let mut document = doc(original.clone());

        // Path and label differ from the live record and must be ignored.
        let action = reconcile(&mut document, &folder("box", Some("/other"), TargetState::Present));

        assert_eq!(action, Action::Resumed);
        let mut expected = original["folders"][0].clone();
        expected["paused"] = json!(false);
        assert_eq!(serde_json::to_value(&document.folders[0]).unwrap(), expected);
    }

    #[test]
    fn matches_first_record_with_identity() {
        let mut document = doc(json!({
            "devices": [
                { "deviceID": "D", "paused": true },
                { "deviceID": "D", "paused": true }
            ]
        }));

        reconcile(&mut document, &device("D", Some("d"), TargetState::Present));

        assert!(!document.devices[0].is_paused());
        assert!(document.devices[1].is_paused());
    }

    #[test]
    fn change_leaves_other_records_byte_identical() {
        let original = json!({
            "folders": [{
                "id": "other",
                "path": "/o",
                "paused": false,
                "devices": [{ "deviceID": "A" }],
                "label": null
            }],
            "devices": [
                { "deviceID": "A", "name": null, "paused": true },
                { "deviceID": "B", "addresses": ["dynamic"] }
            ]
        });
        let mut document = doc(original.clone());

        reconcile(&mut document, &folder("box", Some("/box"), TargetState::Present));
        reconcile(&mut document, &device("B", None, TargetState::Paused));

        let after = serde_json::to_value(&document).unwrap();
        assert_eq!(
            serde_json::to_string(&after["folders"][0]).unwrap(),
            serde_json::to_string(&original["folders"][0]).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&after["devices"][0]).unwrap(),
            serde_json::to_string(&original["devices"][0]).unwrap()
        );
        assert_eq!(
            after["devices"][1],
            json!({ "deviceID": "B", "addresses": ["dynamic"], "paused": true })
        );
    }

    #[test]
    fn toggle_keeps_field_position() {
        let mut document = doc(json!({
            "devices": [{ "deviceID": "A", "paused": false, "name": "a" }]
        }));

        reconcile(&mut document, &device("A", None, TargetState::Paused));

        let keys: Vec<&str> = document.devices[0].fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["paused", "name"]);
    }

    // ── Remove ─────────────────────────────────────────────────────

    #[test]
    fn absent_removes_and_keeps_order() {
        let mut document = three_devices();

        let action = reconcile(&mut document, &device("X", None, TargetState::Absent));

        assert_eq!(action, Action::Removed);
        let ids: Vec<&str> = document.devices.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(ids, ["W", "Y"]);
    }

    #[test]
    fn absent_on_missing_identity_is_noop() {
        let mut document = three_devices();
        let before = document.clone();

        let action = reconcile(&mut document, &device("NOPE", None, TargetState::Absent));
        assert_eq!(action, Action::Unchanged);

        let action = reconcile(&mut document, &folder("NOPE", None, TargetState::Absent));
        assert_eq!(action, Action::Unchanged);

        assert_eq!(document, before);
    }

    #[test]
    fn kinds_do_not_cross_match() {
        // A folder whose id equals a device id is not a device.
        let mut document = doc(json!({
            "devices": [],
            "folders": [{ "id": "ABCD", "path": "/x" }]
        }));

        let action = reconcile(&mut document, &device("ABCD", None, TargetState::Absent));

        assert_eq!(action, Action::Unchanged);
        assert_eq!(document.folders.len(), 1);
    }

    // ── Properties ─────────────────────────────────────────────────

    #[test]
    fn second_run_is_idempotent() {
        let cases = [
            device("NEW", Some("n"), TargetState::Present),
            device("X", Some("x"), TargetState::Paused),
            device("Y", Some("y"), TargetState::Present),
            device("W", None, TargetState::Absent),
            folder("box", Some("/box"), TargetState::Paused),
        ];

        for desired in &cases {
            let mut document = three_devices();
            let first = reconcile(&mut document, desired);
            let after_first = document.clone();
            let second = reconcile(&mut document, desired);

            assert!(first.changed(), "{desired:?} should change on first run");
            assert_eq!(second, Action::Unchanged, "{desired:?} not idempotent");
            assert_eq!(document, after_first);
        }
    }

    #[test]
    fn unmanaged_fields_survive_a_change() {
        let mut document = three_devices();
        let extra_before = serde_json::to_string(&document.extra).unwrap();

        reconcile(&mut document, &device("Z", Some("z"), TargetState::Present));
        reconcile(&mut document, &device("W", None, TargetState::Absent));

        assert_eq!(serde_json::to_string(&document.extra).unwrap(), extra_before);
        assert!(document.folders.is_empty());
    }

    #[test]
    fn typed_entry_point_matches_enum_dispatch() {
        let mut a = three_devices();
        let mut b = three_devices();
        let desired = DesiredDevice::new("Y", Some("y".into()), TargetState::Present).unwrap();

        let direct = reconcile_entity(&mut a, &desired);
        let dispatched = reconcile(&mut b, &desired.into());

        assert_eq!(direct, dispatched);
        assert_eq!(a, b);
        assert_eq!(a.position::<DeviceRecord>("Y"), Some(2));
        assert_eq!(a.position::<FolderRecord>("Y"), None);
    }
}
