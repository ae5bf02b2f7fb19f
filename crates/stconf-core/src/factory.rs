// ── Entity factory ──
//
// Builds brand-new records. Each kind has one template holding every
// field Syncthing requires on creation; the variable fields (identity,
// name/label, path, paused, shares) are layered on top.

use serde_json::{Map, Value, json};

use crate::model::{DeviceRecord, FolderRecord};

/// Fixed fields of a newly created device.
pub fn device_template() -> Map<String, Value> {
    object(json!({
        "addresses": ["dynamic"],
        "allowedNetworks": [],
        "autoAcceptFolders": false,
        "certName": "",
        "compression": "metadata",
        "ignoredFolders": [],
        "introducedBy": "",
        "introducer": false,
        "maxRecvKbps": 0,
        "maxSendKbps": 0,
        "pendingFolders": [],
        "skipIntroductionRemovals": false
    }))
}

/// Fixed fields of a newly created folder.
pub fn folder_template() -> Map<String, Value> {
    object(json!({
        "autoNormalize": true,
        "copiers": 0,
        "disableSparseFiles": false,
        "disableTempIndexes": false,
        "filesystemType": "basic",
        "fsWatcherDelayS": 10,
        "fsWatcherEnabled": true,
        "hashers": 0,
        "ignoreDelete": false,
        "ignorePerms": false,
        "markerName": ".stfolder",
        "maxConflicts": -1,
        "minDiskFree": { "unit": "%", "value": 1 },
        "order": "random",
        "pullerMaxPendingKiB": 0,
        "pullerPauseS": 0,
        "rescanIntervalS": 3600,
        "scanProgressIntervalS": 0,
        "type": "sendreceive",
        "useLargeBlocks": false,
        "versioning": { "params": {}, "type": "" },
        "weakHashThresholdPct": 25
    }))
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn create_device(identity: &str, name: &str, paused: bool) -> DeviceRecord {
    let mut fields = Map::new();
    fields.insert("name".into(), json!(name));
    fields.insert("paused".into(), json!(paused));
    fields.extend(device_template());

    DeviceRecord {
        device_id: identity.to_owned(),
        fields,
    }
}

/// An empty or missing `label` falls back to `identity`.
pub fn create_folder(
    identity: &str,
    label: Option<&str>,
    path: &str,
    paused: bool,
    share_targets: &[String],
) -> FolderRecord {
    let label = label.filter(|l| !l.is_empty()).unwrap_or(identity);
    let shares: Vec<Value> = share_targets
        .iter()
        .map(|device_id| json!({ "deviceID": device_id, "introducedBy": "" }))
        .collect();

    let mut fields = Map::new();
    fields.insert("label".into(), json!(label));
    fields.insert("path".into(), json!(path));
    fields.insert("paused".into(), json!(paused));
    fields.insert("devices".into(), Value::Array(shares));
    fields.extend(folder_template());

    FolderRecord {
        id: identity.to_owned(),
        fields,
    }
}
