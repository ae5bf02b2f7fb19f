use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ConfigDocument, EntityKind, PAUSED, Record};

/// One entry of the document's `devices` array.
///
/// Only the identity is typed. `name`, `paused`, addresses and any field a
/// newer Syncthing adds stay in `fields` exactly as fetched, so an
/// untouched record serializes back to the same JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "deviceID")]
    pub device_id: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DeviceRecord {
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }
}

impl Record for DeviceRecord {
    const KIND: EntityKind = EntityKind::Device;

    fn identity(&self) -> &str {
        &self.device_id
    }

    fn is_paused(&self) -> bool {
        super::paused_flag(&self.fields)
    }

    fn set_paused(&mut self, paused: bool) {
        self.fields.insert(PAUSED.to_owned(), Value::Bool(paused));
    }

    fn collection_mut(document: &mut ConfigDocument) -> &mut Vec<Self> {
        &mut document.devices
    }
}
