use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ConfigDocument, EntityKind, PAUSED, Record};

/// One entry of the document's `folders` array.
///
/// Like [`DeviceRecord`](super::DeviceRecord), everything but the identity
/// is kept verbatim in `fields`, including the `devices` share list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl FolderRecord {
    pub fn label(&self) -> Option<&str> {
        self.fields.get("label").and_then(Value::as_str)
    }

    pub fn path(&self) -> Option<&str> {
        self.fields.get("path").and_then(Value::as_str)
    }

    /// Device IDs of the folder's share entries, in document order.
    pub fn shared_with(&self) -> Vec<&str> {
        self.fields
            .get("devices")
            .and_then(Value::as_array)
            .map(|shares| {
                shares
                    .iter()
                    .filter_map(|share| share.get("deviceID").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Record for FolderRecord {
    const KIND: EntityKind = EntityKind::Folder;

    fn identity(&self) -> &str {
        &self.id
    }

    fn is_paused(&self) -> bool {
        super::paused_flag(&self.fields)
    }

    fn set_paused(&mut self, paused: bool) {
        self.fields.insert(PAUSED.to_owned(), Value::Bool(paused));
    }

    fn collection_mut(document: &mut ConfigDocument) -> &mut Vec<Self> {
        &mut document.folders
    }
}
