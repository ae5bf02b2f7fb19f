// ── Config document model ──
//
// Typed view over the `/rest/system/config` payload. Records type only
// their identity; every other field rides along in a flattened,
// order-preserving `serde_json::Map` so a fetch/replace cycle never
// loses, reorders, injects or normalizes settings it did not change.

mod device;
mod document;
mod folder;

use serde::Serialize;
use serde_json::{Map, Value};

pub use device::DeviceRecord;
pub use document::ConfigDocument;
pub use folder::FolderRecord;

const PAUSED: &str = "paused";

/// The two record types this tool manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Device,
    Folder,
}

/// A record addressable by identity inside a [`ConfigDocument`] collection.
pub trait Record {
    const KIND: EntityKind;

    /// The unique identity key (`deviceID` or folder `id`).
    fn identity(&self) -> &str;

    /// Current pause flag; a record without one is running.
    fn is_paused(&self) -> bool;

    fn set_paused(&mut self, paused: bool);

    /// The collection of this record type within a document.
    fn collection_mut(document: &mut ConfigDocument) -> &mut Vec<Self>
    where
        Self: Sized;
}

/// A missing or non-boolean `paused` reads as running.
fn paused_flag(fields: &Map<String, Value>) -> bool {
    fields.get(PAUSED).and_then(Value::as_bool).unwrap_or(false)
}
