use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DeviceRecord, FolderRecord, Record};

/// The full remote configuration: managed collections plus every other
/// top-level setting (`version`, `gui`, `options`, `defaults`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub folders: Vec<FolderRecord>,

    #[serde(default)]
    pub devices: Vec<DeviceRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    /// Index of the first record of type `R` with the given identity.
    pub fn position<R: Record>(&mut self, identity: &str) -> Option<usize> {
        R::collection_mut(self)
            .iter()
            .position(|r| r.identity() == identity)
    }
}
