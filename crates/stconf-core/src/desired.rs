// ── Desired state ──
//
// Caller-declared target for one entity. Constructors perform the boundary
// validation, so a `DesiredDevice` / `DesiredFolder` that exists always has
// what the factory needs to create its record.

use serde::Serialize;

use crate::error::CoreError;
use crate::factory;
use crate::model::{DeviceRecord, EntityKind, FolderRecord, Record};

/// What the caller wants for the entity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetState {
    /// Exists and runs.
    #[default]
    Present,
    /// Does not exist.
    Absent,
    /// Exists and is paused.
    #[strum(to_string = "paused", serialize = "pause")]
    Paused,
}

impl TargetState {
    pub fn wants_paused(self) -> bool {
        self == Self::Paused
    }
}

/// Desired state of one record kind, as seen by the reconciler.
pub trait DesiredEntity {
    type Record: Record;

    fn identity(&self) -> &str;

    fn target(&self) -> TargetState;

    /// Build the record created when the identity is missing.
    fn build(&self) -> Self::Record;
}

fn require(field: &str, value: Option<String>, reason: &str) -> Result<String, CoreError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CoreError::missing(field, reason))
}

// ── Device ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredDevice {
    id: String,
    name: String,
    state: TargetState,
}

impl DesiredDevice {
    /// `name` is required unless `state` is [`TargetState::Absent`].
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        state: TargetState,
    ) -> Result<Self, CoreError> {
        let id = require("id", Some(id.into()), "a device ID is required")?;
        let name = if state == TargetState::Absent {
            name.unwrap_or_default()
        } else {
            require("name", name, "you must provide a name when creating")?
        };
        Ok(Self { id, name, state })
    }
}

impl DesiredEntity for DesiredDevice {
    type Record = DeviceRecord;

    fn identity(&self) -> &str {
        &self.id
    }

    fn target(&self) -> TargetState {
        self.state
    }

    fn build(&self) -> DeviceRecord {
        factory::create_device(&self.id, &self.name, self.state.wants_paused())
    }
}

// ── Folder ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredFolder {
    id: String,
    label: Option<String>,
    path: String,
    devices: Vec<String>,
    state: TargetState,
}

impl DesiredFolder {
    /// `path` is required unless `state` is [`TargetState::Absent`].
    pub fn new(
        id: impl Into<String>,
        path: Option<String>,
        state: TargetState,
    ) -> Result<Self, CoreError> {
        let id = require("id", Some(id.into()), "a folder ID is required")?;
        let path = if state == TargetState::Absent {
            path.unwrap_or_default()
        } else {
            require("path", path, "you must provide a path when creating")?
        };
        Ok(Self {
            id,
            label: None,
            path,
            devices: Vec::new(),
            state,
        })
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Devices the folder is shared with when created.
    pub fn with_devices(mut self, devices: Vec<String>) -> Self {
        self.devices = devices;
        self
    }
}

impl DesiredEntity for DesiredFolder {
    type Record = FolderRecord;

    fn identity(&self) -> &str {
        &self.id
    }

    fn target(&self) -> TargetState {
        self.state
    }

    fn build(&self) -> FolderRecord {
        factory::create_folder(
            &self.id,
            self.label.as_deref(),
            &self.path,
            self.state.wants_paused(),
            &self.devices,
        )
    }
}

// ── Either kind ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Desired {
    Device(DesiredDevice),
    Folder(DesiredFolder),
}

impl Desired {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Device(_) => EntityKind::Device,
            Self::Folder(_) => EntityKind::Folder,
        }
    }

    pub fn identity(&self) -> &str {
        match self {
            Self::Device(d) => d.identity(),
            Self::Folder(f) => f.identity(),
        }
    }

    pub fn target(&self) -> TargetState {
        match self {
            Self::Device(d) => d.target(),
            Self::Folder(f) => f.target(),
        }
    }
}

impl From<DesiredDevice> for Desired {
    fn from(device: DesiredDevice) -> Self {
        Self::Device(device)
    }
}

impl From<DesiredFolder> for Desired {
    fn from(folder: DesiredFolder) -> Self {
        Self::Folder(folder)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn device_name_required_unless_absent() {
        let err = DesiredDevice::new("ABCD", None, TargetState::Present).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "name"));

        let err = DesiredDevice::new("ABCD", Some("  ".into()), TargetState::Paused).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "name"));

        assert!(DesiredDevice::new("ABCD", None, TargetState::Absent).is_ok());
    }

    #[test]
    fn folder_path_required_unless_absent() {
        let err = DesiredFolder::new("box", None, TargetState::Present).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "path"));

        assert!(DesiredFolder::new("box", None, TargetState::Absent).is_ok());
    }

    #[test]
    fn identity_always_required() {
        let err = DesiredDevice::new("", None, TargetState::Absent).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "id"));

        let err = DesiredFolder::new("", Some("/b".into()), TargetState::Present).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "id"));
    }

    #[test]
    fn target_state_parses_pause_alias() {
        assert_eq!("paused".parse::<TargetState>().unwrap(), TargetState::Paused);
        assert_eq!("pause".parse::<TargetState>().unwrap(), TargetState::Paused);
        assert_eq!("absent".parse::<TargetState>().unwrap(), TargetState::Absent);
        assert!("gone".parse::<TargetState>().is_err());
        assert_eq!(TargetState::Paused.to_string(), "paused");
    }

    #[test]
    fn desired_reports_kind_and_identity() {
        let desired: Desired = DesiredFolder::new("box", Some("/b".into()), TargetState::Paused)
            .unwrap()
            .into();
        assert_eq!(desired.kind(), EntityKind::Folder);
        assert_eq!(desired.identity(), "box");
        assert_eq!(desired.target(), TargetState::Paused);
    }
}
