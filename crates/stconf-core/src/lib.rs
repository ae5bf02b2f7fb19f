//! Reconciliation engine between a declared entity and a live Syncthing
//! configuration.
//!
//! - **[`ConfigDocument`]**: typed view over `/rest/system/config` with
//!   named device/folder collections and order-preserving pass-through of
//!   every unmanaged field.
//! - **[`factory`]**: builds new [`DeviceRecord`] / [`FolderRecord`] values
//!   from one defaults template per kind.
//! - **[`reconcile()`]**: the create / toggle-pause / remove state machine.
//!   A matched record only ever has its `paused` flag changed.
//! - **[`ConfigGateway`]**: fetch/replace contract, implemented for
//!   [`stconf_api::ConfigClient`].
//! - **[`apply()`]**: one full invocation: fetch, reconcile, and at most
//!   one replace (none in [`ApplyMode::DryRun`]).

pub mod apply;
pub mod desired;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod model;
pub mod reconcile;

// ── Primary re-exports ──────────────────────────────────────────────
pub use apply::{ApplyMode, ApplyReport, apply, snapshot};
pub use desired::{Desired, DesiredDevice, DesiredEntity, DesiredFolder, TargetState};
pub use error::CoreError;
pub use gateway::ConfigGateway;
pub use model::{ConfigDocument, DeviceRecord, EntityKind, FolderRecord, Record};
pub use reconcile::{Action, reconcile};
