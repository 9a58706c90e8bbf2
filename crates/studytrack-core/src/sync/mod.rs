//! Cloud synchronization: remote store client and reconciliation rules.

pub mod reconciler;
pub mod remote;

pub use reconciler::{SignInOutcome, SyncPhase, SyncSchedule};
pub use remote::{RemoteRecord, RemoteStore, RestRemote};
