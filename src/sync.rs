mod controller;
mod refresh;

pub use controller::{SaveBlocked, SaveOutcome, SyncController, SyncState};
pub use refresh::RefreshHandle;
