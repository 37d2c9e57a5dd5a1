//! Edit a game server's map rotation against its remote console.
//!
//! [`ListEditor`] tracks the last saved rotation and the operator's edits;
//! [`SyncController`] loads and saves it through a [`RemoteStore`] and polls
//! the vote-map settings that decide whether edits are allowed.

pub mod config;
pub mod error;
pub mod remote;
pub mod rotation;
pub mod sync;
pub mod votemap;

pub use config::ConsoleConfig;
pub use error::{EditError, SyncError};
pub use remote::{FilesystemRemote, HttpRemote, RemoteLocation, RemoteState, RemoteStore};
pub use rotation::{Item, ListEditor, Sequence};
pub use sync::{RefreshHandle, SaveBlocked, SaveOutcome, SyncController, SyncState};
pub use votemap::VoteMapConfig;
