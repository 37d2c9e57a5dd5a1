use std::future::Future;

use anyhow::Result;

use crate::{rotation::Sequence, votemap::VoteMapConfig};

/// The authoritative copy of the map rotation.
///
/// Futures are `Send` so the vote-map poller can run on a spawned task.
pub trait RemoteStore: Send + Sync + 'static {
    /// Fetch the current rotation, in order
    fn fetch_rotation(&self) -> impl Future<Output = Result<Sequence>> + Send;

    /// Replace the rotation with the given map ids.
    /// All-or-nothing from the caller's point of view.
    fn push_rotation(&self, ids: Vec<String>) -> impl Future<Output = Result<()>> + Send;

    /// Fetch the vote-map settings; polled in the background
    fn fetch_votemap_config(&self) -> impl Future<Output = Result<VoteMapConfig>> + Send;

    /// Fetch every map the server knows about
    fn fetch_catalog(&self) -> impl Future<Output = Result<Sequence>> + Send;
}
