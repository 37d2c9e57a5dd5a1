mod filesystem;
mod http;
mod state;
mod traits;

use std::path::PathBuf;

use anyhow::Result;

pub use filesystem::FilesystemRemote;
pub use http::HttpRemote;
pub use state::RemoteState;
pub use traits::RemoteStore;

/// Where the rotation lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteLocation {
    Http(String),
    Filesystem(PathBuf),
}

impl RemoteLocation {
    /// Parse a remote URL.
    ///
    /// - `http://...` / `https://...` selects the console API
    /// - `file::/path/to/dir` or a bare path selects a local state directory
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            anyhow::bail!("Remote URL is empty");
        }

        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(RemoteLocation::Http(url.to_string()));
        }

        let path_str = url.strip_prefix("file::").unwrap_or(url);
        Ok(RemoteLocation::Filesystem(PathBuf::from(path_str)))
    }
}
