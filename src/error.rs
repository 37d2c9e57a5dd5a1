use std::fmt;

/// Failures surfaced by the sync controller.
///
/// Both kinds are recoverable: the controller keeps its last known-good
/// state (load) or has already reconciled against the remote (save).
#[derive(Debug)]
pub enum SyncError {
    LoadFailed(anyhow::Error),
    SaveFailed(anyhow::Error),
}

impl SyncError {
    /// The underlying transport or backend error
    pub fn source_error(&self) -> &anyhow::Error {
        match self {
            SyncError::LoadFailed(e) | SyncError::SaveFailed(e) => e,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::LoadFailed(e) => write!(f, "Failed to load map rotation: {:#}", e),
            SyncError::SaveFailed(e) => write!(f, "Failed to save map rotation: {:#}", e),
        }
    }
}

impl std::error::Error for SyncError {}

/// Contract violations on list edits. The list is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    IndexOutOfRange { index: usize, len: usize },
    UnknownItem(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for rotation of length {}", index, len)
            }
            EditError::UnknownItem(id) => write!(f, "Unknown map: {}", id),
        }
    }
}

impl std::error::Error for EditError {}
