use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::{fs, sync::Mutex};

use super::{traits::RemoteStore, RemoteState};
use crate::{rotation::Sequence, votemap::VoteMapConfig};

/// Directory-backed remote keeping everything in `state.yaml`
pub struct FilesystemRemote {
    base_path: PathBuf,
    /// Serialises read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FilesystemRemote {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        FilesystemRemote {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create the directory if needed
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)
            .await
            .with_context(|| format!("Failed to create remote directory {:?}", self.base_path))?;
        Ok(())
    }

    fn state_path(&self) -> PathBuf {
        self.base_path.join("state.yaml")
    }

    /// Read the state file, or an empty state if there is none yet
    pub async fn read_state(&self) -> Result<RemoteState> {
        let state_path = self.state_path();
        if !fs::try_exists(&state_path).await.unwrap_or(false) {
            return Ok(RemoteState::default());
        }

        let content = fs::read_to_string(&state_path)
            .await
            .with_context(|| format!("Failed to read {:?}", state_path))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {:?}", state_path))
    }

    /// Atomically replace the state file
    pub async fn write_state(&self, state: &RemoteState) -> Result<()> {
        let state_path = self.state_path();
        let temp_path = self.base_path.join(".state.yaml.tmp");

        let yaml = serde_yaml::to_string(state).context("Failed to serialize remote state")?;
        fs::write(&temp_path, yaml)
            .await
            .with_context(|| format!("Failed to write {:?}", temp_path))?;

        // rename is atomic on POSIX
        fs::rename(&temp_path, &state_path)
            .await
            .with_context(|| format!("Failed to replace {:?}", state_path))?;

        Ok(())
    }

    /// Read-modify-write under the process-local lock
    pub async fn update_state<F>(&self, update_fn: F) -> Result<()>
    where
        F: FnOnce(&mut RemoteState) -> Result<()>,
    {
        let _guard = self.write_lock.lock().await;
        let mut state = self.read_state().await?;
        update_fn(&mut state)?;
        self.write_state(&state).await
    }
}

impl RemoteStore for FilesystemRemote {
    async fn fetch_rotation(&self) -> Result<Sequence> {
        let state = self.read_state().await?;
        tracing::debug!("Read {} map(s) in rotation from {:?}", state.rotation.len(), self.base_path);
        Ok(state.resolved_rotation())
    }

    async fn push_rotation(&self, ids: Vec<String>) -> Result<()> {
        self.update_state(|state| {
            // An empty catalog means the server has not told us its maps; accept anything.
            if !state.maps.is_empty() {
                if let Some(unknown) = ids.iter().find(|id| !state.maps.iter().any(|m| &m.id == *id)) {
                    anyhow::bail!("{} is not a valid map", unknown);
                }
            }
            state.rotation = ids;
            Ok(())
        })
        .await
    }

    async fn fetch_votemap_config(&self) -> Result<VoteMapConfig> {
        Ok(self.read_state().await?.votemap)
    }

    async fn fetch_catalog(&self) -> Result<Sequence> {
        Ok(Sequence::new(self.read_state().await?.maps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Item;
    use tempfile::TempDir;

    fn catalog() -> Vec<Item> {
        vec![
            Item::new("foy_warfare", "Foy Warfare"),
            Item::new("kursk_warfare", "Kursk Warfare"),
            Item::new("omahabeach_offensive_us", "Omaha Beach Offensive (US)"),
        ]
    }

    #[tokio::test]
    async fn test_missing_state_is_empty() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let remote = FilesystemRemote::new(temp_dir.path());

        assert!(remote.fetch_rotation().await?.is_empty());
        assert_eq!(remote.fetch_votemap_config().await?, VoteMapConfig::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_push_then_fetch() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let remote = FilesystemRemote::new(temp_dir.path());
        remote.initialize().await?;
        remote
            .write_state(&RemoteState {
                maps: catalog(),
                ..RemoteState::default()
            })
            .await?;

        remote
            .push_rotation(vec!["kursk_warfare".to_string(), "foy_warfare".to_string()])
            .await?;

        let rotation = remote.fetch_rotation().await?;
        assert_eq!(rotation.ids(), vec!["kursk_warfare", "foy_warfare"]);
        assert_eq!(rotation.items()[0].label, "Kursk Warfare");
        assert!(!temp_dir.path().join(".state.yaml.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_push_unknown_map_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let remote = FilesystemRemote::new(temp_dir.path());
        remote
            .write_state(&RemoteState {
                maps: catalog(),
                rotation: vec!["foy_warfare".to_string()],
                ..RemoteState::default()
            })
            .await?;

        let result = remote.push_rotation(vec!["nowhere".to_string()]).await;
        assert!(result.is_err());
        assert_eq!(remote.fetch_rotation().await?.ids(), vec!["foy_warfare"]);
        Ok(())
    }
}
