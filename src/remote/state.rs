use serde::{Deserialize, Serialize};

use crate::{
    rotation::{Item, Sequence},
    votemap::VoteMapConfig,
};

/// Contents of `state.yaml` for a filesystem remote
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RemoteState {
    /// Every map the server can load
    #[serde(default)]
    pub maps: Vec<Item>,

    /// Map ids in rotation order
    #[serde(default)]
    pub rotation: Vec<String>,

    #[serde(default)]
    pub votemap: VoteMapConfig,
}

impl RemoteState {
    /// Rotation with labels resolved from the catalog
    pub fn resolved_rotation(&self) -> Sequence {
        self.rotation
            .iter()
            .map(|id| {
                self.maps
                    .iter()
                    .find(|map| &map.id == id)
                    .cloned()
                    .unwrap_or_else(|| Item::bare(id.clone()))
            })
            .collect()
    }
}
