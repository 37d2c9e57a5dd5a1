use serde::{Deserialize, Serialize};

/// A single map in a rotation.
///
/// The console sends map objects with many more fields (environment, game
/// mode, image); only the identifier and display name are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Machine name, e.g. `stmereeglise_warfare`
    pub id: String,
    /// Human readable name, e.g. `St. Mere Eglise Warfare`
    #[serde(rename = "pretty_name", alias = "label", default)]
    pub label: String,
}

impl Item {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Item whose label is its identifier, used when no catalog entry exists
    pub fn bare(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
        }
    }

    /// Label to show the operator, falling back to the identifier
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}
