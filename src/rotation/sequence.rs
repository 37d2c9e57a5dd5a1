use std::sync::Arc;

use super::Item;
use crate::error::EditError;

/// Immutable ordered list of maps.
///
/// Cloning is cheap and shares storage; every edit builds a new backing
/// buffer, so a clone held for comparison never observes later edits.
/// Equality compares identifiers in order and ignores labels.
#[derive(Debug, Clone)]
pub struct Sequence {
    items: Arc<[Item]>,
}

impl Sequence {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Identifier list in order, as pushed to the remote store
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Move the item at `from` so that it ends up at `to`
    pub fn reordered(&self, from: usize, to: usize) -> Result<Self, EditError> {
        self.check_index(from)?;
        self.check_index(to)?;

        let mut items = self.items.to_vec();
        let moved = items.remove(from);
        items.insert(to, moved);
        Ok(Self::new(items))
    }

    /// Concatenate `other` after the current items. Duplicates are kept.
    pub fn appended(&self, other: &Sequence) -> Self {
        let mut items = Vec::with_capacity(self.len() + other.len());
        items.extend_from_slice(&self.items);
        items.extend_from_slice(&other.items);
        Self::new(items)
    }

    /// Drop exactly one item at `index`
    pub fn removed(&self, index: usize) -> Result<Self, EditError> {
        self.check_index(index)?;

        let mut items = self.items.to_vec();
        items.remove(index);
        Ok(Self::new(items))
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index >= self.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| a.id == b.id)
    }
}

impl Eq for Sequence {}

impl From<Vec<Item>> for Sequence {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<Item> for Sequence {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
