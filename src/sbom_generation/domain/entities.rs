use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::HashMap;

/// Anything that carries an SPDX identifier
pub trait SpdxElement {
    fn spdx_id(&self) -> &str;
}

/// Insertion-ordered map of SPDX elements keyed by their own identifier.
///
/// Iteration follows insertion order so rendered documents are reproducible.
/// An identifier can only be inserted once.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMap<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for EntityMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: SpdxElement> EntityMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element under its own identifier
    ///
    /// # Arguments
    /// * `entity` - Element to insert, its identifier must already be set
    /// * `container` - Human readable name of the owner, used in error messages
    ///
    /// # Errors
    /// Returns `SbomError::DuplicateIdentifier` when the identifier is taken
    /// and `SbomError::Validation` when it is empty.
    pub fn insert(&mut self, entity: T, container: &str) -> Result<()> {
        let id = entity.spdx_id().to_string();
        if id.is_empty() {
            return Err(SbomError::validation(format!(
                "cannot add an element without identifier to {}",
                container
            ))
            .into());
        }
        if self.index.contains_key(&id) {
            return Err(SbomError::DuplicateIdentifier {
                id,
                container: container.to_string(),
            }
            .into());
        }

        self.index.insert(id, self.entries.len());
        self.entries.push(entity);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Mutable access for in-place enrichment. Callers must not change the identifier.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        match self.index.get(id) {
            Some(&i) => self.entries.get_mut(i),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T: SpdxElement> IntoIterator for &'a EntityMap<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
