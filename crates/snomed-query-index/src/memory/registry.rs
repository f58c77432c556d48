//! Dense index registry for mapping between SctId (u64) and record slots (u32).

use snomed_query_ecl::SctId;
use std::collections::HashMap;

use crate::error::{IndexError, IndexResult};

/// Most concepts a registry can hold: every `u32` is a valid index.
pub const MAX_CONCEPTS: u64 = u32::MAX as u64 + 1;

/// Registry that maps between SctId (u64) and dense record indices (u32).
///
/// SNOMED CT IDs are 64-bit but sparse. Roaring Bitmaps use 32-bit values,
/// so posting lists store the dense index of each concept instead of its id.
/// Indices are assigned in registration order and never change.
#[derive(Clone, Default)]
pub struct ConceptIdRegistry {
    /// SctId -> u32 index mapping.
    id_to_index: HashMap<SctId, u32>,
    /// u32 index -> SctId mapping.
    index_to_id: Vec<SctId>,
}

impl ConceptIdRegistry {
    /// Creates a registry with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            index_to_id: Vec::with_capacity(capacity),
        }
    }

    /// Registers a new concept ID and returns its index.
    ///
    /// # Errors
    ///
    /// [`IndexError::DuplicateConcept`] if the ID is already registered,
    /// [`IndexError::TooManyConcepts`] once every `u32` index is taken.
    pub fn register(&mut self, id: SctId) -> IndexResult<u32> {
        if self.id_to_index.contains_key(&id) {
            return Err(IndexError::DuplicateConcept(id));
        }
        let idx = dense_index(self.index_to_id.len())?;
        self.id_to_index.insert(id, idx);
        self.index_to_id.push(id);
        Ok(idx)
    }

    /// Gets the dense index for a concept ID.
    #[inline]
    pub fn get_index(&self, id: SctId) -> Option<u32> {
        self.id_to_index.get(&id).copied()
    }

    /// Returns the number of registered concepts.
    #[inline]
    pub fn len(&self) -> usize {
        self.index_to_id.len()
    }

    /// Returns true if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_to_id.is_empty()
    }

    /// Returns an iterator over all registered concept IDs, in index order.
    pub fn concept_ids(&self) -> impl Iterator<Item = SctId> + '_ {
        self.index_to_id.iter().copied()
    }

    /// Returns estimated memory usage in bytes.
    pub fn memory_size(&self) -> usize {
        let hashmap_size = self.id_to_index.capacity() * (8 + 4 + 8); // key + value + overhead
        let vec_size = self.index_to_id.capacity() * 8;
        hashmap_size + vec_size + std::mem::size_of::<Self>()
    }
}

/// The index the next registration receives when `len` are registered.
fn dense_index(len: usize) -> IndexResult<u32> {
    u32::try_from(len).map_err(|_| IndexError::TooManyConcepts { limit: MAX_CONCEPTS })
}

impl std::fmt::Debug for ConceptIdRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConceptIdRegistry")
            .field("len", &self.len())
            .field("memory_size", &self.memory_size())
            .finish()
    }
}
