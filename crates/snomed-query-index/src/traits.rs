//! The read-only lookup surface the query engine depends on.
//!
//! The engine only ever asks three questions of an index: "which concept has
//! this id", "which concepts have this id in their ancestor closure" and "how
//! many concepts are there". Any store that can answer them with point and
//! exact-match lookups can back the engine.
//!
//! # Example: Implementing ConceptIndex for another store
//!
//! ```ignore
//! use snomed_query_index::{Concept, ConceptIndex};
//! use snomed_query_ecl::SctId;
//!
//! impl ConceptIndex for MyStore {
//!     fn concept(&self, id: SctId) -> Option<&Concept> {
//!         self.by_id.get(&id)
//!     }
//!
//!     fn concepts_with_ancestor(&self, ancestor: SctId) -> Vec<&Concept> {
//!         self.by_ancestor(ancestor)
//!     }
//!
//!     fn concept_count(&self) -> usize {
//!         self.by_id.len()
//!     }
//!
//!     fn concept_ids(&self) -> Box<dyn Iterator<Item = SctId> + '_> {
//!         Box::new(self.by_id.keys().copied())
//!     }
//! }
//! ```

use snomed_query_ecl::SctId;

use crate::concept::Concept;

/// Read-only concept store with a precomputed ancestor closure.
///
/// Implementations must be immutable while shared: the engine may call any
/// method from several threads at once.
pub trait ConceptIndex: Send + Sync {
    /// Point lookup by id.
    fn concept(&self, id: SctId) -> Option<&Concept>;

    /// All concepts whose ancestor closure contains `ancestor`.
    ///
    /// This is an exact-match lookup, not a traversal. Unknown ids have no
    /// descendants and return an empty Vec.
    fn concepts_with_ancestor(&self, ancestor: SctId) -> Vec<&Concept>;

    /// Total number of concepts.
    fn concept_count(&self) -> usize;

    /// Iterates all concept ids in index order.
    fn concept_ids(&self) -> Box<dyn Iterator<Item = SctId> + '_>;

    /// Checks if a concept exists.
    fn contains(&self, id: SctId) -> bool {
        self.concept(id).is_some()
    }
}
