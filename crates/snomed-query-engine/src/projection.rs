//! Projection of index concepts into caller-facing results.

use snomed_query_ecl::SctId;
use snomed_query_index::Concept;

/// A matched concept as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConceptResult {
    /// Concept id.
    pub id: SctId,
    /// Fully specified name; empty when the index has none.
    pub fsn: String,
}

impl ConceptResult {
    /// Creates a result.
    pub fn new(id: SctId, fsn: impl Into<String>) -> Self {
        Self {
            id,
            fsn: fsn.into(),
        }
    }
}

impl From<&Concept> for ConceptResult {
    fn from(concept: &Concept) -> Self {
        Self::new(concept.id, concept.fsn())
    }
}

/// Projects concepts in order.
pub(crate) fn project<'a, I>(concepts: I) -> Vec<ConceptResult>
where
    I: IntoIterator<Item = &'a Concept>,
{
    concepts.into_iter().map(ConceptResult::from).collect()
}
